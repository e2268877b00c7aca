//! Pluggable base potentials: the cost of one plane serving one task.

use pl_core::Point;

use crate::{MaxSumError, MaxSumResult};

pub const TRAVEL_DISTANCE: &str = "travel_distance";
pub const SQUARED_DISTANCE: &str = "squared_distance";

/// Cost of the plane at `plane` serving the task at `task`, before any load
/// penalty.  Re-evaluated every iteration since planes move.
pub trait CostModel {
    fn name(&self) -> &'static str;
    fn cost(&self, plane: Point, task: Point) -> f64;
}

/// Straight-line travel distance in metres.  The default.
#[derive(Copy, Clone, Debug, Default)]
pub struct TravelDistance;

impl CostModel for TravelDistance {
    fn name(&self) -> &'static str {
        TRAVEL_DISTANCE
    }

    fn cost(&self, plane: Point, task: Point) -> f64 {
        plane.distance(task)
    }
}

/// Squared distance; penalises long trips more than short ones.
#[derive(Copy, Clone, Debug, Default)]
pub struct SquaredDistance;

impl CostModel for SquaredDistance {
    fn name(&self) -> &'static str {
        SQUARED_DISTANCE
    }

    fn cost(&self, plane: Point, task: Point) -> f64 {
        plane.distance_sq(task)
    }
}

/// Resolve a strategy by name.
pub fn cost_model(name: &str) -> MaxSumResult<Box<dyn CostModel>> {
    match name {
        TRAVEL_DISTANCE => Ok(Box::new(TravelDistance)),
        SQUARED_DISTANCE => Ok(Box::new(SquaredDistance)),
        other => Err(MaxSumError::UnknownStrategy(other.to_string())),
    }
}
