//! Fluent builder for constructing `FleetStore` + `TaskStore` in one step.
//!
//! # Usage
//!
//! ```rust
//! use pl_core::{PlaneId, Point};
//! use pl_fleet::{FleetBuilder, PlaneSpec};
//!
//! let (fleet, tasks) = FleetBuilder::new()
//!     .plane(PlaneSpec::new(Point::new(0.0, 0.0), 10.0, 500.0))
//!     .plane(PlaneSpec::new(Point::new(100.0, 0.0), 10.0, 500.0))
//!     .task(Point::new(50.0, 0.0), Some(PlaneId(0)))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(fleet.count, 2);
//! assert_eq!(tasks.servant[0], Some(PlaneId(0)));
//! ```

use pl_core::{PlError, PlResult, PlaneId, Point, TaskId};

use crate::{FleetStore, TaskStore};

/// Initial state of one plane.
#[derive(Clone, Debug)]
pub struct PlaneSpec {
    pub location:   Point,
    pub speed:      f64,
    pub comm_range: f64,
}

impl PlaneSpec {
    pub fn new(location: Point, speed: f64, comm_range: f64) -> Self {
        Self { location, speed, comm_range }
    }
}

/// Fluent builder for [`FleetStore`] + [`TaskStore`].
#[derive(Default)]
pub struct FleetBuilder {
    planes: Vec<PlaneSpec>,
    tasks:  Vec<(Point, Option<PlaneId>)>,
}

impl FleetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plane.  Planes receive ids in insertion order.
    pub fn plane(mut self, spec: PlaneSpec) -> Self {
        self.planes.push(spec);
        self
    }

    /// Append a task at `location`, initially owned by `owner` (or unowned).
    pub fn task(mut self, location: Point, owner: Option<PlaneId>) -> Self {
        self.tasks.push((location, owner));
        self
    }

    /// Construct both stores, validating every plane parameter and owner id.
    pub fn build(self) -> PlResult<(FleetStore, TaskStore)> {
        let mut fleet = FleetStore::new(self.planes.len());
        for (i, spec) in self.planes.into_iter().enumerate() {
            if !(spec.speed.is_finite() && spec.speed >= 0.0) {
                return Err(PlError::Config(format!("plane {i}: speed must be finite and >= 0")));
            }
            if !(spec.comm_range.is_finite() && spec.comm_range > 0.0) {
                return Err(PlError::Config(format!("plane {i}: comm_range must be finite and > 0")));
            }
            fleet.location[i] = spec.location;
            fleet.speed[i] = spec.speed;
            fleet.comm_range[i] = spec.comm_range;
        }

        let (locations, owners): (Vec<_>, Vec<_>) = self.tasks.into_iter().unzip();
        let mut tasks = TaskStore::new(locations);
        for (i, owner) in owners.into_iter().enumerate() {
            let Some(owner) = owner else { continue };
            fleet.check(owner)?;
            tasks.servant[i] = Some(owner);
            fleet.owned[owner.index()].insert(TaskId(i as u32));
        }

        Ok((fleet, tasks))
    }
}
