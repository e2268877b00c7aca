//! Movement models.

use pl_core::{PlaneId, Point, Step, TaskId};
use pl_fleet::{FleetStore, TaskStore};

/// Advances plane locations once per step.
///
/// Runs after the message phases and before post-step, so beacons report the
/// new positions.  Returns the tasks served this step as `(plane, task)`;
/// the simulation completes them on the plane's behalf.
pub trait Motion {
    fn advance(&mut self, step: Step, fleet: &mut FleetStore, tasks: &TaskStore) -> Vec<(PlaneId, TaskId)>;
}

/// Nobody moves and nothing completes.
#[derive(Copy, Clone, Debug, Default)]
pub struct Stationary;

impl Motion for Stationary {
    fn advance(&mut self, _: Step, _: &mut FleetStore, _: &TaskStore) -> Vec<(PlaneId, TaskId)> {
        Vec::new()
    }
}

/// Each plane flies at full speed towards its nearest owned task and
/// completes it on arrival.  Planes without open tasks hold position.
#[derive(Copy, Clone, Debug, Default)]
pub struct StraightLine;

impl StraightLine {
    /// Nearest open owned task, lowest id on ties.
    fn target(here: Point, owned: impl Iterator<Item = TaskId>, tasks: &TaskStore) -> Option<(TaskId, Point)> {
        let mut best: Option<(f64, TaskId, Point)> = None;
        for t in owned.filter(|t| !tasks.completed[t.index()]) {
            let at = tasks.location[t.index()];
            let d = here.distance_sq(at);
            if best.is_none_or(|(b, _, _)| d < b) {
                best = Some((d, t, at));
            }
        }
        best.map(|(_, t, at)| (t, at))
    }
}

impl Motion for StraightLine {
    fn advance(&mut self, _: Step, fleet: &mut FleetStore, tasks: &TaskStore) -> Vec<(PlaneId, TaskId)> {
        let mut done = Vec::new();
        for i in 0..fleet.count {
            let here = fleet.location[i];
            let Some((task, at)) = Self::target(here, fleet.owned[i].iter().copied(), tasks) else {
                continue;
            };
            let (next, arrived) = here.step_towards(at, fleet.speed[i]);
            fleet.location[i] = next;
            if arrived {
                done.push((PlaneId(i as u32), task));
            }
        }
        done
    }
}
