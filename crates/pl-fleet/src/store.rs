//! Plane and task storage.
//!
//! Every `Vec` field has exactly `count` elements and the id value is the
//! index into all of them:
//!
//! ```ignore
//! let here = fleet.location[plane.index()];
//! ```

use std::collections::BTreeSet;

use pl_core::{PlError, PlResult, PlaneId, Point, TaskId};

// ── FleetStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all plane state.
pub struct FleetStore {
    /// Number of planes.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Current position, written by the motion model once per step.
    pub location: Vec<Point>,

    /// Maximum distance covered per step, in metres.
    pub speed: Vec<f64>,

    /// Radio range in metres.  A broadcast reaches every plane strictly
    /// closer than this.
    pub comm_range: Vec<f64>,

    /// Tasks currently owned.  Ordered so iteration is deterministic.
    pub owned: Vec<BTreeSet<TaskId>>,
}

impl FleetStore {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            count,
            location:   vec![Point::default(); count],
            speed:      vec![0.0; count],
            comm_range: vec![0.0; count],
            owned:      vec![BTreeSet::new(); count],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `PlaneId`s in ascending index order.
    pub fn plane_ids(&self) -> impl Iterator<Item = PlaneId> + '_ {
        (0..self.count as u32).map(PlaneId)
    }

    /// `Ok(())` if `plane` indexes into the store.
    pub fn check(&self, plane: PlaneId) -> PlResult<()> {
        if plane.index() < self.count { Ok(()) } else { Err(PlError::PlaneNotFound(plane)) }
    }

    /// Number of tasks owned by `plane`.
    #[inline]
    pub fn load(&self, plane: PlaneId) -> usize {
        self.owned[plane.index()].len()
    }
}

// ── TaskStore ─────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all task state.
///
/// A task's `servant` is `None` only while a handoff is in flight between two
/// planes; `completed` tasks keep their last servant for reporting.
pub struct TaskStore {
    pub count: usize,

    /// Fixed task position.
    pub location: Vec<Point>,

    /// Plane currently owning the task.
    pub servant: Vec<Option<PlaneId>>,

    pub completed: Vec<bool>,
}

impl TaskStore {
    pub(crate) fn new(locations: Vec<Point>) -> Self {
        let count = locations.len();
        Self {
            count,
            location:  locations,
            servant:   vec![None; count],
            completed: vec![false; count],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn task_ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        (0..self.count as u32).map(TaskId)
    }

    pub fn check(&self, task: TaskId) -> PlResult<()> {
        if task.index() < self.count { Ok(()) } else { Err(PlError::TaskNotFound(task)) }
    }

    /// Tasks that are neither completed nor in flight.
    pub fn open_count(&self) -> usize {
        (0..self.count)
            .filter(|&i| !self.completed[i] && self.servant[i].is_some())
            .count()
    }
}
