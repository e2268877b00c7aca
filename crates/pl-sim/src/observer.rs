//! Simulation observer trait for progress reporting and data collection.

use pl_core::{PlaneId, Step, TaskId};
use pl_fleet::{FleetStore, TaskStore};

/// An ownership change applied by the simulation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskEvent {
    /// `plane` took ownership of `task`, initially or through a transfer.
    Added { task: TaskId, plane: PlaneId },
    /// `plane` gave `task` away.
    Removed { task: TaskId, plane: PlaneId },
    /// `plane` reached `task` and served it.
    Completed { task: TaskId, plane: PlaneId },
}

/// Per-step counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepStats {
    /// Message copies placed in inboxes, one per recipient.
    pub delivered: usize,
    /// Task transfers returned to their sender.
    pub bounced:   usize,
    /// Addressed messages whose recipient was out of range.
    pub dropped:   usize,
    pub handoffs:  usize,
    pub completed: usize,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// step loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — handoff counter
///
/// ```rust,ignore
/// struct Handoffs(usize);
///
/// impl SimObserver for Handoffs {
///     fn on_step_end(&mut self, _step: Step, stats: &StepStats) {
///         self.0 += stats.handoffs;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each step, before any processing.
    fn on_step_start(&mut self, _step: Step) {}

    /// Called once per ownership change, after the step it happened in.
    /// Changes made while the simulation was built are reported with the
    /// first step.
    fn on_task_event(&mut self, _step: Step, _event: TaskEvent) {}

    /// Called at the end of each step, after transport delivery.
    fn on_step_end(&mut self, _step: Step, _stats: &StepStats) {}

    /// Called at snapshot intervals (every `config.output_interval_steps`
    /// steps) with read-only access to plane and task state.
    fn on_snapshot(&mut self, _step: Step, _fleet: &FleetStore, _tasks: &TaskStore) {}

    /// Called once after the final step completes.
    fn on_sim_end(&mut self, _final_step: Step) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
