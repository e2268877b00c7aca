//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use pl_core::{SimConfig, Step};
use pl_fleet::{FleetStore, TaskStore};
use pl_sim::{SimObserver, StepStats, TaskEvent};

use crate::row::{AssignmentRow, StepSummaryRow, TaskEventRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes assignments, ownership events and step
/// summaries to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:             W,
    step_duration_secs: u32,
    last_error:         Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self { writer, step_duration_secs: config.step_duration_secs, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_task_event(&mut self, step: Step, event: TaskEvent) {
        let (task, plane, name) = match event {
            TaskEvent::Added { task, plane } => (task, plane, "added"),
            TaskEvent::Removed { task, plane } => (task, plane, "removed"),
            TaskEvent::Completed { task, plane } => (task, plane, "completed"),
        };
        let row = TaskEventRow { step: step.0, task: task.0, plane: plane.0, event: name };
        let result = self.writer.write_task_event(&row);
        self.store_err(result);
    }

    fn on_step_end(&mut self, step: Step, stats: &StepStats) {
        let row = StepSummaryRow {
            step:         step.0,
            elapsed_secs: step.0 * self.step_duration_secs as u64,
            delivered:    stats.delivered as u64,
            bounced:      stats.bounced as u64,
            handoffs:     stats.handoffs as u64,
            completed:    stats.completed as u64,
        };
        let result = self.writer.write_step_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, step: Step, _fleet: &FleetStore, tasks: &TaskStore) {
        let rows: Vec<AssignmentRow> = (0..tasks.count)
            .map(|i| AssignmentRow {
                step:      step.0,
                task:      i as u32,
                servant:   tasks.servant[i].map(|p| p.0),
                completed: tasks.completed[i],
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_assignments(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_step: Step) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
