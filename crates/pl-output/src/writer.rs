//! The `OutputWriter` trait implemented by all backend writers.

use crate::{AssignmentRow, OutputResult, StepSummaryRow, TaskEventRow};

/// Trait implemented by output backends.
///
/// Errors are returned to the caller; [`SimOutputObserver`][crate::SimOutputObserver]
/// stores the first one because observer hooks cannot fail.
pub trait OutputWriter {
    /// Write a batch of assignment rows.
    fn write_assignments(&mut self, rows: &[AssignmentRow]) -> OutputResult<()>;

    fn write_task_event(&mut self, row: &TaskEventRow) -> OutputResult<()>;

    /// Write one step summary row.
    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
