//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `assignments.csv`
//! - `task_events.csv`
//! - `step_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AssignmentRow, OutputResult, StepSummaryRow, TaskEventRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    assignments: Writer<File>,
    events:      Writer<File>,
    summaries:   Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut assignments = Writer::from_path(dir.join("assignments.csv"))?;
        assignments.write_record(["step", "task", "servant", "completed"])?;

        let mut events = Writer::from_path(dir.join("task_events.csv"))?;
        events.write_record(["step", "task", "plane", "event"])?;

        let mut summaries = Writer::from_path(dir.join("step_summaries.csv"))?;
        summaries.write_record(["step", "elapsed_secs", "delivered", "bounced", "handoffs", "completed"])?;

        Ok(Self { assignments, events, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_assignments(&mut self, rows: &[AssignmentRow]) -> OutputResult<()> {
        for row in rows {
            self.assignments.write_record(&[
                row.step.to_string(),
                row.task.to_string(),
                row.servant.map(|s| s.to_string()).unwrap_or_default(),
                (row.completed as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_task_event(&mut self, row: &TaskEventRow) -> OutputResult<()> {
        self.events.write_record(&[
            row.step.to_string(),
            row.task.to_string(),
            row.plane.to_string(),
            row.event.to_string(),
        ])?;
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.step.to_string(),
            row.elapsed_secs.to_string(),
            row.delivered.to_string(),
            row.bounced.to_string(),
            row.handoffs.to_string(),
            row.completed.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.assignments.flush()?;
        self.events.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
