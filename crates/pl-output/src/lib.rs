//! `pl-output` — simulation output writers for the plane fleet simulator.
//!
//! | Backend | Files created                                                  |
//! |---------|----------------------------------------------------------------|
//! | CSV     | `assignments.csv`, `task_events.csv`, `step_summaries.csv`     |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `pl_sim::SimObserver`.
//! Assignments are written at every snapshot step
//! (`SimConfig::output_interval_steps`); events and summaries every step.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pl_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, &config);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AssignmentRow, StepSummaryRow, TaskEventRow};
pub use writer::OutputWriter;
