//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `PlError` as one variant
//! via `#[from]`.

use thiserror::Error;

use crate::{PlaneId, TaskId};

#[derive(Debug, Error)]
pub enum PlError {
    #[error("plane {0} not found")]
    PlaneNotFound(PlaneId),

    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `pl-*` crates.
pub type PlResult<T> = Result<T, PlError>;
