//! Plain data row types written by output backends.

/// Who serves one task at a given step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentRow {
    pub step:      u64,
    pub task:      u32,
    /// `None` while the task is in flight between two planes.
    pub servant:   Option<u32>,
    pub completed: bool,
}

/// One ownership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskEventRow {
    pub step:  u64,
    pub task:  u32,
    pub plane: u32,
    /// `"added"`, `"removed"` or `"completed"`.
    pub event: &'static str,
}

/// Counters for one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummaryRow {
    pub step:         u64,
    pub elapsed_secs: u64,
    pub delivered:    u64,
    pub bounced:      u64,
    pub handoffs:     u64,
    pub completed:    u64,
}
