//! Behavior kind identifiers.

use std::fmt;

/// Small, stable identifier for a behavior type.
///
/// Dependencies are declared as edges between kinds, so two behaviors of the
/// same kind cannot coexist on one plane.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BehaviorKind(pub &'static str);

impl BehaviorKind {
    /// Built-in [`TaskInbox`][crate::TaskInbox].
    pub const TASK_INBOX: BehaviorKind = BehaviorKind("task_inbox");
    /// Range-guarantee neighbor tracking.
    pub const NEIGHBORS: BehaviorKind = BehaviorKind("neighbors");
    /// Distributed Max-Sum task allocation.
    pub const MAX_SUM: BehaviorKind = BehaviorKind("max_sum");
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
