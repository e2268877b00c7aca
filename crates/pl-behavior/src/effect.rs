//! Effects — the actions a behavior requests from the simulation.

use pl_core::{PlaneId, TaskId};

use crate::Payload;

/// An action requested by a behavior hook.
///
/// Effects are applied by the simulation after the emitting phase, in
/// emission order.  Ownership effects re-enter the plane's task hooks, whose
/// own effects are applied in turn.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Queue a message on the transport.  `recipient: None` broadcasts.
    Send {
        recipient: Option<PlaneId>,
        payload:   Payload,
    },

    /// Give up `task` and transfer it to `to`.
    Handoff { task: TaskId, to: PlaneId },

    /// Take ownership of `task`.
    Accept { task: TaskId },
}
