//! Simulation messages and the closed set of message kinds.
//!
//! # Kind hierarchy
//!
//! ```text
//! Any
//! ├── Beacon
//! └── Addressed
//!     ├── TaskTransfer
//!     └── Solver
//!         ├── FactorValue
//!         ├── Link
//!         └── Unlink
//! ```
//!
//! Only leaf kinds are ever carried by a [`Payload`]; inner kinds exist so a
//! behavior can declare a single handler for a whole family.

use pl_core::{LogicalId, PlaneId, Point, Step, TaskId};

// ── MessageKind ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    Any,
    Beacon,
    Addressed,
    TaskTransfer,
    Solver,
    FactorValue,
    Link,
    Unlink,
}

impl MessageKind {
    pub const COUNT: usize = 8;

    pub const ALL: [MessageKind; Self::COUNT] = [
        MessageKind::Any,
        MessageKind::Beacon,
        MessageKind::Addressed,
        MessageKind::TaskTransfer,
        MessageKind::Solver,
        MessageKind::FactorValue,
        MessageKind::Link,
        MessageKind::Unlink,
    ];

    /// The next more general kind, `None` for [`MessageKind::Any`].
    pub fn parent(self) -> Option<MessageKind> {
        use MessageKind::*;
        match self {
            Any => None,
            Beacon | Addressed => Some(Any),
            TaskTransfer | Solver => Some(Addressed),
            FactorValue | Link | Unlink => Some(Solver),
        }
    }

    /// `self` followed by every ancestor up to `Any`.
    pub fn chain(self) -> impl Iterator<Item = MessageKind> {
        std::iter::successors(Some(self), |k| k.parent())
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

// ── ProxyBinding ──────────────────────────────────────────────────────────────

/// One logical solver edge realised across two planes.
///
/// Seen from the sending side: `logical_from` lives on `physical_from` and
/// talks to `logical_to`, which lives on `physical_to`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProxyBinding {
    pub logical_from:  LogicalId,
    pub logical_to:    LogicalId,
    pub physical_from: PlaneId,
    pub physical_to:   PlaneId,
}

impl ProxyBinding {
    /// The same edge seen from the other plane.
    pub fn mirrored(self) -> ProxyBinding {
        ProxyBinding {
            logical_from:  self.logical_to,
            logical_to:    self.logical_from,
            physical_from: self.physical_to,
            physical_to:   self.physical_from,
        }
    }
}

// ── Payload / Message ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Payload {
    /// Position and speed at the end of the sender's step.  `speed` is `None`
    /// when the sender does not advertise it.
    Beacon { location: Point, speed: Option<f64> },

    /// Ownership of `task` moves to the recipient.
    TaskTransfer { task: TaskId },

    /// One solver message crossing planes.
    FactorValue { binding: ProxyBinding, value: f64 },

    /// The owner of `task` adds the recipient as a candidate servant.
    Link { task: TaskId },

    /// The owner of `task` removes the recipient from its candidates.
    Unlink { task: TaskId },
}

impl Payload {
    pub fn kind(&self) -> MessageKind {
        match self {
            Payload::Beacon { .. } => MessageKind::Beacon,
            Payload::TaskTransfer { .. } => MessageKind::TaskTransfer,
            Payload::FactorValue { .. } => MessageKind::FactorValue,
            Payload::Link { .. } => MessageKind::Link,
            Payload::Unlink { .. } => MessageKind::Unlink,
        }
    }
}

/// A simulation-level message.
///
/// Delivered to every plane within the sender's range at the end of the step
/// it was sent in, and dispatched at the next step.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    pub sender:    PlaneId,
    /// `None` = broadcast.
    pub recipient: Option<PlaneId>,
    pub sent_at:   Step,
    pub payload:   Payload,
}

impl Message {
    #[inline]
    pub fn kind(&self) -> MessageKind {
        self.payload.kind()
    }

    /// `true` if the message is a broadcast or addressed to `plane`.
    #[inline]
    pub fn is_for(&self, plane: PlaneId) -> bool {
        self.recipient.is_none_or(|r| r == plane)
    }
}
