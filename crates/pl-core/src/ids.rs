//! Strongly typed identifiers for planes, tasks and solver factors.
//!
//! Plane and task IDs are `Copy + Ord + Hash` integer wrappers that double as
//! indices into the SoA stores (`id.index()`).  Factor IDs are small enums
//! built from those: a factor is always owned by exactly one plane, but its
//! *logical* identity (`LogicalId`) is what other planes address.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a plane (agent) in `FleetStore`.
    pub struct PlaneId(u32);
}

typed_id! {
    /// Index of a task in `TaskStore`.
    pub struct TaskId(u32);
}

// ── Solver factor identities ──────────────────────────────────────────────────

/// The identity other planes use to address a factor.
///
/// Only variables and selectors ever have edges that cross plane boundaries,
/// so only they have a logical identity.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogicalId {
    /// The per-plane variable factor.
    Variable(PlaneId),
    /// The per-task selector factor, hosted on the task's owner.
    Selector(TaskId),
}

impl LogicalId {
    /// The task of a selector id, `None` for variables.
    #[inline]
    pub fn task(self) -> Option<TaskId> {
        match self {
            LogicalId::Selector(t) => Some(t),
            LogicalId::Variable(_) => None,
        }
    }

    /// The plane of a variable id, `None` for selectors.
    #[inline]
    pub fn plane(self) -> Option<PlaneId> {
        match self {
            LogicalId::Variable(p) => Some(p),
            LogicalId::Selector(_) => None,
        }
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalId::Variable(p) => write!(f, "V[{}]", p.0),
            LogicalId::Selector(t) => write!(f, "S[{}]", t.0),
        }
    }
}

/// Identity of a factor inside one plane's local graph.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FactorId {
    Variable(PlaneId),
    Workload(PlaneId),
    Selector(TaskId),
    /// Local stand-in for the far end of the logical edge `local`–`remote`.
    /// The hosting plane lives in the proxy's binding, not in its identity.
    Proxy { local: LogicalId, remote: LogicalId },
}

impl From<LogicalId> for FactorId {
    fn from(id: LogicalId) -> Self {
        match id {
            LogicalId::Variable(p) => FactorId::Variable(p),
            LogicalId::Selector(t) => FactorId::Selector(t),
        }
    }
}

impl fmt::Display for FactorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorId::Variable(p) => write!(f, "V[{}]", p.0),
            FactorId::Workload(p) => write!(f, "W[{}]", p.0),
            FactorId::Selector(t) => write!(f, "S[{}]", t.0),
            FactorId::Proxy { local, remote } => write!(f, "P[{local}->{remote}]"),
        }
    }
}
