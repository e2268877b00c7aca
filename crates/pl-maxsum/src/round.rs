//! Per-task negotiation state.

use pl_core::Step;

/// Where a hosted task is in its negotiation cycle.
///
/// ```text
/// Unattached ──(next step)──▶ Negotiating ──(iterations spent)──▶ Settled
///                                  ▲                                 │
///                                  └──────────(cadence steps)────────┘
/// ```
///
/// A handoff removes the task here and starts a fresh `Unattached` on the
/// new owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundState {
    /// Selector exists with this plane as the only candidate.  Candidates are
    /// locked at the first step after `added_at`, once beacons from the
    /// step the task arrived in have been heard.
    Unattached { added_at: Step },

    /// Candidates locked; `remaining` solver iterations left.
    Negotiating { remaining: u32 },

    /// Decision taken at `at`.
    Settled { at: Step },
}

impl RoundState {
    /// `true` if a new round should lock candidates at `now`.
    pub fn starts_round(self, now: Step, cadence: u32) -> bool {
        match self {
            RoundState::Unattached { added_at } => now > added_at,
            RoundState::Settled { at } => now.since(at) >= cadence as u64,
            RoundState::Negotiating { .. } => false,
        }
    }
}
