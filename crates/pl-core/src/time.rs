//! Simulation time model.
//!
//! Time is a monotonically increasing `Step` counter.  Every plane executes
//! the same five phases once per step, and a message sent during step `t` is
//! first visible at step `t + 1`, so `Step` is also the unit of message
//! latency and of neighbor guarantees.
//!
//!   elapsed_secs = step * step_duration_secs

use std::fmt;

// ── Step ──────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// Steps elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Step) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current step and converts it to simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// How many simulated seconds one step represents.
    pub step_duration_secs: u32,
    /// The current step, advanced once per `Sim::step`.
    pub current_step: Step,
}

impl SimClock {
    pub fn new(step_duration_secs: u32) -> Self {
        Self { step_duration_secs, current_step: Step::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_step = Step(self.current_step.0 + 1);
    }

    /// Elapsed simulated seconds since step 0.
    #[inline]
    pub fn elapsed_secs(&self) -> u64 {
        self.current_step.0 * self.step_duration_secs as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{}s)", self.current_step, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated seconds per step.  Only used for reporting.
    pub step_duration_secs: u32,

    /// Total steps to simulate.
    pub total_steps: u64,

    /// Master RNG seed for scenario generation.  The same seed always
    /// produces the same scenario.
    pub seed: u64,

    /// Snapshot observers every N steps.  1 = every step.
    pub output_interval_steps: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            step_duration_secs:    1,
            total_steps:           100,
            seed:                  0,
            output_interval_steps: 1,
        }
    }
}

impl SimConfig {
    /// The step at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_step(&self) -> Step {
        Step(self.total_steps)
    }

    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.step_duration_secs)
    }

    /// Reject configurations the step loop cannot run.
    pub fn validate(&self) -> crate::PlResult<()> {
        if self.step_duration_secs == 0 {
            return Err(crate::PlError::Config("step_duration_secs must be > 0".into()));
        }
        if self.output_interval_steps == 0 {
            return Err(crate::PlError::Config("output_interval_steps must be > 0".into()));
        }
        Ok(())
    }
}
