//! Solver configuration.

use crate::{MaxSumError, MaxSumResult, cost};

/// Parameters of the load penalty `g(s) = k·s^α` for serving `s` tasks.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkloadParams {
    pub k:     f64,
    pub alpha: f64,
}

impl Default for WorkloadParams {
    fn default() -> Self {
        Self { k: 1.0, alpha: 2.0 }
    }
}

impl WorkloadParams {
    /// `g(s)`, with `g(0) = 0`.
    #[inline]
    pub fn cardinality_cost(&self, s: usize) -> f64 {
        if s == 0 { 0.0 } else { self.k * (s as f64).powf(self.alpha) }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaxSumConfig {
    /// Solver iterations per negotiation round.  One iteration runs per step.
    pub iterations:    u32,

    /// Steps a settled task waits before it is renegotiated.
    pub cadence:       u32,

    /// Minimum neighbor guarantee for a plane to become a candidate.
    /// `None` means `iterations + 1`: every candidate provably stays in range
    /// for the whole round.
    pub min_guarantee: Option<u32>,

    pub workload:      WorkloadParams,

    /// Name of the [`CostModel`](crate::CostModel) supplying potentials.
    pub cost_strategy: String,
}

impl Default for MaxSumConfig {
    fn default() -> Self {
        Self {
            iterations:    8,
            cadence:       20,
            min_guarantee: None,
            workload:      WorkloadParams::default(),
            cost_strategy: cost::TRAVEL_DISTANCE.to_string(),
        }
    }
}

impl MaxSumConfig {
    #[inline]
    pub fn min_guarantee(&self) -> u32 {
        self.min_guarantee.unwrap_or(self.iterations.saturating_add(1))
    }

    pub fn validate(&self) -> MaxSumResult<()> {
        if self.iterations == 0 {
            return Err(MaxSumError::InvalidConfig("iterations must be >= 1".into()));
        }
        if self.cadence == 0 {
            return Err(MaxSumError::InvalidConfig("cadence must be >= 1".into()));
        }
        if self.min_guarantee == Some(0) {
            return Err(MaxSumError::InvalidConfig("min_guarantee must be >= 1".into()));
        }
        let WorkloadParams { k, alpha } = self.workload;
        if !(k.is_finite() && k >= 0.0) {
            return Err(MaxSumError::InvalidConfig(format!("workload k = {k} must be finite and >= 0")));
        }
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(MaxSumError::InvalidConfig(format!("workload alpha = {alpha} must be finite and > 0")));
        }
        cost::cost_model(&self.cost_strategy).map(|_| ())
    }
}
