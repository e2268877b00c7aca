//! Workload factor: travel cost plus a load penalty over all of a plane's
//! candidate tasks.
//!
//! # Message computation
//!
//! Each link `u` is a binary variable (serve / don't serve) with potential
//! `p_u` and incoming message `o_u`, so switching it on costs
//! `c_u = p_u − o_u`.  The factor adds `g(s)` for `s` links on.  The message
//! to link `t` is the min-cost difference between `t` on and `t` off, taken
//! over every setting of the other links:
//!
//! ```text
//! out_t = p_t + min_S [Σ_S c + g(|S|+1)] − min_S [Σ_S c + g(|S|)]
//! ```
//!
//! For a fixed `|S| = j` the best `S` is the `j` cheapest other links, so
//! with the free costs sorted ascending and prefix sums `P`, both minima are
//! minima over `j` of `P'_j + g(…)`, where `P'` skips `t`.  For `t` at rank
//! `r`, `P'_j = P_j` for `j ≤ r` and `P'_j = P_{j+1} − c_t` beyond, so
//! prefix minima from the left and suffix minima from the right give every
//! `out_t` in O(1) after an O(n log n) sort.
//!
//! Links whose incoming value is `+∞` are forced on: they are left out of
//! the sort and shift every cardinality by the number of forced links.

use pl_core::{PlaneId, Point};

use crate::{CostModel, WorkloadParams};

/// Outgoing workload messages for every link.
///
/// `incoming[i]` is the message received on link `i`; callers substitute
/// `0.0` for links not yet heard from.
pub fn workload_messages(potentials: &[f64], incoming: &[f64], params: WorkloadParams) -> Vec<f64> {
    debug_assert_eq!(potentials.len(), incoming.len());
    let n = potentials.len();
    let g = |s: usize| params.cardinality_cost(s);

    let mut free: Vec<(f64, usize)> = Vec::with_capacity(n);
    let mut forced = vec![false; n];
    for i in 0..n {
        if incoming[i] == f64::INFINITY {
            forced[i] = true;
        } else {
            free.push((potentials[i] - incoming[i], i));
        }
    }
    free.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    let nf = n - free.len();
    let m = free.len();

    let mut prefix = vec![0.0; m + 1];
    for (j, &(c, _)) in free.iter().enumerate() {
        prefix[j + 1] = prefix[j] + c;
    }

    let mut rank = vec![usize::MAX; n];
    for (r, &(_, i)) in free.iter().enumerate() {
        rank[i] = r;
    }

    // Left: best over j ≤ r of P_j + g(j + nf + 1) (t on) and g(j + nf) (t off).
    let mut left_on = vec![f64::INFINITY; m];
    let mut left_off = vec![f64::INFINITY; m];
    let (mut on, mut off) = (f64::INFINITY, f64::INFINITY);
    for r in 0..m {
        on = on.min(prefix[r] + g(r + nf + 1));
        off = off.min(prefix[r] + g(r + nf));
        left_on[r] = on;
        left_off[r] = off;
    }

    // Right: best over q ≥ idx of P_q + g(q + nf) (t on) and g(q + nf − 1) (t off).
    let mut right_on = vec![f64::INFINITY; m + 2];
    let mut right_off = vec![f64::INFINITY; m + 2];
    for q in (1..=m).rev() {
        right_on[q] = right_on[q + 1].min(prefix[q] + g(q + nf));
        right_off[q] = right_off[q + 1].min(prefix[q] + g(q + nf - 1));
    }

    // A forced link sees the other nf − 1 forced links plus any prefix of free ones.
    let (forced_on, forced_off) = if nf > 0 {
        (0..=m).fold((f64::INFINITY, f64::INFINITY), |(a, b), j| {
            (a.min(prefix[j] + g(j + nf)), b.min(prefix[j] + g(j + nf - 1)))
        })
    } else {
        (f64::INFINITY, f64::INFINITY)
    };

    (0..n)
        .map(|t| {
            let (on, off) = if forced[t] {
                (forced_on, forced_off)
            } else {
                let r = rank[t];
                let c = potentials[t] - incoming[t];
                (
                    left_on[r].min(right_on[r + 2] - c),
                    left_off[r].min(right_off[r + 2] - c),
                )
            };
            potentials[t] + on - off
        })
        .collect()
}

/// Per-plane factor scoring the plane's variable links.
///
/// Co-located with the plane's variable and aligned with its links: entry
/// `i` of `potentials` and of the last messages belongs to link `i`.
#[derive(Clone, Debug)]
pub struct WorkloadFactor {
    plane:      PlaneId,
    params:     WorkloadParams,
    potentials: Vec<f64>,
    messages:   Vec<f64>,
}

impl WorkloadFactor {
    pub fn new(plane: PlaneId, params: WorkloadParams) -> Self {
        Self { plane, params, potentials: Vec::new(), messages: Vec::new() }
    }

    #[inline]
    pub fn plane(&self) -> PlaneId {
        self.plane
    }

    /// Refresh potentials for the plane at `here` and the link targets, then
    /// compute one message per link from the visible `incoming` values.
    pub fn scatter(
        &mut self,
        here:     Point,
        targets:  &[Point],
        cost:     &dyn CostModel,
        incoming: &[Option<f64>],
    ) -> &[f64] {
        self.potentials = targets.iter().map(|&t| cost.cost(here, t)).collect();
        let heard: Vec<f64> = incoming.iter().map(|v| v.unwrap_or(0.0)).collect();
        self.messages = workload_messages(&self.potentials, &heard, self.params);
        &self.messages
    }

    pub fn potentials(&self) -> &[f64] {
        &self.potentials
    }

    pub fn messages(&self) -> &[f64] {
        &self.messages
    }
}
