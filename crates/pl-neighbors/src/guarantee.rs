//! How many more steps two planes are provably within radio range.
//!
//! Two planes at distance `d` that each move at most their speed per step
//! close or open the gap by at most `s = own_speed + other_speed` per step.
//! After `n` steps the distance is at most `d + s·n`, so the pair is still in
//! range for every `n` with `d + s·n < R`.  The guarantee is the largest such
//! `n`:
//!
//! ```text
//! d + s·n < R ≤ d + s·(n + 1)
//! ```

use std::fmt;

/// Steps for which a neighbor is guaranteed to stay in range.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Guarantee(pub u32);

impl Guarantee {
    /// Never leaves range: self, or a pair that cannot move.
    pub const UNBOUNDED: Guarantee = Guarantee(u32::MAX);

    /// Largest finite guarantee.  Larger step counts are clamped to it.
    pub const MAX_FINITE: Guarantee = Guarantee(u32::MAX - 1);

    #[inline]
    pub fn is_unbounded(self) -> bool {
        self == Self::UNBOUNDED
    }

    /// `true` if the neighbor stays in range for at least `steps` steps.
    #[inline]
    pub fn covers(self, steps: u32) -> bool {
        self.0 >= steps
    }

    /// Guarantee for a beacon heard at distance `d` with combined speed `s`
    /// and receiver range `range`.
    ///
    /// `None` means the sender must not be recorded (`n ≤ 0`, or already out
    /// of range).  A non-finite distance or range is treated as out of range.
    pub fn from_beacon(d: f64, s: f64, range: f64) -> Option<Guarantee> {
        if !(d < range) || !d.is_finite() || !range.is_finite() {
            return None;
        }
        if s <= 0.0 {
            return Some(Self::UNBOUNDED);
        }
        match steps_within(d, s, range) {
            0 => None,
            n => Some(Guarantee(n.min(Self::MAX_FINITE.0 as u64) as u32)),
        }
    }
}

impl fmt::Display for Guarantee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() { f.write_str("∞") } else { write!(f, "{}", self.0) }
    }
}

/// Largest `n ≥ 0` with `d + s·n < range`.
///
/// Requires `d < range` and `s > 0`.  The float estimate is corrected with
/// the exact predicate so the result never misses a boundary by one.  Results
/// at or above `Guarantee::MAX_FINITE` are returned clamped.
pub fn steps_within(d: f64, s: f64, range: f64) -> u64 {
    let cap = Guarantee::MAX_FINITE.0 as u64;
    let inside = |n: u64| d + s * (n as f64) < range;

    let estimate = ((range - d) / s).ceil() - 1.0;
    if !(estimate < cap as f64) {
        // NaN speeds land here too; they can never satisfy `inside`.
        return if inside(cap) { cap } else { 0 };
    }

    let mut n = estimate.max(0.0) as u64;
    while n > 0 && !inside(n) {
        n -= 1;
    }
    while n < cap && inside(n + 1) {
        n += 1;
    }
    n
}
