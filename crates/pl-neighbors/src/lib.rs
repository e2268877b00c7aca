//! `pl-neighbors` — which planes are provably in range, and for how long.
//!
//! | Module          | Contents                                           |
//! |-----------------|----------------------------------------------------|
//! | [`guarantee`]   | `Guarantee`, `steps_within` (exact boundary math)  |
//! | [`set`]         | `NeighborSet` — rebuilt every step                 |
//! | [`tracker`]     | `NeighborTracker` behavior (beacons in and out)    |

pub mod guarantee;
pub mod set;
pub mod tracker;


pub use guarantee::{Guarantee, steps_within};
pub use set::NeighborSet;
pub use tracker::NeighborTracker;
