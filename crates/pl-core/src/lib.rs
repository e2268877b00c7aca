//! `pl-core` — foundational types for the plane fleet simulator.
//!
//! Every other `pl-*` crate depends on this one.  It has no `pl-*`
//! dependencies and minimal external ones (`rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `PlaneId`, `TaskId`, `LogicalId`, `FactorId`              |
//! | [`geo`]     | `Point`, Euclidean distance, straight-line stepping       |
//! | [`time`]    | `Step`, `SimClock`, `SimConfig`                           |
//! | [`rng`]     | `SimRng` for scenario generation                          |
//! | [`error`]   | `PlError`, `PlResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{PlError, PlResult};
pub use geo::Point;
pub use ids::{FactorId, LogicalId, PlaneId, TaskId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Step};
