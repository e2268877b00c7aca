//! `pl-maxsum` — distributed min-sum task allocation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`inbox`]     | `Inbox`, `Edge` — double-buffered per-edge values         |
//! | [`selector`]  | `SelectorFactor`, `selector_messages` (exactly one servant) |
//! | [`workload`]  | `WorkloadFactor`, `workload_messages` (travel + load)     |
//! | [`variable`]  | `VariableFactor` — a plane's links to candidate tasks     |
//! | [`proxy`]     | `ProxyFactor` — local end of a cross-plane edge           |
//! | [`factor`]    | `Factor` tagged union                                     |
//! | [`graph`]     | `AgentGraph` — one plane's factors, wiring, iteration     |
//! | [`round`]     | `RoundState` per hosted task                              |
//! | [`behavior`]  | `MaxSumBehavior` — the solver as a runtime behavior       |
//! | [`cost`]      | `CostModel`, `TravelDistance`, `SquaredDistance`          |
//! | [`config`]    | `MaxSumConfig`, `WorkloadParams`                          |
//! | [`error`]     | `MaxSumError`, `MaxSumResult<T>`                          |
//!
//! # Graph shape
//!
//! ```text
//!  plane a                                   plane b (owner of t)
//!  W(a) ── V(a) ── P[V(a)->S(t)] ~~~~~~~~~~~ P[S(t)->V(a)] ── S(t) ── V(b) ── W(b)
//! ```
//!
//! Links are binary (serve / don't serve) and carry one scalar per
//! direction in the (ℝ, min, +) semiring:
//!
//! - `V(a) → S(t)`: cost of `a` serving `t` relative to not serving it, as
//!   computed by `W(a)` over all of `a`'s links.
//! - `S(t) → V(a)`: the best alternative servant's bid, i.e. what `a` not
//!   serving `t` saves.
//!
//! `~~~` is a `FactorValue` message over the transport.  Everything else is
//! an in-memory call.

pub mod behavior;
pub mod config;
pub mod cost;
pub mod error;
pub mod factor;
pub mod graph;
pub mod inbox;
pub mod proxy;
pub mod round;
pub mod selector;
pub mod variable;
pub mod workload;


pub use behavior::MaxSumBehavior;
pub use config::{MaxSumConfig, WorkloadParams};
pub use cost::{CostModel, SquaredDistance, TravelDistance, cost_model};
pub use error::{MaxSumError, MaxSumResult};
pub use factor::Factor;
pub use graph::{AgentGraph, Rewire};
pub use inbox::{Edge, Inbox};
pub use proxy::ProxyFactor;
pub use round::RoundState;
pub use selector::{SelectorFactor, selector_messages};
pub use variable::VariableFactor;
pub use workload::{WorkloadFactor, workload_messages};
