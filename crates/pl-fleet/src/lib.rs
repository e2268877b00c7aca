//! `pl-fleet` — Structure-of-Arrays storage for planes and tasks.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`store`]     | `FleetStore` (plane SoA arrays), `TaskStore`            |
//! | [`builder`]   | `FleetBuilder` (fluent construction of both stores)     |
//!
//! Behavior stacks are *not* stored here: the simulation keeps them in a
//! parallel `Vec` so that a plane's behaviors can be mutated while the stores
//! are borrowed read-only.

pub mod builder;
pub mod store;

#[cfg(test)]
mod tests;

pub use builder::{FleetBuilder, PlaneSpec};
pub use store::{FleetStore, TaskStore};
