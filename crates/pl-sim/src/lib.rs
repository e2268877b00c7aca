//! `pl-sim` — step loop orchestrator for the plane fleet simulator.
//!
//! # Step loop
//!
//! ```text
//! for step in 0..config.total_steps:
//!   ① PreStep        — every plane, ascending PlaneId
//!   ② Messages       — per plane: BeforeMessages, dispatch inbox, AfterMessages
//!   ③ Motion         — move planes, complete tasks reached
//!   ④ PostStep       — every plane (beacons go out here)
//!   ⑤ Delivery       — range-limited, from final positions; visible at step+1
//! ```
//!
//! Effects (`Send`, `Handoff`, `Accept`) are applied right after the hook
//! that requested them.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pl_core::SimConfig;
//! use pl_fleet::{FleetBuilder, PlaneSpec};
//! use pl_maxsum::MaxSumConfig;
//! use pl_sim::{NoopObserver, SimBuilder, planning_stack};
//!
//! let (fleet, tasks) = FleetBuilder::new().plane(..).task(..).build()?;
//! let stacks = (0..fleet.count)
//!     .map(|_| planning_stack(&MaxSumConfig::default()))
//!     .collect::<Result<_, _>>()?;
//! let mut sim = SimBuilder::new(SimConfig::default(), fleet, tasks, stacks).build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod motion;
pub mod observer;
pub mod sim;
pub mod transport;

#[cfg(test)]
mod tests;

pub use builder::{SimBuilder, planning_stack};
pub use error::{SimError, SimResult};
pub use motion::{Motion, Stationary, StraightLine};
pub use observer::{NoopObserver, SimObserver, StepStats, TaskEvent};
pub use sim::Sim;
pub use transport::{Delivery, Transport};
