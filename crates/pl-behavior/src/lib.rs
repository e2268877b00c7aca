//! `pl-behavior` — the agent runtime contracts.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`kind`]     | `BehaviorKind` identifiers                                     |
//! | [`message`]  | `MessageKind` (closed, hierarchical), `Payload`, `Message`, `ProxyBinding` |
//! | [`dispatch`] | `DispatchTable` — message kind → declared handler kind         |
//! | [`order`]    | `dependency_order` — deterministic topological sort            |
//! | [`behavior`] | `Behavior` trait                                               |
//! | [`context`]  | `AgentView`, `Deps`, `AgentCtx`                                |
//! | [`effect`]   | `Effect` (`Send`, `Handoff`, `Accept`)                         |
//! | [`stack`]    | `BehaviorStack` — ordered behaviors + tables, phase drivers    |
//! | [`inbox`]    | `TaskInbox` built-in behavior                                  |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                           |
//!
//! # Design notes
//!
//! Behaviors never talk to each other directly.  Within a plane a behavior
//! reads its declared dependencies through `AgentCtx::deps`; across planes
//! everything travels as a `Message` over the simulation's transport.  All
//! requested side effects are returned as `Effect`s and applied by the
//! simulation in emission order, which keeps every hook free of borrows into
//! simulation state.

pub mod behavior;
pub mod context;
pub mod dispatch;
pub mod effect;
pub mod error;
pub mod inbox;
pub mod kind;
pub mod message;
pub mod order;
pub mod stack;


pub use behavior::Behavior;
pub use context::{AgentCtx, AgentView, Deps};
pub use dispatch::DispatchTable;
pub use effect::Effect;
pub use error::{BehaviorError, BehaviorResult};
pub use inbox::TaskInbox;
pub use kind::BehaviorKind;
pub use message::{Message, MessageKind, Payload, ProxyBinding};
pub use order::dependency_order;
pub use stack::{BehaviorStack, Phase, TaskHook};
