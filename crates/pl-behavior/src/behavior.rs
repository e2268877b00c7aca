//! The `Behavior` trait — the extension point for per-plane logic.

use std::any::Any;

use pl_core::TaskId;

use crate::{AgentCtx, BehaviorKind, BehaviorResult, Message, MessageKind};

/// Reactive per-plane logic driven by the five-phase step.
///
/// ```text
/// pre_step → before_messages → on_message* → after_messages → … → post_step
/// ```
///
/// `pre_step` and `post_step` run as population-wide barriers; the three
/// middle phases run plane by plane.  Within a plane, every hook is called on
/// behaviors in dependency order, so a behavior always sees its
/// dependencies' state from the same phase of the same step.
///
/// # Dispatch
///
/// [`handles`](Self::handles) lists the message kinds the behavior wants.
/// A message is delivered to [`on_message`](Self::on_message) with the
/// *declared* kind it resolved to, which may be an ancestor of the message's
/// own kind.  Messages that resolve to nothing are silently skipped.
///
/// All hooks default to no-ops.
pub trait Behavior: Any {
    fn kind(&self) -> BehaviorKind;

    /// Kinds that must run before this behavior and that it may read
    /// through [`AgentCtx::deps`](crate::AgentCtx).
    fn dependencies(&self) -> &'static [BehaviorKind] {
        &[]
    }

    fn handles(&self) -> &'static [MessageKind] {
        &[]
    }

    /// Promiscuous behaviors also see messages addressed to other planes
    /// that happened to be in radio range.
    fn promiscuous(&self) -> bool {
        false
    }

    fn on_init(&mut self, _ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        Ok(())
    }

    fn pre_step(&mut self, _ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        Ok(())
    }

    fn before_messages(&mut self, _ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        Ok(())
    }

    fn on_message(
        &mut self,
        _handler: MessageKind,
        _msg:     &Message,
        _ctx:     &mut AgentCtx<'_>,
    ) -> BehaviorResult<()> {
        Ok(())
    }

    fn after_messages(&mut self, _ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        Ok(())
    }

    fn post_step(&mut self, _ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        Ok(())
    }

    fn on_task_added(&mut self, _task: TaskId, _ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        Ok(())
    }

    fn on_task_removed(&mut self, _task: TaskId, _ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        Ok(())
    }

    fn on_task_completed(&mut self, _task: TaskId, _ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        Ok(())
    }

    /// Needed by `Deps` to hand out concrete dependency types.
    fn as_any(&self) -> &dyn Any;
}
