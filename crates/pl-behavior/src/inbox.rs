//! `TaskInbox` — accepts tasks transferred to this plane.

use std::any::Any;

use crate::{AgentCtx, Behavior, BehaviorKind, BehaviorResult, Message, MessageKind, Payload};

/// Turns every `TaskTransfer` addressed to this plane into an `Accept`.
#[derive(Default, Debug)]
pub struct TaskInbox;

impl Behavior for TaskInbox {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::TASK_INBOX
    }

    fn handles(&self) -> &'static [MessageKind] {
        &[MessageKind::TaskTransfer]
    }

    fn on_message(&mut self, _: MessageKind, msg: &Message, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        if let Payload::TaskTransfer { task } = msg.payload {
            ctx.accept(task);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
