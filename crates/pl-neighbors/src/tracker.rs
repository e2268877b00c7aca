//! `NeighborTracker` — the beacon protocol as a behavior.

use std::any::Any;

use pl_behavior::{AgentCtx, Behavior, BehaviorKind, BehaviorResult, Message, MessageKind, Payload};
use pl_core::Point;
use tracing::trace;

use crate::{Guarantee, NeighborSet};

/// Broadcasts a beacon after every step and turns the beacons it hears into
/// a [`NeighborSet`].
///
/// Overhears every beacon in range: beacons have no recipient, so the
/// tracker handles them whoever else is listening.  Other message kinds are
/// not treated as evidence of range.
#[derive(Debug, Default)]
pub struct NeighborTracker {
    /// Own position when the last beacon was sent.  Beacons heard this step
    /// were sent at the same instant, so distances compare like with like.
    last_location: Option<Point>,
    neighbors:     NeighborSet,
}

impl NeighborTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn neighbors(&self) -> &NeighborSet {
        &self.neighbors
    }
}

impl Behavior for NeighborTracker {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::NEIGHBORS
    }

    fn handles(&self) -> &'static [MessageKind] {
        &[MessageKind::Beacon]
    }

    fn promiscuous(&self) -> bool {
        true
    }

    fn on_init(&mut self, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        self.neighbors.reset(ctx.me());
        Ok(())
    }

    fn pre_step(&mut self, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        self.neighbors.reset(ctx.me());
        Ok(())
    }

    fn on_message(&mut self, _: MessageKind, msg: &Message, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        let Payload::Beacon { location, speed } = msg.payload else { return Ok(()) };
        if msg.sender == ctx.me() {
            return Ok(());
        }

        let own = self.last_location.unwrap_or(ctx.view.location);
        let d = own.distance(location);
        let s = ctx.view.speed + speed.filter(|v| v.is_finite()).unwrap_or(ctx.view.speed);
        match Guarantee::from_beacon(d, s, ctx.view.comm_range) {
            Some(g) => self.neighbors.record(msg.sender, g),
            None => {
                trace!(plane = %ctx.me(), from = %msg.sender, d, "beacon outside guaranteed range");
                self.neighbors.drop_plane(msg.sender);
            }
        }
        Ok(())
    }

    fn post_step(&mut self, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        self.last_location = Some(ctx.view.location);
        ctx.broadcast(Payload::Beacon { location: ctx.view.location, speed: Some(ctx.view.speed) });
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
