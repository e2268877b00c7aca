//! `MaxSumBehavior` — the solver wired into the agent runtime.

use std::any::Any;
use std::collections::BTreeMap;

use pl_behavior::{AgentCtx, Behavior, BehaviorKind, BehaviorResult, Message, MessageKind, Payload};
use pl_core::{PlaneId, TaskId};
use pl_neighbors::NeighborTracker;
use tracing::{debug, info};

use crate::{AgentGraph, CostModel, MaxSumConfig, MaxSumError, MaxSumResult, RoundState, cost_model};

/// Distributed task allocation for one plane.
///
/// Hosts a selector for every owned task, runs one solver iteration per step
/// in `after_messages`, and hands a task off when its round settles on
/// another plane.  Depends on [`NeighborTracker`] for candidate locking and
/// link pruning.
pub struct MaxSumBehavior {
    config: MaxSumConfig,
    cost:   Box<dyn CostModel>,
    graph:  Option<AgentGraph>,
    rounds: BTreeMap<TaskId, RoundState>,
}

impl MaxSumBehavior {
    /// Validate `config` and resolve its cost strategy.
    pub fn new(config: MaxSumConfig) -> MaxSumResult<Self> {
        config.validate()?;
        let cost = cost_model(&config.cost_strategy)?;
        Ok(Self::with_cost_model(config, cost))
    }

    /// Use a custom cost model; `config.cost_strategy` is ignored.
    pub fn with_cost_model(config: MaxSumConfig, cost: Box<dyn CostModel>) -> Self {
        Self { config, cost, graph: None, rounds: BTreeMap::new() }
    }

    pub fn config(&self) -> &MaxSumConfig {
        &self.config
    }

    pub fn graph(&self) -> Option<&AgentGraph> {
        self.graph.as_ref()
    }

    pub fn round(&self, task: TaskId) -> Option<RoundState> {
        self.rounds.get(&task).copied()
    }

    /// Current winner for a hosted task, read from the latest visible bids.
    ///
    /// `None` if the task is not hosted here.  A task with no visible bids
    /// yet stays with this plane.
    pub fn decision(&self, task: TaskId) -> Option<PlaneId> {
        let graph = self.graph.as_ref()?;
        graph.selector_decision(task).map(|w| w.unwrap_or(graph.me()))
    }

    /// The task this plane's own variable currently favours.
    pub fn preferred_task(&self) -> Option<TaskId> {
        self.graph.as_ref()?.preferred_task()
    }

    fn graph_mut(&mut self) -> MaxSumResult<&mut AgentGraph> {
        self.graph.as_mut().ok_or(MaxSumError::NotInitialised)
    }

    fn teardown(&mut self, task: TaskId, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        self.rounds.remove(&task);
        for b in self.graph_mut()?.remove_selector(task)? {
            ctx.send(b, Payload::Unlink { task });
        }
        Ok(())
    }
}

impl Behavior for MaxSumBehavior {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::MAX_SUM
    }

    fn dependencies(&self) -> &'static [BehaviorKind] {
        &[BehaviorKind::NEIGHBORS]
    }

    fn handles(&self) -> &'static [MessageKind] {
        &[MessageKind::FactorValue, MessageKind::Link, MessageKind::Unlink]
    }

    fn on_init(&mut self, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        self.graph = Some(AgentGraph::new(ctx.me(), self.config.workload));
        Ok(())
    }

    fn on_task_added(&mut self, task: TaskId, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        self.graph_mut()?.attach_local_selector(task)?;
        self.rounds.insert(task, RoundState::Unattached { added_at: ctx.view.step });
        Ok(())
    }

    fn on_task_removed(&mut self, task: TaskId, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        self.teardown(task, ctx)
    }

    fn on_task_completed(&mut self, task: TaskId, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        self.teardown(task, ctx)
    }

    fn on_message(&mut self, _: MessageKind, msg: &Message, _: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        let graph = self.graph_mut()?;
        match msg.payload {
            Payload::FactorValue { binding, value } => {
                graph.receive_remote(binding, value)?;
            }
            Payload::Link { task } => {
                graph.link_remote(task, msg.sender)?;
            }
            Payload::Unlink { task } => {
                graph.unlink_remote(task, msg.sender)?;
            }
            Payload::Beacon { .. } | Payload::TaskTransfer { .. } => {}
        }
        Ok(())
    }

    fn after_messages(&mut self, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        let me = ctx.me();
        let now = ctx.view.step;
        let neighbors = ctx.deps.require::<NeighborTracker>()?.neighbors();
        let graph = self.graph.as_mut().ok_or(MaxSumError::NotInitialised)?;

        graph.prune_remote_links(|p| neighbors.contains(p))?;

        // Lock candidates for every round starting now.  Links go out before
        // this step's solver values so candidates wire up first.
        let min_guarantee = self.config.min_guarantee();
        for (&task, state) in self.rounds.iter_mut() {
            if !state.starts_round(now, self.config.cadence) {
                continue;
            }
            let candidates: Vec<PlaneId> = neighbors.guaranteed_for(me, min_guarantee).collect();
            let rewire = graph.rewire_selector(task, &candidates)?;
            for &b in &rewire.dropped {
                ctx.send(b, Payload::Unlink { task });
            }
            // Kept candidates get a refresh: one that pruned us while out of
            // range rejoins, the rest ignore it.
            for &b in &rewire.linked {
                ctx.send(b, Payload::Link { task });
            }
            *state = RoundState::Negotiating { remaining: self.config.iterations };
            debug!(
                plane = %me, task = %task,
                candidates = rewire.linked.len(), added = rewire.added.len(),
                "negotiation started"
            );
        }

        if graph.has_links() {
            for (to, payload) in graph.iterate(ctx.view.location, ctx.view.task_locations, self.cost.as_ref())? {
                ctx.send(to, payload);
            }
        }

        for (&task, state) in self.rounds.iter_mut() {
            let RoundState::Negotiating { remaining } = state else { continue };
            *remaining = remaining.saturating_sub(1);
            if *remaining > 0 {
                continue;
            }
            *state = RoundState::Settled { at: now };

            let winner = graph.selector_decision(task).flatten();
            match winner {
                Some(w) if w != me && neighbors.contains(w) => {
                    info!(plane = %me, task = %task, to = %w, "handing off task");
                    ctx.handoff(task, w);
                }
                _ => debug!(plane = %me, task = %task, "negotiation settled, keeping task"),
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
