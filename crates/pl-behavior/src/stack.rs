//! A plane's ordered behavior list.

use pl_core::TaskId;

use crate::order::dependency_order;
use crate::{AgentCtx, AgentView, Behavior, BehaviorKind, BehaviorResult, Deps, DispatchTable, Effect, Message};

/// Step phases that call every behavior exactly once.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Phase {
    Init,
    PreStep,
    BeforeMessages,
    AfterMessages,
    PostStep,
}

/// Ownership changes reported to every behavior.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TaskHook {
    Added(TaskId),
    Removed(TaskId),
    Completed(TaskId),
}

/// Behaviors of one plane in dependency order, each with its dispatch table.
///
/// The order and the tables are fixed at construction.
pub struct BehaviorStack {
    behaviors:   Vec<Box<dyn Behavior>>,
    tables:      Vec<DispatchTable>,
    promiscuous: Vec<bool>,
}

impl BehaviorStack {
    /// Sort `registered` by dependencies and build the dispatch tables.
    ///
    /// Fails on duplicate kinds, undeclared dependencies and cycles.
    pub fn new(registered: Vec<Box<dyn Behavior>>) -> BehaviorResult<Self> {
        let entries: Vec<_> = registered.iter().map(|b| (b.kind(), b.dependencies())).collect();
        let order = dependency_order(&entries)?;

        let mut slots: Vec<Option<Box<dyn Behavior>>> = registered.into_iter().map(Some).collect();
        let behaviors: Vec<Box<dyn Behavior>> =
            order.iter().filter_map(|&i| slots[i].take()).collect();
        let tables = behaviors.iter().map(|b| DispatchTable::new(b.handles())).collect();
        let promiscuous = behaviors.iter().map(|b| b.promiscuous()).collect();

        Ok(Self { behaviors, tables, promiscuous })
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    /// Kinds in execution order.
    pub fn kinds(&self) -> impl Iterator<Item = BehaviorKind> + '_ {
        self.behaviors.iter().map(|b| b.kind())
    }

    /// First behavior of concrete type `T`.
    pub fn get<T: Behavior>(&self) -> Option<&T> {
        self.behaviors.iter().find_map(|b| b.as_any().downcast_ref::<T>())
    }

    pub fn run_phase(
        &mut self,
        phase:   Phase,
        view:    AgentView<'_>,
        effects: &mut Vec<Effect>,
    ) -> BehaviorResult<()> {
        self.each(view, effects, |b, ctx| match phase {
            Phase::Init => b.on_init(ctx),
            Phase::PreStep => b.pre_step(ctx),
            Phase::BeforeMessages => b.before_messages(ctx),
            Phase::AfterMessages => b.after_messages(ctx),
            Phase::PostStep => b.post_step(ctx),
        })
    }

    pub fn task_hook(
        &mut self,
        hook:    TaskHook,
        view:    AgentView<'_>,
        effects: &mut Vec<Effect>,
    ) -> BehaviorResult<()> {
        self.each(view, effects, |b, ctx| match hook {
            TaskHook::Added(t) => b.on_task_added(t, ctx),
            TaskHook::Removed(t) => b.on_task_removed(t, ctx),
            TaskHook::Completed(t) => b.on_task_completed(t, ctx),
        })
    }

    /// Deliver one message to every interested behavior.
    ///
    /// Returns the number of handler calls made.
    pub fn dispatch(
        &mut self,
        msg:     &Message,
        view:    AgentView<'_>,
        effects: &mut Vec<Effect>,
    ) -> BehaviorResult<usize> {
        let kind = msg.kind();
        let for_me = msg.is_for(view.me);
        let mut calls = 0;
        for i in 0..self.behaviors.len() {
            if !for_me && !self.promiscuous[i] {
                continue;
            }
            let Some(handler) = self.tables[i].resolve(kind) else { continue };
            let (earlier, rest) = self.behaviors.split_at_mut(i);
            let b = &mut rest[0];
            let deps = Deps::new(b.kind(), b.dependencies(), earlier);
            let mut ctx = AgentCtx::new(view, deps, effects);
            b.on_message(handler, msg, &mut ctx)?;
            calls += 1;
        }
        Ok(calls)
    }

    fn each<F>(&mut self, view: AgentView<'_>, effects: &mut Vec<Effect>, mut f: F) -> BehaviorResult<()>
    where
        F: FnMut(&mut dyn Behavior, &mut AgentCtx<'_>) -> BehaviorResult<()>,
    {
        for i in 0..self.behaviors.len() {
            let (earlier, rest) = self.behaviors.split_at_mut(i);
            let b = &mut rest[0];
            let deps = Deps::new(b.kind(), b.dependencies(), earlier);
            let mut ctx = AgentCtx::new(view, deps, effects);
            f(b.as_mut(), &mut ctx)?;
        }
        Ok(())
    }
}
