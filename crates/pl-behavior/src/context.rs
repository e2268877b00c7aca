//! Per-call context handed to every behavior hook.

use std::any::type_name;
use std::collections::BTreeSet;

use pl_core::{PlaneId, Point, Step, TaskId};

use crate::{Behavior, BehaviorError, BehaviorKind, BehaviorResult, Effect, Payload};

/// Read-only view of the calling plane and the world it can see.
#[derive(Clone, Copy, Debug)]
pub struct AgentView<'a> {
    pub me:             PlaneId,
    pub step:           Step,
    pub location:       Point,
    pub speed:          f64,
    pub comm_range:     f64,
    pub owned:          &'a BTreeSet<TaskId>,
    /// Every task's fixed location, indexed by `TaskId`.
    pub task_locations: &'a [Point],
}

/// The declared dependencies of the calling behavior.
///
/// Dependencies always precede their dependents in the stack, so `Deps`
/// borrows the already-run prefix of the stack and only hands out behaviors
/// whose kind the caller declared.
#[derive(Clone, Copy)]
pub struct Deps<'a> {
    caller:   BehaviorKind,
    declared: &'static [BehaviorKind],
    earlier:  &'a [Box<dyn Behavior>],
}

impl<'a> Deps<'a> {
    pub(crate) fn new(
        caller:   BehaviorKind,
        declared: &'static [BehaviorKind],
        earlier:  &'a [Box<dyn Behavior>],
    ) -> Self {
        Self { caller, declared, earlier }
    }

    /// No dependencies at all.  For driving a behavior outside a stack.
    pub fn none(caller: BehaviorKind) -> Self {
        Self { caller, declared: &[], earlier: &[] }
    }

    /// The declared dependency of concrete type `T`, if any.
    pub fn get<T: Behavior>(&self) -> Option<&'a T> {
        self.earlier
            .iter()
            .filter(|b| self.declared.contains(&b.kind()))
            .find_map(|b| b.as_any().downcast_ref::<T>())
    }

    /// Like [`get`](Self::get) but a missing dependency is an error.
    pub fn require<T: Behavior>(&self) -> BehaviorResult<&'a T> {
        self.get::<T>().ok_or(BehaviorError::MissingDependencyState {
            behavior:  self.caller,
            type_name: type_name::<T>(),
        })
    }
}

/// Everything a hook may read or request.
pub struct AgentCtx<'a> {
    pub view: AgentView<'a>,
    pub deps: Deps<'a>,
    effects:  &'a mut Vec<Effect>,
}

impl<'a> AgentCtx<'a> {
    pub fn new(view: AgentView<'a>, deps: Deps<'a>, effects: &'a mut Vec<Effect>) -> Self {
        Self { view, deps, effects }
    }

    #[inline]
    pub fn me(&self) -> PlaneId {
        self.view.me
    }

    pub fn send(&mut self, recipient: PlaneId, payload: Payload) {
        self.effects.push(Effect::Send { recipient: Some(recipient), payload });
    }

    pub fn broadcast(&mut self, payload: Payload) {
        self.effects.push(Effect::Send { recipient: None, payload });
    }

    pub fn handoff(&mut self, task: TaskId, to: PlaneId) {
        self.effects.push(Effect::Handoff { task, to });
    }

    pub fn accept(&mut self, task: TaskId) {
        self.effects.push(Effect::Accept { task });
    }
}
