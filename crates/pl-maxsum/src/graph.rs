//! One plane's share of the global factor graph.

use std::collections::BTreeMap;

use pl_behavior::{Payload, ProxyBinding};
use pl_core::{FactorId, LogicalId, PlaneId, Point, TaskId};
use tracing::{debug, trace};

use crate::{
    CostModel, Factor, MaxSumError, MaxSumResult, ProxyFactor, SelectorFactor, VariableFactor,
    WorkloadFactor, WorkloadParams,
};

/// Result of re-locking a selector's candidates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rewire {
    /// Remote candidates after the rewire, in the order given.
    pub linked:  Vec<PlaneId>,
    /// The subset of `linked` that was not a candidate before.
    pub added:   Vec<PlaneId>,
    /// Remote candidates that were removed.
    pub dropped: Vec<PlaneId>,
}

/// The factors owned by one plane.
///
/// Always holds the plane's variable `V(me)` and workload `W(me)`; holds a
/// selector `S(t)` for every owned task and a proxy for every logical edge
/// whose far end lives on another plane.  A proxy's id is the logical edge
/// it realises, `(local end, remote end)`.
#[derive(Clone, Debug)]
pub struct AgentGraph {
    me:      PlaneId,
    factors: BTreeMap<FactorId, Factor>,
}

impl AgentGraph {
    pub fn new(me: PlaneId, params: WorkloadParams) -> Self {
        let mut factors = BTreeMap::new();
        factors.insert(FactorId::Variable(me), Factor::Variable(VariableFactor::new(me)));
        factors.insert(FactorId::Workload(me), Factor::Workload(WorkloadFactor::new(me, params)));
        Self { me, factors }
    }

    #[inline]
    pub fn me(&self) -> PlaneId {
        self.me
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn factor(&self, id: FactorId) -> Option<&Factor> {
        self.factors.get(&id)
    }

    pub fn factors(&self) -> impl Iterator<Item = &Factor> + '_ {
        self.factors.values()
    }

    pub fn variable(&self) -> MaxSumResult<&VariableFactor> {
        match self.factors.get(&FactorId::Variable(self.me)) {
            Some(Factor::Variable(v)) => Ok(v),
            _ => Err(MaxSumError::Wiring(format!("{} has no variable factor", self.me))),
        }
    }

    fn variable_mut(&mut self) -> MaxSumResult<&mut VariableFactor> {
        match self.factors.get_mut(&FactorId::Variable(self.me)) {
            Some(Factor::Variable(v)) => Ok(v),
            _ => Err(MaxSumError::Wiring(format!("{} has no variable factor", self.me))),
        }
    }

    fn workload_mut(&mut self) -> MaxSumResult<&mut WorkloadFactor> {
        match self.factors.get_mut(&FactorId::Workload(self.me)) {
            Some(Factor::Workload(w)) => Ok(w),
            _ => Err(MaxSumError::Wiring(format!("{} has no workload factor", self.me))),
        }
    }

    pub fn selector(&self, task: TaskId) -> Option<&SelectorFactor> {
        match self.factors.get(&FactorId::Selector(task)) {
            Some(Factor::Selector(s)) => Some(s),
            _ => None,
        }
    }

    fn selector_mut(&mut self, task: TaskId) -> MaxSumResult<&mut SelectorFactor> {
        match self.factors.get_mut(&FactorId::Selector(task)) {
            Some(Factor::Selector(s)) => Ok(s),
            _ => Err(MaxSumError::Wiring(format!("{} does not host S[{}]", self.me, task.0))),
        }
    }

    pub fn proxy(&self, local: LogicalId, remote: LogicalId) -> Option<&ProxyFactor> {
        match self.factors.get(&FactorId::Proxy { local, remote }) {
            Some(Factor::Proxy(p)) => Some(p),
            _ => None,
        }
    }

    pub fn proxy_count(&self) -> usize {
        self.factors.values().filter(|f| matches!(f, Factor::Proxy(_))).count()
    }

    /// `true` if any solver edge exists, i.e. iterating does something.
    pub fn has_links(&self) -> bool {
        self.variable().is_ok_and(|v| v.link_count() > 0)
    }

    // ── Local selectors ───────────────────────────────────────────────────

    /// Host `S(task)` with this plane as its only candidate.
    ///
    /// Replaces any remote link this plane had to a previous host of the
    /// same task.
    pub fn attach_local_selector(&mut self, task: TaskId) -> MaxSumResult<()> {
        let me = self.me;
        let (v_id, s_id) = (LogicalId::Variable(me), LogicalId::Selector(task));
        self.factors.remove(&FactorId::Proxy { local: v_id, remote: s_id });
        self.variable_mut()?.add_link(task);
        self.factors
            .entry(FactorId::Selector(task))
            .or_insert_with(|| Factor::Selector(SelectorFactor::new(task, me)));
        debug!(plane = %me, task = %task, "selector attached");
        Ok(())
    }

    /// Tear down `S(task)` and its proxies.
    ///
    /// Returns the remote candidates, each of which must be told to unlink.
    pub fn remove_selector(&mut self, task: TaskId) -> MaxSumResult<Vec<PlaneId>> {
        let me = self.me;
        let Some(Factor::Selector(s)) = self.factors.remove(&FactorId::Selector(task)) else {
            return Ok(Vec::new());
        };
        let remote: Vec<PlaneId> = s.candidates().filter(|&p| p != me).collect();
        let s_id = LogicalId::Selector(task);
        for &b in &remote {
            self.factors.remove(&FactorId::Proxy { local: s_id, remote: LogicalId::Variable(b) });
        }
        self.variable_mut()?.remove_link(task);
        debug!(plane = %me, task = %task, candidates = remote.len(), "selector removed");
        Ok(remote)
    }

    /// Lock `S(task)`'s candidates to `candidates` plus this plane.
    ///
    /// Only the difference is rewired: kept candidates keep their last
    /// values, dropped ones are retired, new ones get a fresh proxy.
    pub fn rewire_selector(&mut self, task: TaskId, candidates: &[PlaneId]) -> MaxSumResult<Rewire> {
        let me = self.me;
        let s_id = LogicalId::Selector(task);
        let s = self.selector_mut(task)?;

        let dropped: Vec<PlaneId> =
            s.candidates().filter(|p| *p != me && !candidates.contains(p)).collect();
        for &b in &dropped {
            s.remove_candidate(b);
        }
        let mut linked = Vec::with_capacity(candidates.len());
        let mut added = Vec::new();
        for &b in candidates.iter().filter(|&&b| b != me) {
            if s.add_candidate(b) {
                added.push(b);
            }
            linked.push(b);
        }

        for &b in &dropped {
            self.factors.remove(&FactorId::Proxy { local: s_id, remote: LogicalId::Variable(b) });
        }
        for &b in &linked {
            let binding = ProxyBinding {
                logical_from:  s_id,
                logical_to:    LogicalId::Variable(b),
                physical_from: me,
                physical_to:   b,
            };
            self.factors
                .entry(FactorId::Proxy { local: s_id, remote: binding.logical_to })
                .or_insert_with(|| Factor::Proxy(ProxyFactor::new(binding)));
        }

        debug!(plane = %me, task = %task, added = ?added, dropped = ?dropped, "selector rewired");
        Ok(Rewire { linked, added, dropped })
    }

    // ── Remote links ──────────────────────────────────────────────────────

    /// Become a candidate for `task`, whose selector lives on `host`.
    ///
    /// Re-linking to a new host rebinds the existing proxy.  Returns `false`
    /// if this plane hosts the selector itself.
    pub fn link_remote(&mut self, task: TaskId, host: PlaneId) -> MaxSumResult<bool> {
        let me = self.me;
        if host == me || self.factors.contains_key(&FactorId::Selector(task)) {
            debug!(plane = %me, task = %task, host = %host, "ignoring link for a locally hosted task");
            return Ok(false);
        }
        let binding = ProxyBinding {
            logical_from:  LogicalId::Variable(me),
            logical_to:    LogicalId::Selector(task),
            physical_from: me,
            physical_to:   host,
        };
        let id = FactorId::Proxy { local: binding.logical_from, remote: binding.logical_to };
        match self.factors.get(&id) {
            Some(Factor::Proxy(p)) if p.host() == host => {}
            _ => {
                self.factors.insert(id, Factor::Proxy(ProxyFactor::new(binding)));
            }
        }
        self.variable_mut()?.add_link(task);
        Ok(true)
    }

    /// Stop being a candidate for `task` if `host` is the host we know.
    pub fn unlink_remote(&mut self, task: TaskId, host: PlaneId) -> MaxSumResult<bool> {
        let id = FactorId::Proxy { local: LogicalId::Variable(self.me), remote: LogicalId::Selector(task) };
        match self.factors.get(&id) {
            Some(Factor::Proxy(p)) if p.host() == host => {}
            _ => return Ok(false),
        }
        self.factors.remove(&id);
        let v = self.variable_mut()?;
        v.remove_link(task);
        v.retire(task);
        Ok(true)
    }

    /// Unlink every remote task whose host fails `keep`.
    pub fn prune_remote_links(&mut self, keep: impl Fn(PlaneId) -> bool) -> MaxSumResult<Vec<TaskId>> {
        let v_id = LogicalId::Variable(self.me);
        let stale: Vec<(TaskId, PlaneId)> = self
            .factors
            .values()
            .filter_map(|f| match f {
                Factor::Proxy(p) if p.binding().logical_from == v_id && !keep(p.host()) => {
                    p.binding().logical_to.task().map(|t| (t, p.host()))
                }
                _ => None,
            })
            .collect();
        let mut pruned = Vec::with_capacity(stale.len());
        for (task, host) in stale {
            if self.unlink_remote(task, host)? {
                debug!(plane = %self.me, task = %task, host = %host, "host out of range, link pruned");
                pruned.push(task);
            }
        }
        Ok(pruned)
    }

    /// Deliver a value that crossed planes.
    ///
    /// Returns `Ok(false)` for stale values: the target factor is gone, the
    /// edge was retired, or the edge now goes to a different plane.  A value
    /// over an edge this plane never had is a protocol violation.
    pub fn receive_remote(&mut self, binding: ProxyBinding, value: f64) -> MaxSumResult<bool> {
        if binding.physical_to != self.me {
            return Err(MaxSumError::WrongPlane { expected: self.me, got: binding.physical_to });
        }
        let target = FactorId::from(binding.logical_to);
        let from = binding.logical_from;
        let Some(factor) = self.factors.get(&target) else {
            trace!(plane = %self.me, factor = %target, from = %from, "stale value, factor gone");
            return Ok(false);
        };
        let retired = factor.is_retired(from);
        // The local proxy that answers this edge must still point back at the sender.
        let reply = binding.mirrored();
        let twin_host = self.proxy(reply.logical_from, reply.logical_to).map(ProxyFactor::host);

        match twin_host {
            None if retired => {
                trace!(plane = %self.me, factor = %target, from = %from, "stale value, edge retired");
                Ok(false)
            }
            None => Err(MaxSumError::ProtocolViolation { factor: target, from }),
            Some(host) if host != reply.physical_to => {
                trace!(plane = %self.me, factor = %target, from = %from, "stale value, edge rebound");
                Ok(false)
            }
            Some(_) => {
                if let Some(f) = self.factors.get_mut(&target) {
                    f.receive(from, value)?;
                }
                Ok(true)
            }
        }
    }

    // ── Iteration ─────────────────────────────────────────────────────────

    /// Run one solver iteration: tick, scatter, gather.
    ///
    /// Local messages land in their targets' receive buffers; messages to
    /// remote factors are returned as `(recipient plane, payload)`.
    pub fn iterate(
        &mut self,
        here:           Point,
        task_locations: &[Point],
        cost:           &dyn CostModel,
    ) -> MaxSumResult<Vec<(PlaneId, Payload)>> {
        for f in self.factors.values_mut() {
            f.tick();
        }

        let (targets, incoming) = {
            let v = self.variable()?;
            let targets = v
                .tasks()
                .map(|t| task_locations.get(t.index()).copied().ok_or(MaxSumError::UnknownTask(t)))
                .collect::<MaxSumResult<Vec<_>>>()?;
            (targets, v.incoming())
        };
        let link_costs = self.workload_mut()?.scatter(here, &targets, cost, &incoming).to_vec();
        self.variable_mut()?.set_link_costs(&link_costs);

        let outgoing: Vec<(LogicalId, LogicalId, f64)> = self
            .factors
            .values()
            .filter_map(|f| f.logical_id().map(|from| (from, f.gather())))
            .flat_map(|(from, msgs)| msgs.into_iter().map(move |(to, v)| (from, to, v)))
            .collect();
        for (from, to, value) in outgoing {
            self.route(from, to, value)?;
        }

        let mut sends = Vec::new();
        for f in self.factors.values_mut() {
            if let Factor::Proxy(p) = f {
                if let Some(payload) = p.flush() {
                    sends.push((p.host(), payload));
                }
            }
        }
        trace!(plane = %self.me, remote = sends.len(), "iteration done");
        Ok(sends)
    }

    fn route(&mut self, from: LogicalId, to: LogicalId, value: f64) -> MaxSumResult<()> {
        if let Some(f) = self.factors.get_mut(&FactorId::from(to)) {
            return f.receive(from, value);
        }
        match self.factors.get_mut(&FactorId::Proxy { local: from, remote: to }) {
            Some(p) => p.receive(from, value),
            None => Err(MaxSumError::Wiring(format!("{from} on {} has no route to {to}", self.me))),
        }
    }

    // ── Decisions ─────────────────────────────────────────────────────────

    /// Winner of `S(task)`: `None` if not hosted here, `Some(None)` if no
    /// bid is visible yet.
    pub fn selector_decision(&self, task: TaskId) -> Option<Option<PlaneId>> {
        self.selector(task).map(SelectorFactor::make_decision)
    }

    pub fn preferred_task(&self) -> Option<TaskId> {
        self.variable().ok().and_then(VariableFactor::make_decision)
    }

    // ── Consistency ───────────────────────────────────────────────────────

    /// Check that every edge is symmetric or backed by a proxy, and that
    /// every proxy backs an edge.
    pub fn check_wiring(&self) -> MaxSumResult<()> {
        let me = self.me;
        let v_id = LogicalId::Variable(me);
        let fail = |what: String| Err(MaxSumError::Wiring(format!("{me}: {what}")));

        for task in self.variable()?.tasks() {
            let s_id = LogicalId::Selector(task);
            match self.selector(task) {
                Some(s) if !s.candidates().any(|p| p == me) => {
                    return fail(format!("{s_id} does not list {v_id}"));
                }
                None if self.proxy(v_id, s_id).is_none() => {
                    return fail(format!("{v_id} links {s_id} without a proxy"));
                }
                _ => {}
            }
        }

        for f in self.factors.values() {
            match f {
                Factor::Selector(s) => {
                    let s_id = LogicalId::Selector(s.task());
                    for b in s.candidates() {
                        let ok = if b == me {
                            self.variable()?.tasks().any(|t| t == s.task())
                        } else {
                            self.proxy(s_id, LogicalId::Variable(b)).is_some()
                        };
                        if !ok {
                            return fail(format!("{s_id} candidate {b} is not wired"));
                        }
                    }
                }
                Factor::Proxy(p) => {
                    let b = p.binding();
                    let backed = self
                        .factors
                        .get(&FactorId::from(b.logical_from))
                        .is_some_and(|f| f.neighbors().contains(&b.logical_to));
                    if !backed || b.physical_from != me {
                        return fail(format!("dangling proxy {}", p.id()));
                    }
                }
                Factor::Variable(_) | Factor::Workload(_) => {}
            }
        }
        Ok(())
    }
}
