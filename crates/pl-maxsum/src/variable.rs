//! Variable factor: one per plane, one link per candidate task.

use std::collections::BTreeSet;

use pl_core::{LogicalId, PlaneId, TaskId};

use crate::Inbox;

/// A plane's link endpoint.
///
/// Each link connects to the selector of one task the plane is a candidate
/// for, local or behind a proxy.  The outgoing value on a link is whatever
/// the plane's workload factor computed for it this iteration.
#[derive(Clone, Debug)]
pub struct VariableFactor {
    plane:   PlaneId,
    inbox:   Inbox,
    costs:   Vec<Option<f64>>,
    retired: BTreeSet<LogicalId>,
}

impl VariableFactor {
    pub fn new(plane: PlaneId) -> Self {
        Self { plane, inbox: Inbox::default(), costs: Vec::new(), retired: BTreeSet::new() }
    }

    #[inline]
    pub fn plane(&self) -> PlaneId {
        self.plane
    }

    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    pub(crate) fn inbox_mut(&mut self) -> &mut Inbox {
        &mut self.inbox
    }

    /// Linked tasks in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.inbox.peers().filter_map(LogicalId::task)
    }

    pub fn link_count(&self) -> usize {
        self.inbox.len()
    }

    pub fn add_link(&mut self, task: TaskId) -> bool {
        let peer = LogicalId::Selector(task);
        self.retired.remove(&peer);
        let added = self.inbox.add(peer);
        if added {
            self.costs.push(None);
        }
        added
    }

    pub fn remove_link(&mut self, task: TaskId) -> bool {
        match self.inbox.remove(LogicalId::Selector(task)) {
            Some(i) => {
                self.costs.remove(i);
                true
            }
            None => false,
        }
    }

    /// Remember a selector whose link was torn down remotely.
    pub fn retire(&mut self, task: TaskId) {
        self.retired.insert(LogicalId::Selector(task));
    }

    pub fn is_retired(&self, peer: LogicalId) -> bool {
        self.retired.contains(&peer)
    }

    /// Visible selector messages, aligned with the links.
    pub fn incoming(&self) -> Vec<Option<f64>> {
        self.inbox.visible()
    }

    /// Load this iteration's workload output, one value per link.
    pub fn set_link_costs(&mut self, costs: &[f64]) {
        self.costs = costs.iter().copied().map(Some).collect();
        self.costs.resize(self.inbox.len(), None);
    }

    pub fn gather(&self) -> Vec<(LogicalId, f64)> {
        self.inbox
            .peers()
            .zip(&self.costs)
            .filter_map(|(peer, c)| c.map(|c| (peer, c)))
            .collect()
    }

    /// The task whose link has the lowest belief, earliest link on ties.
    ///
    /// The belief of a link is its workload cost minus the selector's value
    /// for it: low means serving this task beats everyone else's offer by
    /// the widest margin.  `None` until some selector has been heard.
    pub fn make_decision(&self) -> Option<TaskId> {
        let mut best: Option<(f64, TaskId)> = None;
        for ((peer, v), c) in self.inbox.peers().zip(self.inbox.visible()).zip(&self.costs) {
            let (Some(v), Some(task)) = (v, peer.task()) else { continue };
            let belief = c.unwrap_or(0.0) - v;
            if best.is_none_or(|(b, _)| belief < b) {
                best = Some((belief, task));
            }
        }
        best.map(|(_, t)| t)
    }
}
