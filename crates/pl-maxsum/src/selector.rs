//! Selector factor: exactly one servant per task.

use std::collections::BTreeSet;

use pl_core::{LogicalId, PlaneId, TaskId};

use crate::Inbox;

/// Outgoing selector messages: entry `i` is `min_{j≠i} incoming[j]`.
///
/// Missing bids count as `+∞`, so a lone candidate receives `+∞` ("nobody
/// else can serve this").  One pass for the minimum and runner-up, one pass
/// to emit.
pub fn selector_messages(incoming: &[Option<f64>]) -> Vec<f64> {
    let mut best = (f64::INFINITY, usize::MAX);
    let mut second = f64::INFINITY;
    for (i, v) in incoming.iter().enumerate() {
        let v = v.unwrap_or(f64::INFINITY);
        if v < best.0 {
            second = best.0;
            best = (v, i);
        } else if v < second {
            second = v;
        }
    }
    (0..incoming.len())
        .map(|i| if i == best.1 { second } else { best.0 })
        .collect()
}

/// Per-task factor hosted on the task's owner.
///
/// Its edges are the variables of the candidate planes, owner first.
#[derive(Clone, Debug)]
pub struct SelectorFactor {
    task:    TaskId,
    inbox:   Inbox,
    retired: BTreeSet<LogicalId>,
}

impl SelectorFactor {
    pub fn new(task: TaskId, owner: PlaneId) -> Self {
        let mut inbox = Inbox::default();
        inbox.add(LogicalId::Variable(owner));
        Self { task, inbox, retired: BTreeSet::new() }
    }

    #[inline]
    pub fn task(&self) -> TaskId {
        self.task
    }

    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    pub(crate) fn inbox_mut(&mut self) -> &mut Inbox {
        &mut self.inbox
    }

    /// Candidate planes in insertion order.
    pub fn candidates(&self) -> impl Iterator<Item = PlaneId> + '_ {
        self.inbox.peers().filter_map(LogicalId::plane)
    }

    pub fn add_candidate(&mut self, plane: PlaneId) -> bool {
        let peer = LogicalId::Variable(plane);
        self.retired.remove(&peer);
        self.inbox.add(peer)
    }

    /// Drop a candidate and remember it, so its in-flight messages are
    /// recognised as stale rather than foreign.
    pub fn remove_candidate(&mut self, plane: PlaneId) -> bool {
        let peer = LogicalId::Variable(plane);
        let removed = self.inbox.remove(peer).is_some();
        if removed {
            self.retired.insert(peer);
        }
        removed
    }

    pub fn is_retired(&self, peer: LogicalId) -> bool {
        self.retired.contains(&peer)
    }

    /// One message per candidate.  Silent until some candidate has been
    /// heard, since an all-`+∞` round would force every link on.
    pub fn gather(&self) -> Vec<(LogicalId, f64)> {
        if !self.inbox.any_visible() {
            return Vec::new();
        }
        let out = selector_messages(&self.inbox.visible());
        self.inbox.peers().zip(out).collect()
    }

    /// Cheapest candidate by visible bid, earliest inserted on ties.
    /// `None` before any bid is visible: stay with the current owner.
    pub fn make_decision(&self) -> Option<PlaneId> {
        let mut best: Option<(f64, PlaneId)> = None;
        for (peer, v) in self.inbox.peers().zip(self.inbox.visible()) {
            let (Some(v), Some(plane)) = (v, peer.plane()) else { continue };
            if best.is_none_or(|(b, _)| v < b) {
                best = Some((v, plane));
            }
        }
        best.map(|(_, p)| p)
    }
}
