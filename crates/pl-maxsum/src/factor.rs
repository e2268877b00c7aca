//! The `Factor` tagged union.
//!
//! All variants share the same iteration contract:
//!
//! - `tick()` makes last iteration's messages visible,
//! - `receive()` buffers one incoming message,
//! - `gather()` computes outgoing messages from visible ones only, so it has
//!   no side effects and may be called any number of times per tick.
//!
//! Only the per-variant message computation differs.  The workload factor
//! has no edges of its own; the graph drives it through
//! [`WorkloadFactor::scatter`](crate::WorkloadFactor::scatter).

use pl_core::{FactorId, LogicalId};

use crate::{MaxSumError, MaxSumResult, ProxyFactor, SelectorFactor, VariableFactor, WorkloadFactor};

#[derive(Clone, Debug)]
pub enum Factor {
    Variable(VariableFactor),
    Workload(WorkloadFactor),
    Selector(SelectorFactor),
    Proxy(ProxyFactor),
}

impl Factor {
    pub fn id(&self) -> FactorId {
        match self {
            Factor::Variable(v) => FactorId::Variable(v.plane()),
            Factor::Workload(w) => FactorId::Workload(w.plane()),
            Factor::Selector(s) => FactorId::Selector(s.task()),
            Factor::Proxy(p) => p.id(),
        }
    }

    /// Identity other planes address, for factors that have one.
    pub fn logical_id(&self) -> Option<LogicalId> {
        match self {
            Factor::Variable(v) => Some(LogicalId::Variable(v.plane())),
            Factor::Selector(s) => Some(LogicalId::Selector(s.task())),
            Factor::Workload(_) | Factor::Proxy(_) => None,
        }
    }

    pub fn tick(&mut self) {
        match self {
            Factor::Variable(v) => v.inbox_mut().tick(),
            Factor::Selector(s) => s.inbox_mut().tick(),
            Factor::Workload(_) | Factor::Proxy(_) => {}
        }
    }

    pub fn receive(&mut self, from: LogicalId, value: f64) -> MaxSumResult<()> {
        let accepted = match self {
            Factor::Variable(v) => v.inbox_mut().receive(from, value),
            Factor::Selector(s) => s.inbox_mut().receive(from, value),
            Factor::Proxy(p) => return p.receive(from, value),
            Factor::Workload(_) => false,
        };
        if accepted {
            Ok(())
        } else {
            Err(MaxSumError::ProtocolViolation { factor: self.id(), from })
        }
    }

    /// Outgoing `(recipient, value)` pairs.
    pub fn gather(&self) -> Vec<(LogicalId, f64)> {
        match self {
            Factor::Variable(v) => v.gather(),
            Factor::Selector(s) => s.gather(),
            Factor::Workload(_) | Factor::Proxy(_) => Vec::new(),
        }
    }

    /// Logical neighbors, in edge order.
    pub fn neighbors(&self) -> Vec<LogicalId> {
        match self {
            Factor::Variable(v) => v.inbox().peers().collect(),
            Factor::Selector(s) => s.inbox().peers().collect(),
            Factor::Proxy(p) => vec![p.binding().logical_from],
            Factor::Workload(_) => Vec::new(),
        }
    }

    /// `true` if `peer` used to be a neighbor and was deliberately removed.
    pub fn is_retired(&self, peer: LogicalId) -> bool {
        match self {
            Factor::Variable(v) => v.is_retired(peer),
            Factor::Selector(s) => s.is_retired(peer),
            Factor::Workload(_) | Factor::Proxy(_) => false,
        }
    }
}
