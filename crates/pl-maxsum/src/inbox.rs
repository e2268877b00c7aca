//! Double-buffered per-edge message store shared by variables and selectors.

use pl_core::LogicalId;

/// One edge of a factor, with the last two values received over it.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub peer: LogicalId,
    received: Option<f64>,
    visible:  Option<f64>,
}

/// Edges in insertion order.
///
/// A value received during iteration `i` only becomes visible at the tick of
/// iteration `i + 1`.  An edge that receives nothing keeps its last visible
/// value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inbox {
    edges: Vec<Edge>,
}

impl Inbox {
    pub fn tick(&mut self) {
        for e in &mut self.edges {
            if let Some(v) = e.received.take() {
                e.visible = Some(v);
            }
        }
    }

    /// Store `value` from `from`.  `false` if `from` is not an edge.
    pub fn receive(&mut self, from: LogicalId, value: f64) -> bool {
        match self.edges.iter_mut().find(|e| e.peer == from) {
            Some(e) => {
                e.received = Some(value);
                true
            }
            None => false,
        }
    }

    /// Append an edge.  `false` if it already exists.
    pub fn add(&mut self, peer: LogicalId) -> bool {
        if self.position(peer).is_some() {
            return false;
        }
        self.edges.push(Edge { peer, received: None, visible: None });
        true
    }

    /// Remove an edge, returning its former position.
    pub fn remove(&mut self, peer: LogicalId) -> Option<usize> {
        let i = self.position(peer)?;
        self.edges.remove(i);
        Some(i)
    }

    #[inline]
    pub fn position(&self, peer: LogicalId) -> Option<usize> {
        self.edges.iter().position(|e| e.peer == peer)
    }

    pub fn peers(&self) -> impl Iterator<Item = LogicalId> + '_ {
        self.edges.iter().map(|e| e.peer)
    }

    /// Visible value per edge, in edge order.
    pub fn visible(&self) -> Vec<Option<f64>> {
        self.edges.iter().map(|e| e.visible).collect()
    }

    pub fn any_visible(&self) -> bool {
        self.edges.iter().any(|e| e.visible.is_some())
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
