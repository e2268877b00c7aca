//! The per-step neighbor set.

use std::collections::BTreeMap;

use pl_core::PlaneId;

use crate::Guarantee;

/// Planes heard this step, with their guarantees.
///
/// Rebuilt from scratch every step: a neighbor whose beacon is missed is
/// simply absent, never carried over with a decremented guarantee.  The
/// owning plane is always present with [`Guarantee::UNBOUNDED`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighborSet {
    entries: BTreeMap<PlaneId, Guarantee>,
}

impl NeighborSet {
    /// Clear everything and reseed with `me`.
    pub fn reset(&mut self, me: PlaneId) {
        self.entries.clear();
        self.entries.insert(me, Guarantee::UNBOUNDED);
    }

    /// Record `plane`, replacing any earlier entry this step.
    pub fn record(&mut self, plane: PlaneId, guarantee: Guarantee) {
        self.entries.insert(plane, guarantee);
    }

    /// Forget `plane`.
    pub fn drop_plane(&mut self, plane: PlaneId) {
        self.entries.remove(&plane);
    }

    #[inline]
    pub fn guarantee(&self, plane: PlaneId) -> Option<Guarantee> {
        self.entries.get(&plane).copied()
    }

    #[inline]
    pub fn contains(&self, plane: PlaneId) -> bool {
        self.entries.contains_key(&plane)
    }

    /// All entries in ascending `PlaneId` order, self included.
    pub fn iter(&self) -> impl Iterator<Item = (PlaneId, Guarantee)> + '_ {
        self.entries.iter().map(|(&p, &g)| (p, g))
    }

    /// Planes other than `me` guaranteed for at least `steps`, ascending.
    pub fn guaranteed_for(&self, me: PlaneId, steps: u32) -> impl Iterator<Item = PlaneId> + '_ {
        self.iter().filter(move |&(p, g)| p != me && g.covers(steps)).map(|(p, _)| p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
