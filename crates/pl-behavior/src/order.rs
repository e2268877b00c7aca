//! Dependency ordering of behaviors.
//!
//! Kahn's algorithm over the declared `BehaviorKind` edges.  Among the
//! behaviors whose dependencies are all placed, the one registered first is
//! placed next, so the order is a pure function of the registration list.

use std::collections::{BTreeMap, BTreeSet};

use crate::{BehaviorError, BehaviorKind, BehaviorResult};

/// Return registration indices in an order where every behavior comes after
/// all of its dependencies.
///
/// `entries[i]` is `(kind, dependencies)` of the i-th registered behavior.
pub fn dependency_order(entries: &[(BehaviorKind, &[BehaviorKind])]) -> BehaviorResult<Vec<usize>> {
    let mut index_of: BTreeMap<BehaviorKind, usize> = BTreeMap::new();
    for (i, (kind, _)) in entries.iter().enumerate() {
        if index_of.insert(*kind, i).is_some() {
            return Err(BehaviorError::DuplicateKind(*kind));
        }
    }

    let n = entries.len();
    let mut pending = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, (kind, deps)) in entries.iter().enumerate() {
        for dep in deps.iter() {
            let &j = index_of.get(dep).ok_or(BehaviorError::MissingDependency {
                behavior:   *kind,
                dependency: *dep,
            })?;
            pending[i] += 1;
            dependents[j].push(i);
        }
    }

    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| pending[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &d in &dependents[i] {
            pending[d] -= 1;
            if pending[d] == 0 {
                ready.insert(d);
            }
        }
    }

    if order.len() < n {
        let stuck = (0..n).filter(|&i| pending[i] > 0).map(|i| entries[i].0).collect();
        return Err(BehaviorError::Cycle(stuck));
    }
    Ok(order)
}
