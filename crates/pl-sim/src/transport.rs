//! Range-limited broadcast medium.
//!
//! Messages queued during a step are delivered once, after the step's
//! post-step phase, from the sender's final position.  A copy reaches every
//! other plane strictly inside the sender's `comm_range`, addressed or not;
//! recipients filter by address when dispatching.  Spatial lookup goes
//! through an R-tree rebuilt from the fleet's positions at each delivery.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use tracing::trace;

use pl_behavior::{Message, Payload};
use pl_core::PlaneId;
use pl_fleet::FleetStore;

/// Entry stored in the R-tree: a plane's `[x, y]` position.
#[derive(Clone)]
struct PlaneEntry {
    point: [f64; 2],
    id:    PlaneId,
}

impl RTreeObject for PlaneEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PlaneEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Counters for one delivery pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: usize,
    pub bounced:   usize,
    pub dropped:   usize,
}

/// Outbound queue plus the delivery pass.
#[derive(Debug, Default)]
pub struct Transport {
    outbox: Vec<Message>,
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, msg: Message) {
        self.outbox.push(msg);
    }

    /// Messages waiting for the next delivery.
    pub fn pending(&self) -> usize {
        self.outbox.len()
    }

    /// Move every queued message into the inboxes of the planes in range.
    ///
    /// Each inbox receives messages in queue order.  A `TaskTransfer` whose
    /// recipient is out of range returns to its sender, so the task is never
    /// lost.  Other addressed messages to planes out of range are dropped.
    pub fn deliver(&mut self, fleet: &FleetStore, inboxes: &mut [Vec<Message>]) -> Delivery {
        let entries = fleet
            .plane_ids()
            .map(|id| PlaneEntry { point: fleet.location[id.index()].to_array(), id })
            .collect();
        let index = RTree::bulk_load(entries);

        let mut d = Delivery::default();
        for msg in self.outbox.drain(..) {
            let from = msg.sender.index();
            let origin = fleet.location[from].to_array();
            let r2 = fleet.comm_range[from] * fleet.comm_range[from];

            // The R-tree query includes the boundary; range is exclusive.
            let mut reached: Vec<PlaneId> = index
                .locate_within_distance(origin, r2)
                .filter(|e| e.id != msg.sender && e.distance_2(&origin) < r2)
                .map(|e| e.id)
                .collect();
            reached.sort_unstable();

            let missed = msg.recipient.filter(|r| !reached.contains(r));
            for &p in &reached {
                inboxes[p.index()].push(msg.clone());
            }
            d.delivered += reached.len();

            let Some(to) = missed else { continue };
            if let Payload::TaskTransfer { task } = msg.payload {
                trace!(plane = %msg.sender, task = %task, to = %to, "transfer out of range, returned");
                inboxes[from].push(Message { recipient: Some(msg.sender), ..msg });
                d.bounced += 1;
            } else {
                trace!(plane = %msg.sender, to = %to, kind = ?msg.kind(), "addressed message out of range");
                d.dropped += 1;
            }
        }
        d
    }
}
