//! Courier assignment.
//!
//! Pending orders are matched oldest-first.  For each order a full Dijkstra
//! tree is grown from its restaurant and every available courier is scored by
//! the tree distance to its anchor node (current node, or the end of the edge
//! it is on).  The cheapest courier wins; equal distances go to the lower
//! courier id.  Trees are cached per restaurant for the duration of a pass,
//! since the graph cannot change mid-pass.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use tracing::debug;

use fd_core::{CourierId, NodeId, OrderId};
use fd_courier::{Fleet, FleetError, Job};
use fd_graph::{Graph, Router, SearchTree, dijkstra};

use crate::{DispatchResult, OrderBook};

/// One successful match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub order:    OrderId,
    pub courier:  CourierId,
    /// Weighted distance from the restaurant to the courier's anchor node.
    pub distance: f64,
}

/// Match as many pending orders as possible to available couriers.
///
/// Couriers the restaurant cannot reach are skipped.  If the router then
/// finds no path from the chosen courier *to* the restaurant (possible with
/// one-way streets), the next candidate is tried.  Orders nobody can take
/// stay Pending.
pub fn assign_pending<R: Router + ?Sized>(
    graph:  &Graph,
    book:   &mut OrderBook,
    fleet:  &mut Fleet,
    router: &R,
) -> DispatchResult<Vec<Assignment>> {
    let mut made = Vec::new();
    let mut trees: FxHashMap<NodeId, SearchTree> = FxHashMap::default();
    let queue: Vec<OrderId> = book.pending().collect();

    for order_id in queue {
        if fleet.available().next().is_none() {
            break;
        }
        let order = book.get(order_id)?;
        let job = Job {
            order:      order_id,
            restaurant: order.restaurant,
            customer:   order.customer,
        };

        let tree = match trees.entry(job.restaurant) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(dijkstra(graph, job.restaurant)?),
        };

        let mut candidates: Vec<(f64, CourierId)> = fleet
            .available()
            .filter(|c| tree.reached(c.anchor()))
            .map(|c| (tree.distance_to(c.anchor()), c.id))
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        for (distance, courier) in candidates {
            match fleet.assign(courier, job, graph, router) {
                Ok(()) => {
                    book.assign(order_id, courier)?;
                    debug!(order = %order_id, courier = %courier, distance, "order assigned");
                    made.push(Assignment { order: order_id, courier, distance });
                    break;
                }
                Err(FleetError::Unreachable { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(made)
}
