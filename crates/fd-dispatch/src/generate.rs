//! Order generation.

use tracing::debug;

use fd_core::{OrderId, SimClock, SimRng};
use fd_graph::{Graph, NodeRole};

use crate::OrderBook;

/// Roll once per restaurant and create an order for every hit.
///
/// A restaurant orders when `roll <= order_rate * intensity(now)`, with the
/// customer drawn uniformly.  Restaurants are visited in graph order so a
/// seed always produces the same orders.  A map without customers generates
/// nothing and draws no numbers.
pub fn generate_orders(
    graph: &Graph,
    book:  &mut OrderBook,
    clock: &SimClock,
    rng:   &mut SimRng,
) -> Vec<OrderId> {
    let customers = graph.customers();
    if customers.is_empty() {
        return Vec::new();
    }
    let hour = clock.hour_f64();
    let mut created = Vec::new();

    for (restaurant, node) in graph.nodes().filter(|(_, n)| n.role == NodeRole::Restaurant) {
        let threshold = node.order_rate * node.curve.intensity(hour);
        let roll = rng.roll();
        if threshold <= 0.0 || roll > threshold {
            continue;
        }
        let Some(&customer) = rng.choose(&customers) else {
            continue;
        };
        let id = book.create(restaurant, customer, clock);
        debug!(
            order = %id,
            restaurant = node.key.as_str(),
            customer = graph.key(customer),
            "order placed"
        );
        created.push(id);
    }
    created
}
