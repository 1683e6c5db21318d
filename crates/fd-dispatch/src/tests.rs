//! Unit tests for fd-dispatch.

use fd_core::{NodeId, Point, SimClock};
use fd_graph::Graph;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Clock stopped at `minute` of day 0.
fn clock_at(minute: u32) -> SimClock {
    let mut clock = SimClock::new(100.0);
    clock.minute_of_day = minute;
    clock
}

/// A straight road, 100 units per hop:
///
/// ```text
///   R1 ── N1 ── N2 ── N3 ── N4 ── N5 ── C1
/// ```
fn road(order_rate: f64) -> (Graph, Vec<NodeId>) {
    let mut g = Graph::new();
    let keys = ["R1", "N1", "N2", "N3", "N4", "N5", "C1"];
    let ids: Vec<NodeId> = keys
        .iter()
        .enumerate()
        .map(|(i, k)| g.add_node(*k, Point::new(i as f64 * 100.0, 0.0)).unwrap())
        .collect();
    for pair in ids.windows(2) {
        g.add_edge(pair[0], pair[1], 1.0).unwrap();
    }
    g.node_mut(ids[0]).unwrap().order_rate = order_rate;
    (g, ids)
}

// ── Order book ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod order_book {
    use fd_core::{CourierId, NodeId, OrderId, Tick};

    use super::clock_at;
    use crate::{DispatchError, OrderBook, OrderStatus};

    #[test]
    fn full_lifecycle_records_delivery_time() {
        let mut book = OrderBook::new();
        let mut clock = clock_at(600);
        clock.tick = Tick(600);
        let id = book.create(NodeId(0), NodeId(6), &clock);
        assert_eq!(book.pending().collect::<Vec<_>>(), vec![id]);

        book.assign(id, CourierId(2)).unwrap();
        assert_eq!(book.pending_count(), 0);
        assert_eq!(book.in_flight_count(), 1);
        book.pick_up(id, Tick(610)).unwrap();
        assert_eq!(book.deliver(id, Tick(625)).unwrap(), 25);

        let order = book.get(id).unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.courier, Some(CourierId(2)));
        assert_eq!(order.delivery_minutes(), Some(25));
        assert_eq!(book.delivered(), 1);
        assert_eq!(book.average_delivery_minutes(), 25.0);
    }

    #[test]
    fn transitions_never_go_backwards() {
        let mut book = OrderBook::new();
        let id = book.create(NodeId(0), NodeId(1), &clock_at(0));
        assert!(matches!(
            book.pick_up(id, Tick(1)),
            Err(DispatchError::InvalidTransition { from: OrderStatus::Pending, to: OrderStatus::InTransit, .. })
        ));
        book.assign(id, CourierId(0)).unwrap();
        assert!(book.assign(id, CourierId(1)).is_err());
        book.pick_up(id, Tick(2)).unwrap();
        book.deliver(id, Tick(3)).unwrap();
        assert!(book.fail(id).is_err());
        assert_eq!(book.get(id).unwrap().status, OrderStatus::Delivered);
        assert!(matches!(book.get(OrderId(99)), Err(DispatchError::UnknownOrder(_))));
    }

    #[test]
    fn fail_outstanding_reports_couriers() {
        let mut book = OrderBook::new();
        let clock = clock_at(1_000);
        let waiting = book.create(NodeId(0), NodeId(1), &clock);
        let carried = book.create(NodeId(0), NodeId(1), &clock);
        let done = book.create(NodeId(0), NodeId(1), &clock);
        book.assign(carried, CourierId(4)).unwrap();
        book.assign(done, CourierId(5)).unwrap();
        book.pick_up(done, Tick(1)).unwrap();
        book.deliver(done, Tick(2)).unwrap();

        let failed = book.fail_outstanding();
        assert_eq!(failed, vec![(waiting, None), (carried, Some(CourierId(4)))]);
        assert_eq!(book.failed(), 2);
        assert_eq!(book.pending_count(), 0);
        assert_eq!(book.total(), 3);
        assert!(book.history().iter().all(|o| o.status.is_terminal()));
    }

    #[test]
    fn overdue_after_sixty_minutes() {
        let mut book = OrderBook::new();
        let id = book.create(NodeId(0), NodeId(1), &clock_at(0));
        let order = book.get(id).unwrap();
        assert!(!order.is_overdue(Tick(60)));
        assert!(order.is_overdue(Tick(61)));
    }
}

// ── Order generation ──────────────────────────────────────────────────────────

#[cfg(test)]
mod generation {
    use fd_core::{Point, SimRng};
    use fd_graph::Graph;

    use super::{clock_at, road};
    use crate::{OrderBook, generate_orders};

    #[test]
    fn saturated_rate_always_orders_in_business_hours() {
        let (g, ids) = road(10.0);
        let mut book = OrderBook::new();
        let mut rng = SimRng::new(5);
        let created = generate_orders(&g, &mut book, &clock_at(720), &mut rng);
        assert_eq!(created.len(), 1);
        let order = book.get(created[0]).unwrap();
        assert_eq!(order.restaurant, ids[0]);
        assert_eq!(order.customer, ids[6]);
        assert_eq!(order.created_minute, 720);
    }

    #[test]
    fn nothing_at_night() {
        let (g, _) = road(10.0);
        let mut book = OrderBook::new();
        let mut rng = SimRng::new(5);
        for minute in [0, 300, 475, 1_260, 1_435] {
            assert!(generate_orders(&g, &mut book, &clock_at(minute), &mut rng).is_empty());
        }
        assert_eq!(book.total(), 0);
    }

    #[test]
    fn nothing_without_customers() {
        let mut g = Graph::new();
        let r = g.add_node("R1", Point::new(0.0, 0.0)).unwrap();
        g.node_mut(r).unwrap().order_rate = 10.0;
        let mut book = OrderBook::new();
        let mut rng = SimRng::new(1);
        assert!(generate_orders(&g, &mut book, &clock_at(720), &mut rng).is_empty());
    }

    #[test]
    fn same_seed_same_orders() {
        let (g, _) = road(0.5);
        let run = |seed| {
            let mut book = OrderBook::new();
            let mut rng = SimRng::new(seed);
            (480..1_260)
                .step_by(5)
                .map(|m| generate_orders(&g, &mut book, &clock_at(m), &mut rng).len())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
    }
}

// ── Assignment ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod assignment {
    use fd_core::{CourierId, Point};
    use fd_courier::{CourierState, Fleet};
    use fd_graph::DijkstraRouter;

    use super::{clock_at, road};
    use crate::{OrderBook, OrderStatus, assign_pending};

    #[test]
    fn nearest_courier_wins() {
        let (g, ids) = road(1.0);
        let mut fleet = Fleet::new(100.0);
        let far = fleet.spawn(ids[5]);
        let near = fleet.spawn(ids[2]);
        let mut book = OrderBook::new();
        let order = book.create(ids[0], ids[6], &clock_at(700));

        let made = assign_pending(&g, &mut book, &mut fleet, &DijkstraRouter).unwrap();
        assert_eq!(made.len(), 1);
        assert_eq!(made[0].courier, near);
        assert_eq!(made[0].distance, 200.0);
        assert_eq!(book.get(order).unwrap().status, OrderStatus::Assigned);
        assert_eq!(fleet.get(near).unwrap().state, CourierState::Dispatched);
        assert!(fleet.get(far).unwrap().job.is_none());
    }

    #[test]
    fn equal_distance_goes_to_lower_id() {
        let (mut g, ids) = road(1.0);
        // A second junction hanging off R1 at the same distance as N1.
        let side = g.add_node("N9", Point::new(0.0, 100.0)).unwrap();
        g.add_edge(ids[0], side, 1.0).unwrap();
        let mut fleet = Fleet::new(100.0);
        let first = fleet.spawn(side);
        let _second = fleet.spawn(ids[1]);
        let mut book = OrderBook::new();
        book.create(ids[0], ids[6], &clock_at(700));

        let made = assign_pending(&g, &mut book, &mut fleet, &DijkstraRouter).unwrap();
        assert_eq!(made[0].courier, first);
        assert_eq!(first, CourierId(0));
    }

    #[test]
    fn oldest_order_first_and_leftovers_stay_pending() {
        let (g, ids) = road(1.0);
        let mut fleet = Fleet::new(100.0);
        let courier = fleet.spawn(ids[3]);
        let mut book = OrderBook::new();
        let old = book.create(ids[0], ids[6], &clock_at(700));
        let new = book.create(ids[0], ids[5], &clock_at(702));

        let made = assign_pending(&g, &mut book, &mut fleet, &DijkstraRouter).unwrap();
        assert_eq!(made.len(), 1);
        assert_eq!(made[0].order, old);
        assert_eq!(made[0].courier, courier);
        assert_eq!(book.pending().collect::<Vec<_>>(), vec![new]);
    }

    #[test]
    fn unreachable_couriers_are_skipped() {
        let (mut g, ids) = road(1.0);
        let island = g.add_node("N8", Point::new(5_000.0, 5_000.0)).unwrap();
        let mut fleet = Fleet::new(100.0);
        fleet.spawn(island);
        let mut book = OrderBook::new();
        let order = book.create(ids[0], ids[6], &clock_at(700));

        assert!(assign_pending(&g, &mut book, &mut fleet, &DijkstraRouter).unwrap().is_empty());
        assert_eq!(book.get(order).unwrap().status, OrderStatus::Pending);
    }

    #[test]
    fn one_way_dead_end_falls_back_to_next_candidate() {
        let (mut g, ids) = road(1.0);
        // N7 can be reached from R1 but has no way back out.
        let trap = g.add_node("N7", Point::new(0.0, -50.0)).unwrap();
        g.add_directed_edge(ids[0], trap, 1.0).unwrap();
        let mut fleet = Fleet::new(100.0);
        let stuck = fleet.spawn(trap);
        let free = fleet.spawn(ids[4]);
        let mut book = OrderBook::new();
        book.create(ids[0], ids[6], &clock_at(700));

        let made = assign_pending(&g, &mut book, &mut fleet, &DijkstraRouter).unwrap();
        assert_eq!(made[0].courier, free);
        assert!(fleet.get(stuck).unwrap().job.is_none());
    }

    #[test]
    fn no_couriers_no_assignments() {
        let (g, ids) = road(1.0);
        let mut fleet = Fleet::new(100.0);
        let mut book = OrderBook::new();
        book.create(ids[0], ids[6], &clock_at(700));
        assert!(assign_pending(&g, &mut book, &mut fleet, &DijkstraRouter).unwrap().is_empty());
        assert_eq!(book.pending_count(), 1);
    }
}

// ── Heatmap ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod heatmap {
    use fd_core::IntensityCurve;
    use fd_graph::NodeRole;

    use super::{clock_at, road};
    use crate::{DECAY_FACTOR, HeatLevel, Heatmap};

    #[test]
    fn heat_spreads_three_radii_and_zones_spread_apart() {
        let (mut g, ids) = road(1.0);
        let mut heatmap = Heatmap::new(3);
        let zones = heatmap.regenerate(&mut g, &clock_at(720)).unwrap();
        assert_eq!(heatmap.radius(&g), 100.0);

        // N1 ties N2/N3 on heat and wins on id; decay then pushes the next
        // pick out to N3, and N2 is left as the best of the rest.
        assert_eq!(zones, vec![ids[1], ids[3], ids[2]]);

        // Picking N2 last decays its neighbours N1 and N3 once more.
        let a = IntensityCurve::Lunch.intensity(12.0);
        let heat = |i: usize| g.node(ids[i]).unwrap().heat;
        assert!((heat(1) - a * DECAY_FACTOR).abs() < 1e-12);
        assert!((heat(2) - a * DECAY_FACTOR * DECAY_FACTOR).abs() < 1e-12);
        assert!((heat(3) - a * DECAY_FACTOR).abs() < 1e-12);
        assert_eq!(heat(4), 0.0);
        assert_eq!(heat(5), 0.0);
        assert_eq!(heat(0), 0.0, "restaurants never hold heat");
        assert_eq!(heat(6), 0.0, "customers never hold heat");
    }

    #[test]
    fn zones_are_distinct_junctions_and_stop_when_exhausted() {
        let (mut g, _) = road(1.0);
        let zones = Heatmap::new(10).regenerate(&mut g, &clock_at(720)).unwrap();
        assert_eq!(zones.len(), 5);
        let mut unique = zones.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), zones.len());
        for zone in &zones {
            let node = g.node(*zone).unwrap();
            assert_eq!(node.role, NodeRole::Junction);
            assert!(node.is_idle_zone);
        }
        assert_eq!(g.idle_zones().len(), 5);
    }

    #[test]
    fn regeneration_replaces_previous_zones() {
        let (mut g, ids) = road(1.0);
        let mut heatmap = Heatmap::new(1);
        heatmap.regenerate(&mut g, &clock_at(720)).unwrap();
        g.node_mut(ids[5]).unwrap().is_idle_zone = true;
        let zones = heatmap.regenerate(&mut g, &clock_at(780)).unwrap();
        assert_eq!(g.idle_zones(), zones);
    }

    #[test]
    fn regeneration_is_deterministic() {
        let (mut a, _) = road(0.7);
        let (mut b, _) = road(0.7);
        let za = Heatmap::new(2).regenerate(&mut a, &clock_at(1_100)).unwrap();
        let zb = Heatmap::new(2).regenerate(&mut b, &clock_at(1_100)).unwrap();
        assert_eq!(za, zb);
        let heat = |g: &fd_graph::Graph| g.nodes().map(|(_, n)| n.heat).collect::<Vec<_>>();
        assert_eq!(heat(&a), heat(&b));
    }

    #[test]
    fn heat_levels() {
        let (mut g, ids) = road(1.0);
        Heatmap::new(1).regenerate(&mut g, &clock_at(720)).unwrap();
        let max = g.nodes().map(|(_, n)| n.heat).fold(0.0, f64::max);
        assert_eq!(HeatLevel::classify(g.node(ids[1]).unwrap(), max), HeatLevel::Zone);
        assert_eq!(HeatLevel::classify(g.node(ids[3]).unwrap(), max), HeatLevel::Hot);
        assert_eq!(HeatLevel::classify(g.node(ids[5]).unwrap(), max), HeatLevel::Warm);
    }
}
