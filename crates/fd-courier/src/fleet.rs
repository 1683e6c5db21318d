//! The courier fleet: storage, assignment, idle routing, and the per-tick
//! movement step.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use fd_core::{CourierId, NodeId};
use fd_graph::{Graph, Path, Router, dijkstra};

use crate::{Courier, CourierEvent, CourierPosition, CourierState, FleetError, FleetResult, Job};

/// Every live courier, keyed and iterated by ascending `CourierId`.
///
/// Ids are issued sequentially and never reused, so iteration order is also
/// spawn order.  That makes tie-breaks ("lowest id first") deterministic.
#[derive(Debug, Clone)]
pub struct Fleet {
    couriers:          BTreeMap<CourierId, Courier>,
    next_id:           u32,
    distance_per_tick: f64,
}

impl Fleet {
    /// Empty fleet whose couriers cover `distance_per_tick` weight units per
    /// tick.
    pub fn new(distance_per_tick: f64) -> Self {
        Self {
            couriers: BTreeMap::new(),
            next_id: 0,
            distance_per_tick,
        }
    }

    pub fn distance_per_tick(&self) -> f64 {
        self.distance_per_tick
    }

    pub fn len(&self) -> usize {
        self.couriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.couriers.is_empty()
    }

    pub fn get(&self, id: CourierId) -> FleetResult<&Courier> {
        self.couriers.get(&id).ok_or(FleetError::UnknownCourier(id))
    }

    pub fn get_mut(&mut self, id: CourierId) -> FleetResult<&mut Courier> {
        self.couriers.get_mut(&id).ok_or(FleetError::UnknownCourier(id))
    }

    pub fn contains(&self, id: CourierId) -> bool {
        self.couriers.contains_key(&id)
    }

    /// Couriers in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Courier> + '_ {
        self.couriers.values()
    }

    /// Couriers dispatch may hand a new order to.
    pub fn available(&self) -> impl Iterator<Item = &Courier> + '_ {
        self.couriers.values().filter(|c| c.is_available())
    }

    /// Couriers that count towards the headcount target (not on their way out).
    pub fn active_count(&self) -> usize {
        self.couriers
            .values()
            .filter(|c| !c.termination_requested && c.state != CourierState::Terminating)
            .count()
    }

    pub fn busy_count(&self) -> usize {
        self.couriers.values().filter(|c| c.is_busy()).count()
    }

    /// Add an Idle courier standing on `node`.
    pub fn spawn(&mut self, node: NodeId) -> CourierId {
        let id = CourierId(self.next_id);
        self.next_id += 1;
        self.couriers.insert(id, Courier::new(id, node));
        id
    }

    pub(crate) fn remove(&mut self, id: CourierId) -> Option<Courier> {
        self.couriers.remove(&id)
    }

    // ── Jobs ──────────────────────────────────────────────────────────────

    /// Give `job` to courier `id`.
    ///
    /// A courier mid-edge on its way to an idle zone takes the job with
    /// `pending_redirect` set and turns towards the restaurant at its next
    /// node.  Any other courier is routed to the restaurant immediately.
    ///
    /// # Errors
    ///
    /// `AlreadyAssigned` if the courier has a job, `Unreachable` if the
    /// router finds no path to the restaurant.  The courier is unchanged on
    /// error.
    pub fn assign<R: Router + ?Sized>(
        &mut self,
        id:     CourierId,
        job:    Job,
        graph:  &Graph,
        router: &R,
    ) -> FleetResult<()> {
        let courier = self.get_mut(id)?;
        if courier.job.is_some() {
            return Err(FleetError::AlreadyAssigned(id));
        }

        if courier.state == CourierState::MovingToIdleZone && courier.position.is_on_edge() {
            courier.job = Some(job);
            courier.pending_redirect = true;
            debug!(courier = %id, order = %job.order, "assigned; redirect deferred to next node");
            return Ok(());
        }

        let path = router.route(graph, courier.anchor(), job.restaurant)?;
        if path.is_unreachable() {
            return Err(FleetError::Unreachable { courier: id, target: job.restaurant });
        }
        courier.job = Some(job);
        courier.state = CourierState::Dispatched;
        courier.follow(&path);
        debug!(courier = %id, order = %job.order, hops = path.hops(), "assigned");
        Ok(())
    }

    /// Strip the current job from courier `id` and return it.
    ///
    /// The courier finishes the edge it is on and then heads for the nearest
    /// flagged idle zone, or waits Idle if none is reachable.  A courier
    /// flagged for termination is removed from the fleet instead.
    pub fn drop_job(&mut self, id: CourierId, graph: &Graph) -> FleetResult<Option<Job>> {
        let courier = self.get_mut(id)?;
        let job = courier.job.take();
        courier.pending_redirect = false;
        if job.is_some() {
            courier.route.clear();
            if let CourierPosition::OnEdge { to, .. } = courier.position {
                courier.route.push_back(to);
            }
            courier.state = CourierState::Idle;
        }
        if courier.termination_requested {
            self.remove(id);
            debug!(courier = %id, "flagged courier removed after losing its job");
        } else if job.is_some() {
            self.send_to_nearest_zone(id, graph, &graph.idle_zones())?;
        }
        Ok(job)
    }

    // ── Idle zones ────────────────────────────────────────────────────────

    /// Route a jobless courier to the nearest (by weighted distance) of
    /// `zones`.  Ties go to the lower `NodeId`.
    ///
    /// Returns the chosen zone, or `None` if the courier stays put: it has a
    /// job, there are no zones, none is reachable, or it already stands on
    /// one.
    pub fn send_to_nearest_zone(
        &mut self,
        id:    CourierId,
        graph: &Graph,
        zones: &[NodeId],
    ) -> FleetResult<Option<NodeId>> {
        let courier = self.get_mut(id)?;
        if courier.job.is_some() || zones.is_empty() {
            return Ok(None);
        }
        let anchor = courier.anchor();
        if !courier.position.is_on_edge() && zones.contains(&anchor) {
            courier.route.clear();
            courier.state = CourierState::Idle;
            return Ok(None);
        }

        let tree = dijkstra(graph, anchor)?;
        let nearest = zones
            .iter()
            .copied()
            .filter(|&z| tree.reached(z))
            .min_by(|&a, &b| {
                tree.distance_to(a)
                    .total_cmp(&tree.distance_to(b))
                    .then(a.cmp(&b))
            });
        let Some(zone) = nearest else {
            return Ok(None);
        };

        courier.follow(&Path::from_tree(&tree, zone));
        courier.state = CourierState::MovingToIdleZone;
        debug!(courier = %id, zone = graph.key(zone), "heading to idle zone");
        Ok(Some(zone))
    }

    /// Send every Idle courier to its nearest flagged idle zone.  Returns how
    /// many couriers started moving.
    pub fn rehome_idle(&mut self, graph: &Graph) -> FleetResult<usize> {
        let zones = graph.idle_zones();
        if zones.is_empty() {
            return Ok(0);
        }
        let idle: Vec<CourierId> = self
            .couriers
            .values()
            .filter(|c| c.state == CourierState::Idle && c.job.is_none())
            .map(|c| c.id)
            .collect();
        let mut moved = 0;
        for id in idle {
            if self.send_to_nearest_zone(id, graph, &zones)?.is_some() {
                moved += 1;
            }
        }
        Ok(moved)
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Advance every courier by one tick.
    ///
    /// Couriers move in id order.  Couriers freed by a delivery head to the
    /// nearest idle zone; couriers left `Terminating` are removed at the end
    /// and reported as [`CourierEvent::Retired`].
    pub fn step<R: Router + ?Sized>(&mut self, graph: &Graph, router: &R) -> FleetResult<Vec<CourierEvent>> {
        let mut events = Vec::new();
        let budget = self.distance_per_tick;
        for courier in self.couriers.values_mut() {
            advance(courier, budget, graph, router, &mut events)?;
        }

        let freed: Vec<CourierId> = events
            .iter()
            .filter_map(|e| match *e {
                CourierEvent::Delivered { courier, .. } => Some(courier),
                _ => None,
            })
            .collect();
        if !freed.is_empty() {
            let zones = graph.idle_zones();
            for id in freed {
                if self.get(id)?.state == CourierState::Idle {
                    self.send_to_nearest_zone(id, graph, &zones)?;
                }
            }
        }

        let retiring: Vec<CourierId> = self
            .couriers
            .values()
            .filter(|c| c.state == CourierState::Terminating)
            .map(|c| c.id)
            .collect();
        for id in retiring {
            self.remove(id);
            debug!(courier = %id, "courier retired");
            events.push(CourierEvent::Retired { courier: id });
        }
        Ok(events)
    }

    /// Remaining route of every courier that is going somewhere, for edge
    /// highlighting.
    pub fn route_highlights(&self) -> Vec<(CourierId, Vec<NodeId>)> {
        self.couriers
            .values()
            .map(|c| (c.id, c.remaining_path()))
            .filter(|(_, path)| !path.is_empty())
            .collect()
    }
}

// ── Step internals ────────────────────────────────────────────────────────────

/// Spend up to `budget` weight units moving `courier` along its route.
fn advance<R: Router + ?Sized>(
    courier:    &mut Courier,
    mut budget: f64,
    graph:      &Graph,
    router:     &R,
    events:     &mut Vec<CourierEvent>,
) -> FleetResult<()> {
    loop {
        match courier.position {
            CourierPosition::OnEdge { edge, from, to, progress } => {
                let weight = graph.edge(edge)?.weight;
                let remaining = (1.0 - progress) * weight;
                if budget < remaining {
                    courier.position = CourierPosition::OnEdge {
                        edge,
                        from,
                        to,
                        progress: progress + budget / weight,
                    };
                    courier.travelled += budget;
                    return Ok(());
                }
                budget -= remaining;
                courier.travelled += remaining;
                courier.position = CourierPosition::AtNode(to);
                if courier.route.front() == Some(&to) {
                    courier.route.pop_front();
                }
                if courier.route.is_empty() {
                    return route_end(courier, to, graph, router, events);
                }
                if courier.pending_redirect {
                    redirect(courier, graph, router)?;
                }
            }
            CourierPosition::AtNode(node) => {
                let Some(&next) = courier.route.front() else {
                    return route_end(courier, node, graph, router, events);
                };
                if budget <= 0.0 {
                    return Ok(());
                }
                let edge = graph.edge_between(node, next)?;
                courier.position = CourierPosition::OnEdge { edge, from: node, to: next, progress: 0.0 };
            }
        }
    }
}

/// Abandon the current route and head for the job's restaurant.
fn redirect<R: Router + ?Sized>(courier: &mut Courier, graph: &Graph, router: &R) -> FleetResult<()> {
    courier.pending_redirect = false;
    let Some(job) = courier.job else {
        return Ok(());
    };
    courier.state = CourierState::Dispatched;
    route_to(courier, job.restaurant, graph, router)
}

/// Replace the route with a path to `target`.  An unreachable target leaves
/// the courier standing with an empty route; the next tick retries.
fn route_to<R: Router + ?Sized>(
    courier: &mut Courier,
    target:  NodeId,
    graph:   &Graph,
    router:  &R,
) -> FleetResult<()> {
    let path = router.route(graph, courier.anchor(), target)?;
    if path.is_unreachable() {
        warn!(courier = %courier.id, target = graph.key(target), "no path; will retry");
        courier.route.clear();
    } else {
        courier.follow(&path);
    }
    Ok(())
}

/// The courier stands on `node` with nothing left to walk.
fn route_end<R: Router + ?Sized>(
    courier: &mut Courier,
    node:    NodeId,
    graph:   &Graph,
    router:  &R,
    events:  &mut Vec<CourierEvent>,
) -> FleetResult<()> {
    if courier.pending_redirect {
        return redirect(courier, graph, router);
    }
    let id = courier.id;
    match (courier.state, courier.job) {
        (CourierState::Dispatched, Some(job)) if node == job.restaurant => {
            events.push(CourierEvent::PickedUp { courier: id, order: job.order, node });
            courier.state = CourierState::EnRouteToCustomer;
            route_to(courier, job.customer, graph, router)?;
        }
        (CourierState::EnRouteToCustomer, Some(job)) if node == job.customer => {
            events.push(CourierEvent::Delivered { courier: id, order: job.order, node });
            courier.job = None;
            courier.state = if courier.termination_requested {
                CourierState::Terminating
            } else {
                CourierState::Idle
            };
        }
        (CourierState::Dispatched, Some(job)) => {
            route_to(courier, job.restaurant, graph, router)?;
        }
        (CourierState::EnRouteToCustomer, Some(job)) => {
            route_to(courier, job.customer, graph, router)?;
        }
        (CourierState::MovingToIdleZone, _) => {
            courier.state = CourierState::Idle;
            events.push(CourierEvent::ReachedIdleZone { courier: id, node });
        }
        _ => {}
    }
    Ok(())
}
