//! The `Sim` struct and its tick loop.

use tracing::{debug, info};

use fd_core::{CourierId, EdgeId, NodeId, SimClock, SimConfig, SimRng};
use fd_courier::{CourierEvent, Fleet, target_headcount};
use fd_dispatch::{Heatmap, OrderBook, assign_pending, generate_orders};
use fd_graph::{Graph, Router};

use crate::{SimObserver, SimResult, SimStats, TickReport};

// ── Job periods (simulated minutes) ───────────────────────────────────────────

pub const HOURLY_PERIOD: u32 = 60;
pub const OBSTRUCTION_PERIOD: u32 = 30;
pub const ORDER_PERIOD: u32 = 5;
pub const ASSIGN_PERIOD: u32 = 2;

/// Obstruction factors drawn by churn fall in `[MIN, MAX)`.
pub const OBSTRUCTION_RANGE: (f64, f64) = (1.0, 3.0);

/// Independent random streams, so that changing one job's draws never shifts
/// another's.
pub(crate) struct SimRngs {
    pub(crate) orders: SimRng,
    pub(crate) fleet:  SimRng,
    pub(crate) churn:  SimRng,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// One tick is one simulated minute.  [`Sim::tick`] advances the clock and
/// then runs every job that is due at the new minute:
///
/// 1. **Midnight**: fail outstanding orders and strip them from couriers.
/// 2. **Hourly**: rebuild the heatmap (business hours only), rescale the
///    fleet, send idle couriers to the new zones.
/// 3. **Every 30 min**: obstruction churn, when `obstruction_level > 0`.
/// 4. **Every 5 min**: order generation.
/// 5. **Every 2 min**: assignment pass.
/// 6. **Every tick**: courier movement; arrivals update the order book.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router> {
    /// Run parameters.
    pub config: SimConfig,

    /// Minute of day, day count, and absolute tick.
    pub clock: SimClock,

    /// Street map, including current heat, idle-zone flags, and obstruction.
    pub graph: Graph,

    pub fleet: Fleet,

    /// Every order ever placed, and the pending queue.
    pub orders: OrderBook,

    pub heatmap: Heatmap,

    /// Pathfinding strategy for all courier travel.
    pub router: R,

    pub(crate) rngs: SimRngs,

    /// Directed edges currently carrying a churn obstruction factor, with
    /// the obstruction they had before it.
    pub(crate) obstructed: Vec<(EdgeId, f64)>,
}

impl<R: Router> Sim<R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the configured number of ticks, then call `on_sim_end`.
    ///
    /// Use [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let end = self.config.end_tick();
        while self.clock.tick < end {
            self.tick(observer)?;
        }
        let stats = self.stats();
        info!(
            ticks = self.clock.tick.0,
            orders = stats.total_orders,
            delivered = stats.delivered,
            failed = stats.failed,
            avg_minutes = stats.average_delivery_minutes,
            "simulation finished"
        );
        observer.on_sim_end(&stats);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores
    /// `total_ticks`).  Stopping is simply not calling again; couriers stay
    /// mid-edge and orders keep their status.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.tick(observer)?;
        }
        Ok(())
    }

    /// Advance one simulated minute and run every job due at the new minute.
    pub fn tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TickReport> {
        observer.on_tick_start(&self.clock);

        let rolled_over = self.clock.advance();
        let mut report = TickReport::at(&self.clock);
        if rolled_over {
            self.roll_over(&mut report, observer)?;
        }
        if self.clock.every(HOURLY_PERIOD) {
            self.hourly(&mut report)?;
        }
        if self.config.obstruction_level > 0 && self.clock.every(OBSTRUCTION_PERIOD) {
            report.obstructed = self.churn_obstruction()?;
        }
        if self.clock.every(ORDER_PERIOD) {
            report.orders_created =
                generate_orders(&self.graph, &mut self.orders, &self.clock, &mut self.rngs.orders).len();
        }
        if self.clock.every(ASSIGN_PERIOD) {
            report.assigned =
                assign_pending(&self.graph, &mut self.orders, &mut self.fleet, &self.router)?.len();
        }
        self.move_couriers(&mut report)?;
        report.pending = self.orders.pending_count();
        report.couriers = self.fleet.len();

        observer.on_tick_end(&self.clock, &report);
        let every = self.config.snapshot_interval_ticks;
        if every > 0 && self.clock.tick.0 % every == 0 {
            observer.on_snapshot(&self.clock, &self.fleet, &self.graph);
        }
        Ok(report)
    }

    /// Totals as of the current tick.
    pub fn stats(&self) -> SimStats {
        SimStats::collect(&self.clock, &self.orders, &self.fleet)
    }

    /// Remaining node path of every courier that is going somewhere.
    pub fn route_highlights(&self) -> Vec<(CourierId, Vec<NodeId>)> {
        self.fleet.route_highlights()
    }

    /// Every directed edge on some courier's remaining path, sorted and
    /// deduplicated.
    pub fn highlighted_edges(&self) -> Vec<EdgeId> {
        let mut edges: Vec<EdgeId> = self
            .fleet
            .route_highlights()
            .iter()
            .flat_map(|(_, path)| path.windows(2))
            .filter_map(|w| self.graph.edge_between(w[0], w[1]).ok())
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }

    // ── Jobs ──────────────────────────────────────────────────────────────

    fn roll_over<O: SimObserver>(&mut self, report: &mut TickReport, observer: &mut O) -> SimResult<()> {
        report.rolled_over = true;
        let failed = self.orders.fail_outstanding();
        report.failed = failed.len();
        for (order, courier) in failed {
            if let Some(courier) = courier.filter(|&c| self.fleet.contains(c)) {
                self.fleet.drop_job(courier, &self.graph)?;
                debug!(order = %order, courier = %courier, "job dropped at midnight");
            }
        }

        let day = self.clock.day_count - 1;
        let stats = self.stats();
        info!(
            day,
            orders = stats.total_orders,
            delivered = stats.delivered,
            failed = stats.failed,
            avg_minutes = stats.average_delivery_minutes,
            "day complete"
        );
        observer.on_day_end(day, &stats);
        Ok(())
    }

    fn hourly(&mut self, report: &mut TickReport) -> SimResult<()> {
        // Zones first, so couriers spawned by the rescale head for this
        // hour's zones.
        if self.clock.in_business_hours() {
            report.idle_zones = self.heatmap.regenerate(&mut self.graph, &self.clock)?;
        }

        let target = target_headcount(self.config.courier_frequency, self.clock.hour());
        report.headcount = Some(self.fleet.rescale(target, &self.graph, &mut self.rngs.fleet)?);

        if !report.idle_zones.is_empty() {
            report.rehomed = self.fleet.rehome_idle(&self.graph)?;
        }

        info!(
            time = %self.clock.time_of_day(),
            target,
            couriers = self.fleet.len(),
            pending = self.orders.pending_count(),
            zones = report.idle_zones.len(),
            rehomed = report.rehomed,
            "hourly update"
        );
        Ok(())
    }

    /// Put the previous round's connections back to their base obstruction,
    /// then obstruct a fresh random set in both directions.  Returns the
    /// number of connections obstructed.
    fn churn_obstruction(&mut self) -> SimResult<usize> {
        while let Some((edge, base)) = self.obstructed.pop() {
            self.graph.set_obstruction(edge, base)?;
        }

        let connections = self.graph.connections();
        let picked = self.rngs.churn.choose_multiple(&connections, self.config.obstruction_level);
        let (lo, hi) = OBSTRUCTION_RANGE;
        for &edge in &picked {
            let factor = self.rngs.churn.gen_range(lo..hi);
            let back = self.graph.reverse_of(edge);
            for e in std::iter::once(edge).chain(back) {
                self.obstructed.push((e, self.graph.edge(e)?.obstruction));
                self.graph.set_obstruction(e, factor)?;
            }
        }
        debug!(connections = picked.len(), "obstruction churned");
        Ok(picked.len())
    }

    fn move_couriers(&mut self, report: &mut TickReport) -> SimResult<()> {
        let now = self.clock.tick;
        for event in self.fleet.step(&self.graph, &self.router)? {
            match event {
                CourierEvent::PickedUp { order, .. } => {
                    self.orders.pick_up(order, now)?;
                    report.picked_up += 1;
                }
                CourierEvent::Delivered { order, .. } => {
                    self.orders.deliver(order, now)?;
                    report.delivered += 1;
                }
                CourierEvent::ReachedIdleZone { .. } => report.reached_zone += 1,
                CourierEvent::Retired { .. } => report.retired += 1,
            }
        }
        Ok(())
    }
}
