//! Fluent builder for [`Sim`].

use tracing::info;

use fd_core::time::MINUTES_PER_DAY;
use fd_core::{SimConfig, SimRng};
use fd_courier::{Fleet, target_headcount};
use fd_dispatch::{Heatmap, OrderBook};
use fd_graph::{Graph, Router};

use crate::sim::{Sim, SimRngs};
use crate::{SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - `config`: run parameters (seed, frequencies, tick count, …).
/// - `graph`: the street map, already loaded.
/// - `router`: the pathfinding strategy couriers travel with.
///
/// # Optional inputs
///
/// | Method               | Default                                              |
/// |----------------------|------------------------------------------------------|
/// | `start_minute`       | `0` (midnight)                                       |
/// | `initial_couriers`   | hourly headcount target at the start minute          |
/// | `rng`                | `SimRng::new(config.seed)`                           |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, graph, DijkstraRouter)
///     .start_minute(7 * 60)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<R: Router> {
    config:           SimConfig,
    graph:            Graph,
    router:           R,
    start_minute:     Option<u32>,
    initial_couriers: Option<usize>,
    rng:              Option<SimRng>,
}

impl<R: Router> SimBuilder<R> {
    pub fn new(config: SimConfig, graph: Graph, router: R) -> Self {
        Self {
            config,
            graph,
            router,
            start_minute:     None,
            initial_couriers: None,
            rng:              None,
        }
    }

    /// Minute of day the clock starts at.
    pub fn start_minute(mut self, minute: u32) -> Self {
        self.start_minute = Some(minute);
        self
    }

    /// Couriers spawned before the first tick, overriding the hourly target.
    pub fn initial_couriers(mut self, count: usize) -> Self {
        self.initial_couriers = Some(count);
        self
    }

    /// Use a specific master RNG instead of seeding one from `config.seed`.
    pub fn rng(mut self, rng: SimRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Validate inputs and construct the [`Sim`].
    ///
    /// Starting inside business hours builds the heatmap straight away so
    /// the initial couriers have idle zones to head for.
    pub fn build(self) -> SimResult<Sim<R>> {
        let SimBuilder { config, mut graph, router, start_minute, initial_couriers, rng } = self;

        config.validate()?;
        if graph.is_empty() {
            return Err(SimError::Config("graph has no nodes".into()));
        }
        let start = start_minute.unwrap_or(0);
        if start >= MINUTES_PER_DAY {
            return Err(SimError::Config(format!(
                "start minute must be below {MINUTES_PER_DAY}, got {start}"
            )));
        }

        let mut clock = config.make_clock();
        clock.minute_of_day = start;

        let mut master = rng.unwrap_or_else(|| SimRng::new(config.seed));
        let mut rngs = SimRngs {
            orders: master.child(1),
            fleet:  master.child(2),
            churn:  master.child(3),
        };

        let mut heatmap = Heatmap::new(config.idle_zone_count);
        if clock.in_business_hours() {
            heatmap.regenerate(&mut graph, &clock)?;
        }

        let mut fleet = Fleet::new(config.distance_per_tick);
        let couriers = initial_couriers
            .unwrap_or_else(|| target_headcount(config.courier_frequency, clock.hour()));
        if couriers > 0 {
            fleet.rescale(couriers, &graph, &mut rngs.fleet)?;
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            restaurants = graph.restaurants().len(),
            customers = graph.customers().len(),
            couriers = fleet.len(),
            router = router.name(),
            start = %clock.time_of_day(),
            "simulation ready"
        );

        Ok(Sim {
            config,
            clock,
            graph,
            fleet,
            orders: OrderBook::new(),
            heatmap,
            router,
            rngs,
            obstructed: Vec::new(),
        })
    }
}
