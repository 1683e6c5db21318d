//! courier_town — two simulated days of food delivery on a synthetic grid.
//!
//! ```text
//! cargo run -p courier_town --release -- [config.json] [map.json]
//! ```
//!
//! Without arguments the built-in grid from `town.rs` and the defaults below
//! are used.  Set `RUST_LOG=debug` to follow individual orders and couriers.

mod town;

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fd_core::{SimClock, SimConfig};
use fd_courier::Fleet;
use fd_graph::{Algorithm, Graph, GraphSnapshot};
use fd_output::{CsvWriter, OutputWriter, SimOutputObserver};
use fd_sim::{SimBuilder, SimObserver, SimStats, TickReport};

use town::build_town;

// ── Constants ─────────────────────────────────────────────────────────────────

const SIM_DAYS:     u64 = 2;
const SEED:         u64 = 42;
const START_MINUTE: u32 = 7 * 60;

// ── Configuration file ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
struct DemoConfig {
    algorithm:  Algorithm,
    output_dir: PathBuf,
    /// Sleep between ticks to honour `ticks-per-second`.
    realtime:   bool,
    sim:        SimConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            algorithm:  Algorithm::AStar,
            output_dir: PathBuf::from("output/courier_town"),
            realtime:   false,
            sim:        SimConfig {
                seed:                    SEED,
                total_ticks:             SIM_DAYS * 1_440,
                snapshot_interval_ticks: 15,
                obstruction_level:       6,
                ..SimConfig::default()
            },
        }
    }
}

fn load_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Forwards to the CSV observer, counts rows, and paces ticks when asked.
struct TownObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    pace:          Option<Duration>,
    summary_rows:  usize,
    snapshot_rows: usize,
}

impl<W: OutputWriter> SimObserver for TownObserver<W> {
    fn on_tick_end(&mut self, clock: &SimClock, report: &TickReport) {
        self.summary_rows += 1;
        self.inner.on_tick_end(clock, report);
        if let Some(pace) = self.pace {
            thread::sleep(pace);
        }
    }

    fn on_snapshot(&mut self, clock: &SimClock, fleet: &Fleet, graph: &Graph) {
        self.snapshot_rows += fleet.len();
        self.inner.on_snapshot(clock, fleet, graph);
    }

    fn on_day_end(&mut self, day: u64, stats: &SimStats) {
        println!(
            "day {day}: {} orders, {} delivered, {} failed, avg {:.1} min",
            stats.total_orders, stats.delivered, stats.failed, stats.average_delivery_minutes
        );
    }

    fn on_sim_end(&mut self, stats: &SimStats) {
        self.inner.on_sim_end(stats);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let config: DemoConfig = match args.next() {
        Some(path) => load_json(Path::new(&path))?,
        None => DemoConfig::default(),
    };
    let snapshot: GraphSnapshot = match args.next() {
        Some(path) => load_json(Path::new(&path))?,
        None => build_town(),
    };

    println!("=== courier_town ===");
    println!(
        "Router: {}  |  Ticks: {}  |  Seed: {}",
        config.algorithm, config.sim.total_ticks, config.sim.seed
    );

    // 1. Map.
    let graph = Graph::from_snapshot(&snapshot, config.sim.order_frequency)?;
    println!(
        "Map: {} nodes, {} edges, {} restaurants, {} customers",
        graph.node_count(),
        graph.edge_count(),
        graph.restaurants().len(),
        graph.customers().len()
    );

    // 2. Sim.
    let mut sim = SimBuilder::new(config.sim.clone(), graph, config.algorithm.router())
        .start_minute(START_MINUTE)
        .build()?;

    // 3. Output.
    let writer = CsvWriter::new(&config.output_dir)?;
    let mut obs = TownObserver {
        inner:         SimOutputObserver::new(writer, &config.sim),
        pace:          config
            .realtime
            .then(|| Duration::from_secs_f64(config.sim.tick_duration_ms() / 1_000.0)),
        summary_rows:  0,
        snapshot_rows: 0,
    };

    // 4. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();
    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    let stats = sim.stats();
    info!(elapsed_s = elapsed.as_secs_f64(), "run complete");
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  courier_snapshots.csv : {} rows", obs.snapshot_rows);
    println!("  tick_summaries.csv    : {} rows", obs.summary_rows);
    println!();
    println!("{:<24} {:>8}", "Orders placed", stats.total_orders);
    println!("{:<24} {:>8}", "Delivered", stats.delivered);
    println!("{:<24} {:>8}", "Failed", stats.failed);
    println!("{:<24} {:>8.1}", "Avg delivery (min)", stats.average_delivery_minutes);
    println!("{:<24} {:>8}", "Couriers on shift", stats.active_couriers);
    println!("{:<24} {:>8}", "Edges highlighted", sim.highlighted_edges().len());

    let zones: Vec<&str> = sim.graph.idle_zones().into_iter().map(|z| sim.graph.key(z)).collect();
    println!("{:<24} {}", "Idle zones", zones.join(", "));

    Ok(())
}
