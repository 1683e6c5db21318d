//! Simulation observer trait for progress reporting and data collection.

use fd_core::SimClock;
use fd_courier::Fleet;
use fd_graph::Graph;

use crate::{SimStats, TickReport};

/// Callbacks invoked by [`Sim::tick`][crate::Sim::tick] and
/// [`Sim::run`][crate::Sim::run] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: delivery counter
///
/// ```rust,ignore
/// struct Deliveries(usize);
///
/// impl SimObserver for Deliveries {
///     fn on_tick_end(&mut self, _clock: &SimClock, report: &TickReport) {
///         self.0 += report.delivered;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before the clock advances.  `clock` still shows the previous
    /// minute.
    fn on_tick_start(&mut self, _clock: &SimClock) {}

    /// Called once all of the tick's jobs have run.
    fn on_tick_end(&mut self, _clock: &SimClock, _report: &TickReport) {}

    /// Called every `config.snapshot_interval_ticks` ticks, after
    /// `on_tick_end`.
    ///
    /// Gives read-only access to courier positions and the current edge
    /// weights so writers can record a frame without the sim knowing about
    /// any output format.
    fn on_snapshot(&mut self, _clock: &SimClock, _fleet: &Fleet, _graph: &Graph) {}

    /// Called at midnight, after outstanding orders have been failed.
    /// `day` is the day that just ended (0-based).
    fn on_day_end(&mut self, _day: u64, _stats: &SimStats) {}

    /// Called once after [`Sim::run`][crate::Sim::run] finishes its last tick.
    fn on_sim_end(&mut self, _stats: &SimStats) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
