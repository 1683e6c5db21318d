//! Simulation time model.
//!
//! # Design
//!
//! One tick is one simulated minute.  The clock tracks two views of time:
//!
//! - an absolute, monotonically increasing `Tick` counter (never wraps), and
//! - the wall-of-day view `(day_count, minute_of_day)` that every periodic
//!   job keys off.  `minute_of_day` wraps to 0 exactly at 1440 and bumps
//!   `day_count`.
//!
//! How long a tick lasts in real time (`tick_duration_ms`) only matters to a
//! presentation layer pacing the run; the engine itself never sleeps.

use std::fmt;

use crate::{FdError, FdResult};

/// Minutes in one simulated day.
pub const MINUTES_PER_DAY: u32 = 1_440;

/// First minute of the business window (08:00).
pub const BUSINESS_OPEN_MINUTE: u32 = 8 * 60;

/// First minute after the business window (21:00).
pub const BUSINESS_CLOSE_MINUTE: u32 = 21 * 60;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter (one tick = one simulated minute).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Ticks elapsed from `earlier` to `self` (saturating at zero).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The simulation clock passed to every periodic job.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Minute within the current day, in `[0, 1440)`.
    pub minute_of_day: u32,
    /// Completed day rollovers since the start of the run.
    pub day_count: u64,
    /// Absolute tick counter.
    pub tick: Tick,
    /// Real milliseconds per simulated minute (pacing only).
    pub tick_duration_ms: f64,
}

impl SimClock {
    /// A clock at 00:00 on day 0.
    pub fn new(tick_duration_ms: f64) -> Self {
        Self {
            minute_of_day: 0,
            day_count: 0,
            tick: Tick::ZERO,
            tick_duration_ms,
        }
    }

    /// Advance the clock by one simulated minute.
    ///
    /// Returns `true` when this step wrapped `minute_of_day` back to 0, i.e.
    /// a new day has started.
    pub fn advance(&mut self) -> bool {
        self.tick = self.tick + 1;
        self.minute_of_day += 1;
        if self.minute_of_day >= MINUTES_PER_DAY {
            self.minute_of_day = 0;
            self.day_count += 1;
            return true;
        }
        false
    }

    /// Hour of the day, `0..24`.
    #[inline]
    pub fn hour(&self) -> usize {
        (self.minute_of_day / 60) as usize
    }

    /// Fractional hour of the day (`minute_of_day / 60`), the input of the
    /// demand intensity curves.
    #[inline]
    pub fn hour_f64(&self) -> f64 {
        self.minute_of_day as f64 / 60.0
    }

    /// `true` when the current minute is a multiple of `period` minutes.
    #[inline]
    pub fn every(&self, period: u32) -> bool {
        period > 0 && self.minute_of_day % period == 0
    }

    /// `true` inside the 08:00–21:00 business window.
    #[inline]
    pub fn in_business_hours(&self) -> bool {
        (BUSINESS_OPEN_MINUTE..BUSINESS_CLOSE_MINUTE).contains(&self.minute_of_day)
    }

    /// Format the time of day as `HH:MM`.
    pub fn time_of_day(&self) -> String {
        format!("{:02}:{:02}", self.minute_of_day / 60, self.minute_of_day % 60)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (day {} {})", self.tick, self.day_count, self.time_of_day())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate (field names
/// use the kebab-case keys of the configuration page) and passed to the
/// simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case", default))]
pub struct SimConfig {
    /// Per-restaurant order probability ceiling, scaled by the intensity
    /// curve at each generation pass.
    pub order_frequency: f64,

    /// Simulated minutes per real second.  Derives `tick_duration_ms`.
    pub ticks_per_second: f64,

    /// Peak courier headcount; scaled by the hourly multiplier table.
    pub courier_frequency: f64,

    /// How many idle zones the heatmap nominates each hour.
    pub idle_zone_count: usize,

    /// Number of connections perturbed per obstruction churn cycle.
    /// `0` disables churn.
    pub obstruction_level: usize,

    /// Edge weight a courier covers per simulated minute.
    pub distance_per_tick: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Total ticks `Sim::run` simulates.  1440 = one day.
    pub total_ticks: u64,

    /// Emit a courier snapshot every N ticks.  `0` disables snapshots.
    pub snapshot_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            order_frequency:         0.5,
            ticks_per_second:        10.0,
            courier_frequency:       10.0,
            idle_zone_count:         3,
            obstruction_level:       0,
            distance_per_tick:       300.0,
            seed:                    42,
            total_ticks:             MINUTES_PER_DAY as u64,
            snapshot_interval_ticks: 0,
        }
    }
}

impl SimConfig {
    /// Real milliseconds per simulated minute.
    #[inline]
    pub fn tick_duration_ms(&self) -> f64 {
        1_000.0 / self.ticks_per_second
    }

    /// The tick at which `Sim::run` stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_ms())
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> FdResult<()> {
        if !(self.ticks_per_second.is_finite() && self.ticks_per_second > 0.0) {
            return Err(FdError::Config(format!(
                "ticks-per-second must be positive, got {}",
                self.ticks_per_second
            )));
        }
        if !(self.distance_per_tick.is_finite() && self.distance_per_tick > 0.0) {
            return Err(FdError::Config(format!(
                "distance-per-tick must be positive, got {}",
                self.distance_per_tick
            )));
        }
        if !(self.order_frequency.is_finite() && self.order_frequency >= 0.0) {
            return Err(FdError::Config(format!(
                "order-frequency must be non-negative, got {}",
                self.order_frequency
            )));
        }
        if !(self.courier_frequency.is_finite() && self.courier_frequency >= 0.0) {
            return Err(FdError::Config(format!(
                "courier-frequency must be non-negative, got {}",
                self.courier_frequency
            )));
        }
        Ok(())
    }
}
