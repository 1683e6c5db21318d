//! Per-tick reports and running totals.

use fd_core::{NodeId, SimClock, Tick};
use fd_courier::{Fleet, HeadcountChange};
use fd_dispatch::OrderBook;

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick:           Tick,
    pub minute_of_day:  u32,
    pub day_count:      u64,
    /// `true` when this tick crossed midnight.
    pub rolled_over:    bool,
    /// Orders failed by the midnight rollover.
    pub failed:         usize,
    /// Set on the hourly headcount tick.
    pub headcount:      Option<HeadcountChange>,
    /// Idle zones picked this tick, in selection order.  Empty unless the
    /// heatmap was rebuilt.
    pub idle_zones:     Vec<NodeId>,
    /// Idle couriers sent towards a freshly picked zone.
    pub rehomed:        usize,
    /// Connections given a new obstruction factor.
    pub obstructed:     usize,
    pub orders_created: usize,
    pub assigned:       usize,
    pub picked_up:      usize,
    pub delivered:      usize,
    pub reached_zone:   usize,
    pub retired:        usize,
    /// Orders still waiting for a courier after this tick.
    pub pending:        usize,
    /// Fleet size after this tick, flagged couriers included.
    pub couriers:       usize,
}

impl TickReport {
    pub(crate) fn at(clock: &SimClock) -> Self {
        Self {
            tick:          clock.tick,
            minute_of_day: clock.minute_of_day,
            day_count:     clock.day_count,
            ..Self::default()
        }
    }
}

/// Running totals over the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimStats {
    pub tick:                     Tick,
    pub minute_of_day:            u32,
    pub day_count:                u64,
    pub total_orders:             usize,
    pub delivered:                usize,
    pub failed:                   usize,
    pub pending:                  usize,
    /// Assigned or in transit.
    pub in_flight:                usize,
    pub average_delivery_minutes: f64,
    /// Couriers on shift, excluding those flagged to leave.
    pub active_couriers:          usize,
    pub busy_couriers:            usize,
}

impl SimStats {
    pub fn collect(clock: &SimClock, orders: &OrderBook, fleet: &Fleet) -> Self {
        Self {
            tick:                     clock.tick,
            minute_of_day:            clock.minute_of_day,
            day_count:                clock.day_count,
            total_orders:             orders.total(),
            delivered:                orders.delivered(),
            failed:                   orders.failed(),
            pending:                  orders.pending_count(),
            in_flight:                orders.in_flight_count(),
            average_delivery_minutes: orders.average_delivery_minutes(),
            active_couriers:          fleet.active_count(),
            busy_couriers:            fleet.busy_count(),
        }
    }
}
