//! Plain data rows written by output backends.

/// One courier at one snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourierSnapshotRow {
    pub tick:       u64,
    pub day:        u64,
    pub minute:     u32,
    pub courier_id: u32,
    pub state:      &'static str,
    /// Interpolated map position; mid-edge couriers sit between endpoints.
    pub x:          f64,
    pub y:          f64,
    /// Current node, or the node at the end of the edge being travelled.
    pub anchor:     u32,
    pub on_edge:    bool,
    /// Order being handled; `u32::MAX` when the courier has no job.
    pub order_id:   u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:           u64,
    pub day:            u64,
    pub minute:         u32,
    /// Real time into the run at the configured pace.
    pub wall_ms:        f64,
    pub orders_created: u64,
    pub assigned:       u64,
    pub picked_up:      u64,
    pub delivered:      u64,
    pub failed:         u64,
    pub pending:        u64,
    pub couriers:       u64,
}
