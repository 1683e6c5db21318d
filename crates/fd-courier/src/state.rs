//! Per-courier state machine values.

use std::fmt;

use fd_core::{EdgeId, NodeId, OrderId};

/// Lifecycle state of a courier.
///
/// ```text
///            spawn
///              │
///              ▼
///   ┌────── Idle ◄──────────────┐
///   │        │ zone exists      │ arrived
///   │        ▼                  │
///   │  MovingToIdleZone ────────┘
///   │        │ assigned (redirect at next node)
///   ▼        ▼
///  Dispatched ──(at restaurant)──► EnRouteToCustomer ──(at customer)──► Idle
///                                                   └─(flagged)──► Terminating
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum CourierState {
    #[default]
    Idle,
    MovingToIdleZone,
    /// Heading to the restaurant of its job.
    Dispatched,
    /// Carrying the order to the customer.
    EnRouteToCustomer,
    /// Finished its last job after being flagged; removed at the end of the
    /// movement step.
    Terminating,
}

impl CourierState {
    pub fn as_str(self) -> &'static str {
        match self {
            CourierState::Idle              => "idle",
            CourierState::MovingToIdleZone  => "moving_to_idle_zone",
            CourierState::Dispatched        => "dispatched",
            CourierState::EnRouteToCustomer => "en_route_to_customer",
            CourierState::Terminating       => "terminating",
        }
    }
}

impl fmt::Display for CourierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a courier physically is.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum CourierPosition {
    AtNode(NodeId),
    /// Travelling `from → to` along `edge`; `progress` is the covered fraction
    /// of the edge in `[0, 1)`.
    OnEdge {
        edge:     EdgeId,
        from:     NodeId,
        to:       NodeId,
        progress: f64,
    },
}

impl CourierPosition {
    /// The node routing decisions are made from: the current node, or the
    /// node at the end of the edge being travelled.
    #[inline]
    pub fn anchor(&self) -> NodeId {
        match *self {
            CourierPosition::AtNode(node) => node,
            CourierPosition::OnEdge { to, .. } => to,
        }
    }

    #[inline]
    pub fn is_on_edge(&self) -> bool {
        matches!(self, CourierPosition::OnEdge { .. })
    }
}

/// The single order a courier is working on.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Job {
    pub order:      OrderId,
    pub restaurant: NodeId,
    pub customer:   NodeId,
}
