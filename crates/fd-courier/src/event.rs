//! Events produced by [`Fleet::step`](crate::Fleet::step).

use fd_core::{CourierId, NodeId, OrderId};

/// Something that happened to a courier during a movement step.
///
/// Order-related events carry the `OrderId` so the order book can apply the
/// matching status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourierEvent {
    /// The courier reached the restaurant and collected the order.
    PickedUp { courier: CourierId, order: OrderId, node: NodeId },

    /// The courier reached the customer; the courier is now free.
    Delivered { courier: CourierId, order: OrderId, node: NodeId },

    /// A courier heading to an idle zone arrived there and is now Idle.
    ReachedIdleZone { courier: CourierId, node: NodeId },

    /// A courier flagged for termination finished its work and was removed.
    Retired { courier: CourierId },
}

impl CourierEvent {
    pub fn courier(&self) -> CourierId {
        match *self {
            CourierEvent::PickedUp { courier, .. }
            | CourierEvent::Delivered { courier, .. }
            | CourierEvent::ReachedIdleZone { courier, .. }
            | CourierEvent::Retired { courier } => courier,
        }
    }
}
