//! Orders and the order book.
//!
//! # Status transitions
//!
//! ```text
//! Pending ──► Assigned ──► InTransit ──► Delivered
//!    │           │             │
//!    └───────────┴─────────────┴──────► Failed
//! ```
//!
//! Transitions only move forward.  Anything else is rejected with
//! [`DispatchError::InvalidTransition`] and leaves the order untouched.

use std::collections::VecDeque;
use std::fmt;

use fd_core::{CourierId, NodeId, OrderId, SimClock, Tick};

use crate::{DispatchError, DispatchResult};

/// Delivery window in simulated minutes.  Informational: late orders are
/// still delivered, only day rollover fails them.
pub const MAX_DELIVERY_MINUTES: u32 = 60;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum OrderStatus {
    Pending,
    Assigned,
    InTransit,
    Delivered,
    Failed,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending   => "pending",
            OrderStatus::Assigned  => "assigned",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Failed    => "failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id:             OrderId,
    pub restaurant:     NodeId,
    pub customer:       NodeId,
    pub created_at:     Tick,
    pub created_day:    u64,
    pub created_minute: u32,
    pub status:         OrderStatus,
    pub courier:        Option<CourierId>,
    pub picked_up_at:   Option<Tick>,
    pub delivered_at:   Option<Tick>,
    pub max_duration:   u32,
}

impl Order {
    /// Minutes from creation to delivery.  One tick is one simulated minute.
    pub fn delivery_minutes(&self) -> Option<u64> {
        self.delivered_at.map(|t| t.since(self.created_at))
    }

    /// `true` once the order has waited longer than its delivery window.
    pub fn is_overdue(&self, now: Tick) -> bool {
        !self.status.is_terminal() && now.since(self.created_at) > u64::from(self.max_duration)
    }
}

/// All orders ever created plus the queue of orders awaiting a courier.
///
/// `OrderId`s are issued sequentially and index directly into the history.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    history:                Vec<Order>,
    pending:                VecDeque<OrderId>,
    delivered:              usize,
    failed:                 usize,
    total_delivery_minutes: u64,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new Pending order placed at `clock`'s current time.
    pub fn create(&mut self, restaurant: NodeId, customer: NodeId, clock: &SimClock) -> OrderId {
        let id = OrderId(self.history.len() as u32);
        self.history.push(Order {
            id,
            restaurant,
            customer,
            created_at:     clock.tick,
            created_day:    clock.day_count,
            created_minute: clock.minute_of_day,
            status:         OrderStatus::Pending,
            courier:        None,
            picked_up_at:   None,
            delivered_at:   None,
            max_duration:   MAX_DELIVERY_MINUTES,
        });
        self.pending.push_back(id);
        id
    }

    pub fn get(&self, id: OrderId) -> DispatchResult<&Order> {
        self.history.get(id.index()).ok_or(DispatchError::UnknownOrder(id))
    }

    /// Every order in creation order.
    pub fn history(&self) -> &[Order] {
        &self.history
    }

    /// Pending orders, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.pending.iter().copied()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Orders with a courier that are not yet delivered.
    pub fn in_flight_count(&self) -> usize {
        self.history
            .iter()
            .filter(|o| matches!(o.status, OrderStatus::Assigned | OrderStatus::InTransit))
            .count()
    }

    pub fn total(&self) -> usize {
        self.history.len()
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Mean creation-to-delivery time over delivered orders (0 if none).
    pub fn average_delivery_minutes(&self) -> f64 {
        if self.delivered == 0 {
            0.0
        } else {
            self.total_delivery_minutes as f64 / self.delivered as f64
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────

    fn transition(&mut self, id: OrderId, allowed: &[OrderStatus], to: OrderStatus) -> DispatchResult<&mut Order> {
        let order = self.history.get_mut(id.index()).ok_or(DispatchError::UnknownOrder(id))?;
        if !allowed.contains(&order.status) {
            return Err(DispatchError::InvalidTransition { order: id, from: order.status, to });
        }
        order.status = to;
        Ok(order)
    }

    /// Pending → Assigned.  Removes the order from the pending queue.
    pub fn assign(&mut self, id: OrderId, courier: CourierId) -> DispatchResult<()> {
        self.transition(id, &[OrderStatus::Pending], OrderStatus::Assigned)?.courier = Some(courier);
        self.pending.retain(|&p| p != id);
        Ok(())
    }

    /// Assigned → InTransit.
    pub fn pick_up(&mut self, id: OrderId, now: Tick) -> DispatchResult<()> {
        self.transition(id, &[OrderStatus::Assigned], OrderStatus::InTransit)?.picked_up_at = Some(now);
        Ok(())
    }

    /// InTransit → Delivered.  Returns the delivery time in minutes.
    pub fn deliver(&mut self, id: OrderId, now: Tick) -> DispatchResult<u64> {
        let order = self.transition(id, &[OrderStatus::InTransit], OrderStatus::Delivered)?;
        order.delivered_at = Some(now);
        let minutes = now.since(order.created_at);
        self.delivered += 1;
        self.total_delivery_minutes += minutes;
        Ok(minutes)
    }

    /// Any non-terminal status → Failed.
    pub fn fail(&mut self, id: OrderId) -> DispatchResult<()> {
        self.transition(
            id,
            &[OrderStatus::Pending, OrderStatus::Assigned, OrderStatus::InTransit],
            OrderStatus::Failed,
        )?;
        self.failed += 1;
        self.pending.retain(|&p| p != id);
        Ok(())
    }

    /// Fail every order that is not yet delivered.  Returns the failed orders
    /// with the courier that was carrying each, so the fleet can be told.
    pub fn fail_outstanding(&mut self) -> Vec<(OrderId, Option<CourierId>)> {
        let mut failed = Vec::new();
        for order in &mut self.history {
            if !order.status.is_terminal() {
                order.status = OrderStatus::Failed;
                failed.push((order.id, order.courier));
            }
        }
        self.failed += failed.len();
        self.pending.clear();
        failed
    }
}
