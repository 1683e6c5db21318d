use fd_core::OrderId;
use fd_courier::FleetError;
use fd_graph::GraphError;
use thiserror::Error;

use crate::OrderStatus;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("order {0} does not exist")]
    UnknownOrder(OrderId),

    #[error("order {order} cannot go from {from} to {to}")]
    InvalidTransition {
        order: OrderId,
        from:  OrderStatus,
        to:    OrderStatus,
    },

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("fleet error: {0}")]
    Fleet(#[from] FleetError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
