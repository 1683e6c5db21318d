use fd_core::{CourierId, NodeId};
use fd_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("courier {0} does not exist")]
    UnknownCourier(CourierId),

    #[error("courier {0} already carries an order")]
    AlreadyAssigned(CourierId),

    #[error("courier {courier} cannot reach {target}")]
    Unreachable { courier: CourierId, target: NodeId },

    #[error("graph has no nodes to spawn couriers on")]
    NoSpawnNodes,

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type FleetResult<T> = Result<T, FleetError>;
