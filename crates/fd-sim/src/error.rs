use fd_core::FdError;
use fd_courier::FleetError;
use fd_dispatch::DispatchError;
use fd_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] FdError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("fleet error: {0}")]
    Fleet(#[from] FleetError),

    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

pub type SimResult<T> = Result<T, SimError>;
