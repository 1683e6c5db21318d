//! Graph-subsystem error type.

use thiserror::Error;

use fd_core::{EdgeId, NodeId};

/// Errors produced by `fd-graph`.
///
/// An unreachable target is deliberately *not* an error: searches return the
/// single-node sentinel path instead (see [`crate::traceback`]).
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node `{0}` not found in graph")]
    NodeNotFound(String),

    #[error("node {0} not found in graph")]
    UnknownNode(NodeId),

    #[error("no edge from {from} to {to}")]
    EdgeNotFound { from: NodeId, to: NodeId },

    #[error("edge {0} not found in graph")]
    UnknownEdge(EdgeId),

    #[error("node `{0}` already exists")]
    DuplicateNode(String),

    #[error("edge from {from} to {to} already exists")]
    DuplicateEdge { from: NodeId, to: NodeId },

    #[error("self-loop on {0} is not a traversable connection")]
    SelfLoop(NodeId),

    #[error("node key must not be empty")]
    EmptyKey,

    #[error("obstruction factor must be a finite value >= 1, got {0}")]
    InvalidObstruction(f64),

    #[error("cannot dequeue from an empty priority queue")]
    EmptyQueue,
}

pub type GraphResult<T> = Result<T, GraphError>;
