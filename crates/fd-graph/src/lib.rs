//! `fd-graph` — road graph, priority queue, and shortest-path search.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`graph`]    | `Graph` arena (nodes, directed edge pairs), `Node`, `Edge`   |
//! | [`queue`]    | `PriorityQueue` — indexed binary heap with decrease-key      |
//! | [`search`]   | `dijkstra`, `a_star`, `greedy_best_first`, `traceback`       |
//! | [`router`]   | `Router` trait, `Path`, `Algorithm`, router impls            |
//! | [`snapshot`] | `GraphSnapshot` — serde input records for graph loading      |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `fd-core` types.        |

pub mod error;
pub mod graph;
pub mod queue;
pub mod router;
pub mod search;
pub mod snapshot;


pub use error::{GraphError, GraphResult};
pub use graph::{Edge, Graph, Node, NodeRole};
pub use queue::PriorityQueue;
pub use router::{AStarRouter, Algorithm, DijkstraRouter, GreedyRouter, Path, Router};
pub use search::{SearchTree, a_star, dijkstra, greedy_best_first, heuristic, traceback};
pub use snapshot::{EdgeRecord, GraphSnapshot, NodeRecord};
