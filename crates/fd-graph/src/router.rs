//! Routing trait, path type, and the three search-backed routers.
//!
//! # Pluggability
//!
//! `fd-sim` calls routing through the [`Router`] trait, so the search used
//! for courier trips is chosen when the simulation is built.  [`Algorithm`]
//! names the built-in routers so the choice can come from a config file.
//!
//! Dispatch always scores couriers with a full [`dijkstra`] tree from the
//! restaurant, independent of the configured router.

use std::fmt;

use fd_core::NodeId;

use crate::graph::Graph;
use crate::search::{SearchTree, a_star, dijkstra, greedy_best_first, traceback};
use crate::GraphResult;

// ── Path ──────────────────────────────────────────────────────────────────────

/// An ordered node sequence plus its total weight.
///
/// An unreachable target is represented as the single-node path `[source]`
/// with infinite cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    pub cost: f64,
}

impl Path {
    /// Read the path to `target` out of a finished search.
    pub fn from_tree(tree: &SearchTree, target: NodeId) -> Path {
        let nodes = traceback(tree, target);
        let cost = if target == tree.source {
            0.0
        } else if nodes.len() == 1 {
            f64::INFINITY
        } else {
            tree.distance_to(target)
        };
        Path { nodes, cost }
    }

    /// The "no path" sentinel for `source`.
    pub fn unreachable(source: NodeId) -> Path {
        Path { nodes: vec![source], cost: f64::INFINITY }
    }

    /// `true` if the search never reached the requested target.
    pub fn is_unreachable(&self) -> bool {
        self.cost.is_infinite()
    }

    /// `true` if the path has no edges to walk.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn source(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn target(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Number of edges along the path.
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable point-to-point routing.
///
/// Implementations must be `Send + Sync` so a built `Sim` can be moved to a
/// worker thread.
pub trait Router: Send + Sync {
    /// Route from `from` to `to`.  Unknown nodes are errors; a disconnected
    /// target yields [`Path::unreachable`].
    fn route(&self, graph: &Graph, from: NodeId, to: NodeId) -> GraphResult<Path>;

    /// Short name for logs and output files.
    fn name(&self) -> &'static str;
}

// ── Built-in routers ──────────────────────────────────────────────────────────

/// Full single-source Dijkstra, then traceback.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &Graph, from: NodeId, to: NodeId) -> GraphResult<Path> {
        graph.node(to)?;
        let tree = dijkstra(graph, from)?;
        Ok(Path::from_tree(&tree, to))
    }

    fn name(&self) -> &'static str {
        "dijkstra"
    }
}

/// A* with the straight-line heuristic.  Same paths as Dijkstra, fewer
/// expansions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(&self, graph: &Graph, from: NodeId, to: NodeId) -> GraphResult<Path> {
        let tree = a_star(graph, from, to)?;
        Ok(Path::from_tree(&tree, to))
    }

    fn name(&self) -> &'static str {
        "astar"
    }
}

/// Greedy best-first.  Not optimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyRouter;

impl Router for GreedyRouter {
    fn route(&self, graph: &Graph, from: NodeId, to: NodeId) -> GraphResult<Path> {
        let tree = greedy_best_first(graph, from, to)?;
        Ok(Path::from_tree(&tree, to))
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}

// ── Algorithm ─────────────────────────────────────────────────────────────────

/// Config-selectable name for one of the built-in routers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Dijkstra,
    #[serde(rename = "astar", alias = "a-star", alias = "a_star")]
    AStar,
    Greedy,
}

impl Algorithm {
    /// Boxed router for this algorithm.
    pub fn router(self) -> Box<dyn Router> {
        match self {
            Algorithm::Dijkstra => Box::new(DijkstraRouter),
            Algorithm::AStar    => Box::new(AStarRouter),
            Algorithm::Greedy   => Box::new(GreedyRouter),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar    => "astar",
            Algorithm::Greedy   => "greedy",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Router for Box<dyn Router> {
    fn route(&self, graph: &Graph, from: NodeId, to: NodeId) -> GraphResult<Path> {
        (**self).route(graph, from, to)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
