//! Serializable map snapshot and the loader that turns it into a [`Graph`].
//!
//! The on-disk shape (JSON in the demo) is:
//!
//! ```json
//! {
//!   "nodes": [{ "id": "R1", "x": 0.0, "y": 0.0, "order_rate": 0.4 }, ...],
//!   "edges": [{ "source": "R1", "target": "N2" }, ...]
//! }
//! ```
//!
//! `obstruction` defaults to 1 and `one_way` to `false`, so a plain
//! `source`/`target` pair is a two-way street at free-flow weight.

use serde::{Deserialize, Serialize};
use tracing::debug;

use fd_core::{IntensityCurve, Point};

use crate::graph::{Graph, NodeRole};
use crate::GraphResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// Restaurant order probability ceiling; falls back to the loader default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_rate: Option<f64>,
}

fn free_flow() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    #[serde(default = "free_flow")]
    pub obstruction: f64,
    #[serde(default)]
    pub one_way: bool,
}

/// A whole map: node records followed by the connections between them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl Graph {
    /// Build a graph from `snapshot`.
    ///
    /// Restaurants receive `default_order_rate` unless their record carries
    /// one, and alternate demand curves by position: the first half (rounded
    /// up) follows the lunch curve, the rest the dinner curve.
    pub fn from_snapshot(snapshot: &GraphSnapshot, default_order_rate: f64) -> GraphResult<Graph> {
        let mut graph = Graph::with_capacity(snapshot.nodes.len(), snapshot.edges.len() * 2);

        for record in &snapshot.nodes {
            let id = graph.add_node(record.id.as_str(), Point::new(record.x, record.y))?;
            if let Some(rate) = record.order_rate {
                graph.node_mut(id)?.order_rate = rate;
            }
        }

        let restaurants = graph.restaurants();
        let count = restaurants.len();
        for (index, &id) in restaurants.iter().enumerate() {
            let explicit = snapshot
                .nodes
                .get(id.index())
                .and_then(|r| r.order_rate)
                .is_some();
            let node = graph.node_mut(id)?;
            debug_assert_eq!(node.role, NodeRole::Restaurant);
            if !explicit {
                node.order_rate = default_order_rate;
            }
            node.curve = IntensityCurve::for_restaurant(index, count);
        }

        for record in &snapshot.edges {
            let from = graph.node_id(&record.source)?;
            let to = graph.node_id(&record.target)?;
            if record.one_way {
                graph.add_directed_edge(from, to, record.obstruction)?;
            } else {
                graph.add_edge(from, to, record.obstruction)?;
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            restaurants = count,
            "graph loaded from snapshot"
        );
        Ok(graph)
    }

    /// Inverse of [`Graph::from_snapshot`].  Two-way connections are written
    /// once.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        let nodes = self
            .nodes()
            .map(|(_, n)| NodeRecord {
                id: n.key.clone(),
                x: n.pos.x,
                y: n.pos.y,
                order_rate: (n.role == NodeRole::Restaurant).then_some(n.order_rate),
            })
            .collect();
        let edges = self
            .connections()
            .into_iter()
            .filter_map(|id| {
                let e = self.edge(id).ok()?;
                Some(EdgeRecord {
                    source: self.key(e.from).to_owned(),
                    target: self.key(e.to).to_owned(),
                    obstruction: e.obstruction,
                    one_way: self.reverse_of(id).is_none(),
                })
            })
            .collect();
        GraphSnapshot { nodes, edges }
    }
}
