//! Road graph store.
//!
//! # Data layout
//!
//! Nodes and edges live in two arenas (`Vec<Node>`, `Vec<Edge>`) addressed by
//! the dense handles `NodeId` / `EdgeId`.  Each node keeps the list of its
//! outgoing `EdgeId`s, so iterating a node's neighbours (the inner loop of
//! every search) is a short slice scan.  String keys from the map snapshot are
//! resolved once through `key_index`; everything after loading works on
//! integer handles.
//!
//! A traversable connection is stored as **two** directed edges (A→B and
//! B→A).  One-way streets are a single directed edge.  Edges are never
//! removed; only their obstruction factor (and therefore weight) changes.

use rustc_hash::FxHashMap;
use tracing::warn;

use fd_core::{EdgeId, IntensityCurve, NodeId, Point};

use crate::{GraphError, GraphResult};

// ── Node ──────────────────────────────────────────────────────────────────────

/// What a node represents on the map.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum NodeRole {
    /// Plain road junction.  Only junctions accumulate heat and can become
    /// idle zones.
    #[default]
    Junction,
    Restaurant,
    Customer,
}

impl NodeRole {
    /// Classify a node by the leading character of its key.
    ///
    /// `R` → restaurant, `C` → customer, `N`/`J` → junction.  Returns `None`
    /// for any other prefix (including an empty key).
    pub fn from_key(key: &str) -> Option<NodeRole> {
        match key.chars().next()? {
            'R' => Some(NodeRole::Restaurant),
            'C' => Some(NodeRole::Customer),
            'N' | 'J' => Some(NodeRole::Junction),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeRole::Junction   => "junction",
            NodeRole::Restaurant => "restaurant",
            NodeRole::Customer   => "customer",
        }
    }
}

/// One map node with its demand-related state.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique key from the map snapshot (e.g. `"R1"`, `"N12"`).
    pub key: String,
    pub pos: Point,
    pub role: NodeRole,
    /// Accumulated demand heat.  Only meaningful on junctions.
    pub heat: f64,
    /// Order probability ceiling.  Only meaningful on restaurants.
    pub order_rate: f64,
    /// Daily demand shape.  Only meaningful on restaurants.
    pub curve: IntensityCurve,
    /// Set by the heatmap when this node is nominated as an idle zone.
    pub is_idle_zone: bool,
}

impl Node {
    fn new(key: String, pos: Point, role: NodeRole) -> Self {
        Self {
            key,
            pos,
            role,
            heat: 0.0,
            order_rate: 0.0,
            curve: IntensityCurve::default(),
            is_idle_zone: false,
        }
    }

    #[inline]
    pub fn is_junction(&self) -> bool {
        self.role == NodeRole::Junction
    }
}

// ── Edge ──────────────────────────────────────────────────────────────────────

/// A directed edge.  `weight` is kept equal to `length * obstruction`.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    /// Euclidean distance between the endpoints, fixed at creation.
    pub length: f64,
    /// Congestion multiplier, always `>= 1`.
    pub obstruction: f64,
    /// Traversal cost used by every search.
    pub weight: f64,
}

fn check_obstruction(factor: f64) -> GraphResult<()> {
    if factor.is_finite() && factor >= 1.0 {
        Ok(())
    } else {
        Err(GraphError::InvalidObstruction(factor))
    }
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// Weighted directed road graph.
///
/// # Example
///
/// ```
/// use fd_core::Point;
/// use fd_graph::Graph;
///
/// let mut g = Graph::new();
/// let r = g.add_node("R1", Point::new(0.0, 0.0)).unwrap();
/// let c = g.add_node("C1", Point::new(3.0, 4.0)).unwrap();
/// g.add_edge(r, c, 1.0).unwrap();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_count(), 2); // both directions
/// assert_eq!(g.edge(g.edge_between(r, c).unwrap()).unwrap().length, 5.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes:      Vec<Node>,
    edges:      Vec<Edge>,
    out_edges:  Vec<Vec<EdgeId>>,
    key_index:  FxHashMap<String, NodeId>,
    pair_index: FxHashMap<(NodeId, NodeId), EdgeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of nodes and directed edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:      Vec::with_capacity(nodes),
            edges:      Vec::with_capacity(edges),
            out_edges:  Vec::with_capacity(nodes),
            key_index:  FxHashMap::with_capacity_and_hasher(nodes, Default::default()),
            pair_index: FxHashMap::with_capacity_and_hasher(edges, Default::default()),
        }
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Add a node whose role is derived from its key prefix.
    ///
    /// Unrecognized prefixes are logged and the node becomes a junction.
    pub fn add_node(&mut self, key: impl Into<String>, pos: Point) -> GraphResult<NodeId> {
        let key = key.into();
        let role = match NodeRole::from_key(&key) {
            Some(role) => role,
            None => {
                if !key.is_empty() {
                    warn!(node = %key, "unrecognized node role prefix; treating as junction");
                }
                NodeRole::Junction
            }
        };
        self.add_node_with_role(key, pos, role)
    }

    /// Add a node with an explicit role, ignoring the key prefix.
    pub fn add_node_with_role(
        &mut self,
        key:  impl Into<String>,
        pos:  Point,
        role: NodeRole,
    ) -> GraphResult<NodeId> {
        let key = key.into();
        if key.is_empty() {
            return Err(GraphError::EmptyKey);
        }
        if self.key_index.contains_key(&key) {
            return Err(GraphError::DuplicateNode(key));
        }
        let id = NodeId(self.nodes.len() as u32);
        self.key_index.insert(key.clone(), id);
        self.nodes.push(Node::new(key, pos, role));
        self.out_edges.push(Vec::new());
        Ok(id)
    }

    /// Add a **directed** edge `from → to`.  Length is the Euclidean distance
    /// between the endpoints; weight is `length * obstruction`.
    pub fn add_directed_edge(
        &mut self,
        from:        NodeId,
        to:          NodeId,
        obstruction: f64,
    ) -> GraphResult<EdgeId> {
        self.check_new_edge(from, to, obstruction)?;
        Ok(self.push_edge(from, to, obstruction))
    }

    /// Add a traversable connection: edges in **both directions** with the
    /// same length and obstruction.  Returns `(a→b, b→a)`.
    pub fn add_edge(
        &mut self,
        a:           NodeId,
        b:           NodeId,
        obstruction: f64,
    ) -> GraphResult<(EdgeId, EdgeId)> {
        // Validate both directions before inserting either.
        self.check_new_edge(a, b, obstruction)?;
        self.check_new_edge(b, a, obstruction)?;
        let forward  = self.push_edge(a, b, obstruction);
        let backward = self.push_edge(b, a, obstruction);
        Ok((forward, backward))
    }

    fn check_new_edge(&self, from: NodeId, to: NodeId, obstruction: f64) -> GraphResult<()> {
        self.node(from)?;
        self.node(to)?;
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        check_obstruction(obstruction)?;
        if self.pair_index.contains_key(&(from, to)) {
            return Err(GraphError::DuplicateEdge { from, to });
        }
        Ok(())
    }

    fn push_edge(&mut self, from: NodeId, to: NodeId, obstruction: f64) -> EdgeId {
        let length = self.nodes[from.index()].pos.distance(self.nodes[to.index()].pos);
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge {
            from,
            to,
            length,
            obstruction,
            weight: length * obstruction,
        });
        self.out_edges[from.index()].push(id);
        self.pair_index.insert((from, to), id);
        id
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Resolve a snapshot key to its handle.
    pub fn node_id(&self, key: &str) -> GraphResult<NodeId> {
        self.key_index
            .get(key)
            .copied()
            .ok_or_else(|| GraphError::NodeNotFound(key.to_owned()))
    }

    pub fn node(&self, id: NodeId) -> GraphResult<&Node> {
        self.nodes.get(id.index()).ok_or(GraphError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        self.nodes.get_mut(id.index()).ok_or(GraphError::UnknownNode(id))
    }

    pub fn edge(&self, id: EdgeId) -> GraphResult<&Edge> {
        self.edges.get(id.index()).ok_or(GraphError::UnknownEdge(id))
    }

    /// Position of `id`.
    pub fn position(&self, id: NodeId) -> GraphResult<Point> {
        self.node(id).map(|n| n.pos)
    }

    /// Key of `id`, or `"?"` for an unknown handle.  Meant for log lines.
    pub fn key(&self, id: NodeId) -> &str {
        self.nodes.get(id.index()).map_or("?", |n| n.key.as_str())
    }

    /// All nodes with their handles, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// All directed edges with their handles.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId(i as u32), e))
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Outgoing edges of `node` as `(edge id, edge)` pairs.
    pub fn neighbors(&self, node: NodeId) -> GraphResult<impl Iterator<Item = (EdgeId, &Edge)> + '_> {
        let out = self.out_edges.get(node.index()).ok_or(GraphError::UnknownNode(node))?;
        Ok(out.iter().map(|&e| (e, &self.edges[e.index()])))
    }

    /// Outgoing edges of a node already known to be valid.  Search hot path.
    #[inline]
    pub(crate) fn out(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.out_edges[node.index()].iter().map(|&e| &self.edges[e.index()])
    }

    /// The directed edge `a → b`.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> GraphResult<EdgeId> {
        self.node(a)?;
        self.node(b)?;
        self.pair_index
            .get(&(a, b))
            .copied()
            .ok_or(GraphError::EdgeNotFound { from: a, to: b })
    }

    /// The opposite direction of `edge`, if the connection is two-way.
    pub fn reverse_of(&self, edge: EdgeId) -> Option<EdgeId> {
        let e = self.edges.get(edge.index())?;
        self.pair_index.get(&(e.to, e.from)).copied()
    }

    /// One representative directed edge per connection: the lower-to-higher
    /// direction of two-way connections, plus every one-way edge.
    pub fn connections(&self) -> Vec<EdgeId> {
        self.edges()
            .filter(|(_, e)| e.from < e.to || !self.pair_index.contains_key(&(e.to, e.from)))
            .map(|(id, _)| id)
            .collect()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Change the obstruction factor of one directed edge and recompute its
    /// weight.  Factors below 1 would break A* admissibility and are rejected.
    pub fn set_obstruction(&mut self, edge: EdgeId, factor: f64) -> GraphResult<()> {
        check_obstruction(factor)?;
        let e = self.edges.get_mut(edge.index()).ok_or(GraphError::UnknownEdge(edge))?;
        e.obstruction = factor;
        e.weight = e.length * factor;
        Ok(())
    }

    /// Set heat to 0 on every node.
    pub fn reset_heat(&mut self) {
        for node in &mut self.nodes {
            node.heat = 0.0;
        }
    }

    /// Clear every idle-zone flag.
    pub fn clear_idle_zones(&mut self) {
        for node in &mut self.nodes {
            node.is_idle_zone = false;
        }
    }

    // ── Role queries ──────────────────────────────────────────────────────

    /// Handles of all nodes with `role`, in insertion order.
    pub fn nodes_with_role(&self, role: NodeRole) -> Vec<NodeId> {
        self.nodes()
            .filter(|(_, n)| n.role == role)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn restaurants(&self) -> Vec<NodeId> {
        self.nodes_with_role(NodeRole::Restaurant)
    }

    pub fn customers(&self) -> Vec<NodeId> {
        self.nodes_with_role(NodeRole::Customer)
    }

    /// Junctions: the nodes eligible for heat and idle-zone duty.
    pub fn regular_nodes(&self) -> Vec<NodeId> {
        self.nodes_with_role(NodeRole::Junction)
    }

    /// Nodes currently flagged as idle zones.
    pub fn idle_zones(&self) -> Vec<NodeId> {
        self.nodes()
            .filter(|(_, n)| n.is_idle_zone)
            .map(|(id, _)| id)
            .collect()
    }

    /// Mean weight over all directed edges (0 for an edgeless graph).
    pub fn mean_edge_weight(&self) -> f64 {
        if self.edges.is_empty() {
            return 0.0;
        }
        self.edges.iter().map(|e| e.weight).sum::<f64>() / self.edges.len() as f64
    }
}
