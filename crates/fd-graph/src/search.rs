//! Shortest-path search over a [`Graph`].
//!
//! All three searches share one result shape, [`SearchTree`]: a distance and
//! a parent per node plus the order in which nodes were expanded.  Paths are
//! read back out of a tree with [`traceback`].
//!
//! # Algorithms
//!
//! | Function              | Priority            | Stops when            |
//! |-----------------------|---------------------|-----------------------|
//! | [`dijkstra`]          | `g(v)`              | open set is empty     |
//! | [`a_star`]            | `g(v) + h(v, goal)` | goal is dequeued      |
//! | [`greedy_best_first`] | `h(v, goal)`        | goal is dequeued      |
//!
//! `h` is the straight-line distance between node positions.  Since every
//! edge weight is `length * obstruction` with `obstruction >= 1`, `h` never
//! overestimates and A* returns optimal paths.  Greedy best-first does not.
//!
//! # Unreachable targets
//!
//! "No path" is not an error.  [`traceback`] returns the single-element
//! sequence `[source]` for any target the search never reached; callers test
//! for it with [`crate::Path::is_unreachable`].

use fd_core::NodeId;

use crate::graph::Graph;
use crate::queue::PriorityQueue;
use crate::GraphResult;

// ── SearchTree ────────────────────────────────────────────────────────────────

/// Per-node search state left behind by a run.
#[derive(Debug, Clone)]
pub struct SearchTree {
    pub source: NodeId,
    /// Best known cost from `source`; `f64::INFINITY` where unreached.
    pub distance: Vec<f64>,
    /// Predecessor on the best known path; `NodeId::INVALID` where unset.
    pub parent: Vec<NodeId>,
    /// Nodes in the order they were taken off the open set.
    pub expanded: Vec<NodeId>,
}

impl SearchTree {
    fn new(source: NodeId, node_count: usize) -> Self {
        let mut distance = vec![f64::INFINITY; node_count];
        distance[source.index()] = 0.0;
        Self {
            source,
            distance,
            parent: vec![NodeId::INVALID; node_count],
            expanded: Vec::new(),
        }
    }

    /// Cost to reach `node`, or `f64::INFINITY`.
    pub fn distance_to(&self, node: NodeId) -> f64 {
        self.distance.get(node.index()).copied().unwrap_or(f64::INFINITY)
    }

    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.parent
            .get(node.index())
            .copied()
            .filter(|&p| p != NodeId::INVALID)
    }

    /// `true` if the search found any path to `node`.
    pub fn reached(&self, node: NodeId) -> bool {
        node == self.source || self.parent_of(node).is_some()
    }
}

// ── Heuristic ─────────────────────────────────────────────────────────────────

/// Straight-line distance between two nodes.
///
/// Unknown handles estimate 0, which keeps the heuristic admissible.
pub fn heuristic(graph: &Graph, from: NodeId, to: NodeId) -> f64 {
    match (graph.position(from), graph.position(to)) {
        (Ok(a), Ok(b)) => a.distance(b),
        _ => 0.0,
    }
}

// ── Searches ──────────────────────────────────────────────────────────────────

/// Single-source Dijkstra over the whole reachable graph.
///
/// Runs until the open set is empty, so the tree holds the shortest distance
/// to every reachable node.  Expansion order is non-decreasing in distance.
pub fn dijkstra(graph: &Graph, source: NodeId) -> GraphResult<SearchTree> {
    graph.node(source)?;
    let n = graph.node_count();
    let mut tree = SearchTree::new(source, n);
    let mut closed = vec![false; n];
    let mut open = PriorityQueue::with_capacity(n);
    open.enqueue(source, 0.0);

    while !open.is_empty() {
        let (u, dist_u) = open.dequeue()?;
        if closed[u.index()] {
            continue;
        }
        closed[u.index()] = true;
        tree.expanded.push(u);

        for edge in graph.out(u) {
            let v = edge.to;
            if closed[v.index()] {
                continue;
            }
            let alt = dist_u + edge.weight;
            if alt < tree.distance[v.index()] {
                tree.distance[v.index()] = alt;
                tree.parent[v.index()] = u;
                open.enqueue(v, alt);
            }
        }
    }
    Ok(tree)
}

/// A* from `source` towards `target`, stopping once `target` is dequeued.
pub fn a_star(graph: &Graph, source: NodeId, target: NodeId) -> GraphResult<SearchTree> {
    graph.node(source)?;
    graph.node(target)?;
    let n = graph.node_count();
    let mut tree = SearchTree::new(source, n);
    let mut closed = vec![false; n];
    let mut open = PriorityQueue::new();
    open.enqueue(source, heuristic(graph, source, target));

    while !open.is_empty() {
        let (u, _) = open.dequeue()?;
        if closed[u.index()] {
            continue;
        }
        closed[u.index()] = true;
        tree.expanded.push(u);
        if u == target {
            break;
        }

        let g_u = tree.distance[u.index()];
        for edge in graph.out(u) {
            let v = edge.to;
            if closed[v.index()] {
                continue;
            }
            let g_v = g_u + edge.weight;
            if g_v < tree.distance[v.index()] {
                tree.distance[v.index()] = g_v;
                tree.parent[v.index()] = u;
                open.enqueue(v, g_v + heuristic(graph, v, target));
            }
        }
    }
    Ok(tree)
}

/// Greedy best-first search: always expands the node that looks closest to
/// `target`.  A node's parent is fixed the first time it is discovered.
///
/// Fast on open maps, but the resulting path is not guaranteed shortest.
pub fn greedy_best_first(graph: &Graph, source: NodeId, target: NodeId) -> GraphResult<SearchTree> {
    graph.node(source)?;
    graph.node(target)?;
    let n = graph.node_count();
    let mut tree = SearchTree::new(source, n);
    let mut closed = vec![false; n];
    let mut open = PriorityQueue::new();
    open.enqueue(source, heuristic(graph, source, target));

    while !open.is_empty() {
        let (u, _) = open.dequeue()?;
        closed[u.index()] = true;
        tree.expanded.push(u);
        if u == target {
            break;
        }

        let g_u = tree.distance[u.index()];
        for edge in graph.out(u) {
            let v = edge.to;
            if closed[v.index()] || tree.reached(v) {
                continue;
            }
            tree.distance[v.index()] = g_u + edge.weight;
            tree.parent[v.index()] = u;
            open.enqueue(v, heuristic(graph, v, target));
        }
    }
    Ok(tree)
}

// ── Traceback ─────────────────────────────────────────────────────────────────

/// Node sequence from the tree's source to `target`.
///
/// Returns `[source]` when `target == source` **and** when `target` was
/// never reached.  A returned sequence never repeats a node.
pub fn traceback(tree: &SearchTree, target: NodeId) -> Vec<NodeId> {
    if target == tree.source || !tree.reached(target) {
        return vec![tree.source];
    }

    let mut nodes = vec![target];
    let mut cur = target;
    // Parent chains are acyclic; the bound only guards against a corrupted tree.
    for _ in 0..tree.parent.len() {
        match tree.parent_of(cur) {
            Some(p) => {
                nodes.push(p);
                if p == tree.source {
                    nodes.reverse();
                    return nodes;
                }
                cur = p;
            }
            None => break,
        }
    }
    vec![tree.source]
}
