//! Demand heatmap and idle-zone selection.
//!
//! Once per business hour the heatmap is rebuilt from scratch:
//!
//! 1. Clear heat and idle-zone flags everywhere.
//! 2. For each restaurant, add `order_rate * intensity(now)` to every
//!    junction within `HEAT_RADIUS_FACTOR * radius` (weighted distance).
//! 3. Pick `zone_count` junctions greedily by heat.  After each pick, heat of
//!    junctions within `radius` of the new zone is multiplied by
//!    `DECAY_FACTOR`, pushing later picks away from it.
//!
//! `radius` is the mean edge weight of the graph, computed on first use and
//! then cached.
//!
//! # Concurrency
//!
//! With the `parallel` feature the per-restaurant Dijkstra runs in step 2 fan
//! out over Rayon (read-only on the graph).  Heat is accumulated afterwards in
//! restaurant order on the calling thread, so the result does not depend on
//! the feature.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use fd_core::{NodeId, SimClock};
use fd_graph::{Graph, GraphResult, Node, NodeRole, SearchTree, dijkstra};

use crate::DispatchResult;

/// Heat reach of a restaurant, in multiples of the graph radius.
pub const HEAT_RADIUS_FACTOR: f64 = 3.0;

/// Heat multiplier applied around each newly selected idle zone.
pub const DECAY_FACTOR: f64 = 0.6;

/// Relative heat class of a node, for colouring maps.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum HeatLevel {
    Zone,
    /// Above a third of the hottest node.
    Hot,
    Warm,
}

impl HeatLevel {
    pub fn classify(node: &Node, max_heat: f64) -> HeatLevel {
        if node.is_idle_zone {
            HeatLevel::Zone
        } else if max_heat > 0.0 && node.heat > max_heat * 0.33 {
            HeatLevel::Hot
        } else {
            HeatLevel::Warm
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Heatmap {
    zone_count: usize,
    radius:     Option<f64>,
}

impl Heatmap {
    pub fn new(zone_count: usize) -> Self {
        Self { zone_count, radius: None }
    }

    pub fn zone_count(&self) -> usize {
        self.zone_count
    }

    /// Mean edge weight, computed once.
    pub fn radius(&mut self, graph: &Graph) -> f64 {
        *self.radius.get_or_insert_with(|| graph.mean_edge_weight())
    }

    /// Rebuild heat and idle-zone flags for the time on `clock`.  Returns the
    /// selected zones in selection order.
    pub fn regenerate(&mut self, graph: &mut Graph, clock: &SimClock) -> DispatchResult<Vec<NodeId>> {
        graph.reset_heat();
        graph.clear_idle_zones();
        let radius = self.radius(graph);
        let hour = clock.hour_f64();

        // ── Heat ──────────────────────────────────────────────────────────
        let sources: Vec<(NodeId, f64)> = graph
            .nodes()
            .filter(|(_, n)| n.role == NodeRole::Restaurant)
            .map(|(id, n)| (id, n.order_rate * n.curve.intensity(hour)))
            .filter(|&(_, amount)| amount > 0.0)
            .collect();
        let trees = restaurant_trees(graph, &sources)?;

        let junctions = graph.regular_nodes();
        let reach = HEAT_RADIUS_FACTOR * radius;
        for (&(restaurant, amount), tree) in sources.iter().zip(&trees) {
            for &node in &junctions {
                if node != restaurant && tree.distance_to(node) <= reach {
                    graph.node_mut(node)?.heat += amount;
                }
            }
        }

        // ── Zones ─────────────────────────────────────────────────────────
        let mut zones: Vec<NodeId> = Vec::with_capacity(self.zone_count);
        for _ in 0..self.zone_count {
            let mut best: Option<(NodeId, f64)> = None;
            for &node in &junctions {
                if zones.contains(&node) {
                    continue;
                }
                let heat = graph.node(node)?.heat;
                // Strictly greater keeps the lowest id among equals.
                if best.is_none_or(|(_, h)| heat > h) {
                    best = Some((node, heat));
                }
            }
            let Some((zone, heat)) = best else {
                break;
            };

            graph.node_mut(zone)?.is_idle_zone = true;
            zones.push(zone);
            debug!(zone = graph.key(zone), heat, "idle zone selected");

            let tree = dijkstra(graph, zone)?;
            for &node in &junctions {
                if node != zone && tree.distance_to(node) <= radius {
                    graph.node_mut(node)?.heat *= DECAY_FACTOR;
                }
            }
        }
        Ok(zones)
    }
}

#[cfg(feature = "parallel")]
fn restaurant_trees(graph: &Graph, sources: &[(NodeId, f64)]) -> GraphResult<Vec<SearchTree>> {
    sources.par_iter().map(|&(r, _)| dijkstra(graph, r)).collect()
}

#[cfg(not(feature = "parallel"))]
fn restaurant_trees(graph: &Graph, sources: &[(NodeId, f64)]) -> GraphResult<Vec<SearchTree>> {
    sources.iter().map(|&(r, _)| dijkstra(graph, r)).collect()
}
