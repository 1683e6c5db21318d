//! A single courier.

use std::collections::VecDeque;

use fd_core::{CourierId, NodeId, Point};
use fd_graph::{Graph, Path};

use crate::{CourierPosition, CourierState, FleetResult, Job};

#[derive(Debug, Clone)]
pub struct Courier {
    pub id:       CourierId,
    pub position: CourierPosition,
    pub state:    CourierState,
    pub job:      Option<Job>,

    /// Set when a job arrives while the courier is mid-edge on the way to an
    /// idle zone.  The route switches to the restaurant at the next node.
    pub pending_redirect: bool,

    /// Set by headcount reduction on a busy courier.  The courier leaves the
    /// fleet once its current job is finished.
    pub termination_requested: bool,

    /// Nodes still to reach, in order.  While on an edge the front is the
    /// edge's `to` node.
    pub route: VecDeque<NodeId>,

    /// Total edge weight covered since spawning.
    pub travelled: f64,
}

impl Courier {
    pub fn new(id: CourierId, node: NodeId) -> Self {
        Self {
            id,
            position:              CourierPosition::AtNode(node),
            state:                 CourierState::Idle,
            job:                   None,
            pending_redirect:      false,
            termination_requested: false,
            route:                 VecDeque::new(),
            travelled:             0.0,
        }
    }

    /// See [`CourierPosition::anchor`].
    #[inline]
    pub fn anchor(&self) -> NodeId {
        self.position.anchor()
    }

    /// `true` if dispatch may hand this courier a new order.
    pub fn is_available(&self) -> bool {
        self.job.is_none()
            && !self.termination_requested
            && self.state != CourierState::Terminating
    }

    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    /// Node the current route ends at, if any.
    pub fn destination(&self) -> Option<NodeId> {
        self.route.back().copied()
    }

    /// Replace the route with `path`, which must start at the anchor node.
    pub(crate) fn follow(&mut self, path: &Path) {
        let mut nodes: VecDeque<NodeId> = path.nodes.iter().copied().collect();
        if !self.position.is_on_edge() {
            // The first node is where the courier already stands.
            nodes.pop_front();
        }
        self.route = nodes;
    }

    /// Current location, interpolated along the edge when travelling.
    pub fn point(&self, graph: &Graph) -> FleetResult<Point> {
        Ok(match self.position {
            CourierPosition::AtNode(node) => graph.position(node)?,
            CourierPosition::OnEdge { from, to, progress, .. } => {
                graph.position(from)?.lerp(graph.position(to)?, progress)
            }
        })
    }

    /// Nodes left to visit including the current position, for drawing the
    /// courier's route.  Empty when the courier is not going anywhere.
    pub fn remaining_path(&self) -> Vec<NodeId> {
        if self.route.is_empty() {
            return Vec::new();
        }
        let start = match self.position {
            CourierPosition::AtNode(node) => node,
            CourierPosition::OnEdge { from, .. } => from,
        };
        std::iter::once(start).chain(self.route.iter().copied()).collect()
    }
}
