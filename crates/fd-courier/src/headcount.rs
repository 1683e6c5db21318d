//! Hour-of-day headcount scaling.
//!
//! The target number of couriers for hour `h` is
//!
//!   ceil(courier_frequency × HOURLY_MULTIPLIER[h])
//!
//! with nobody on shift overnight and the peak at 18:00.

use tracing::debug;

use fd_core::{CourierId, SimRng};
use fd_graph::Graph;

use crate::{CourierState, Fleet, FleetError, FleetResult};

/// Fraction of `courier_frequency` wanted on shift, by hour of day.
pub const HOURLY_MULTIPLIER: [f64; 24] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, // 00–07
    0.15, 0.2, 0.3, 0.5, 0.5, 0.5, 0.65, 0.65, // 08–15
    0.8, 0.9, 1.0, 0.8, 0.5, 0.2, 0.0, 0.0, // 16–23
];

/// Headcount target for `hour` (taken modulo 24).
pub fn target_headcount(courier_frequency: f64, hour: usize) -> usize {
    let wanted = (courier_frequency * HOURLY_MULTIPLIER[hour % 24]).ceil();
    if wanted.is_finite() && wanted > 0.0 { wanted as usize } else { 0 }
}

/// What one [`Fleet::rescale`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeadcountChange {
    /// Jobless couriers removed outright.
    pub removed: usize,
    /// Busy couriers flagged to leave after their current job.
    pub flagged: usize,
    /// Previously flagged couriers kept on after all.
    pub unflagged: usize,
    pub spawned: usize,
}

impl Fleet {
    /// Bring the active headcount to `target`.
    ///
    /// Too many: remove jobless couriers (lowest id first), then flag busy
    /// ones for termination.  Too few: un-flag couriers on their way out,
    /// then spawn new ones on random junctions (any node if the map has no
    /// junctions) and send them to the nearest idle zone.
    pub fn rescale(&mut self, target: usize, graph: &Graph, rng: &mut SimRng) -> FleetResult<HeadcountChange> {
        let mut change = HeadcountChange::default();
        let active = self.active_count();

        if active > target {
            let mut excess = active - target;

            let jobless: Vec<CourierId> = self
                .iter()
                .filter(|c| c.job.is_none() && !c.termination_requested && c.state != CourierState::Terminating)
                .map(|c| c.id)
                .take(excess)
                .collect();
            for id in jobless {
                self.remove(id);
                change.removed += 1;
            }
            excess -= change.removed;

            let busy: Vec<CourierId> = self
                .iter()
                .filter(|c| c.job.is_some() && !c.termination_requested)
                .map(|c| c.id)
                .take(excess)
                .collect();
            for id in busy {
                self.get_mut(id)?.termination_requested = true;
                change.flagged += 1;
            }
        } else if active < target {
            let mut deficit = target - active;

            let leaving: Vec<CourierId> = self
                .iter()
                .filter(|c| c.termination_requested && c.state != CourierState::Terminating)
                .map(|c| c.id)
                .take(deficit)
                .collect();
            for id in leaving {
                self.get_mut(id)?.termination_requested = false;
                change.unflagged += 1;
            }
            deficit -= change.unflagged;

            if deficit > 0 {
                let mut spawn_nodes = graph.regular_nodes();
                if spawn_nodes.is_empty() {
                    spawn_nodes = graph.nodes().map(|(id, _)| id).collect();
                }
                if spawn_nodes.is_empty() {
                    return Err(FleetError::NoSpawnNodes);
                }
                let zones = graph.idle_zones();
                for _ in 0..deficit {
                    let Some(&node) = rng.choose(&spawn_nodes) else {
                        break;
                    };
                    let id = self.spawn(node);
                    self.send_to_nearest_zone(id, graph, &zones)?;
                    change.spawned += 1;
                }
            }
        }

        debug!(
            target,
            active = self.active_count(),
            removed = change.removed,
            flagged = change.flagged,
            unflagged = change.unflagged,
            spawned = change.spawned,
            "headcount rescaled"
        );
        Ok(change)
    }
}
