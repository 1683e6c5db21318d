//! `fd-sim` — minute-tick scheduler for the food-delivery simulation engine.
//!
//! # Tick loop
//!
//! ```text
//! each tick (one simulated minute):
//!   ① Clock     — advance; at midnight fail every outstanding order and
//!                 strip it from its courier.
//!   ② Hourly    — heatmap + idle zones (08:00–21:00), headcount rescale,
//!                 idle couriers re-homed.
//!   ③ 30 min    — obstruction churn (when obstruction_level > 0).
//!   ④ 5 min     — order generation, one roll per restaurant.
//!   ⑤ 2 min     — assignment pass, oldest pending order first.
//!   ⑥ Movement  — every courier spends its distance budget; pick-ups and
//!                 deliveries are written back to the order book.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Runs the heatmap's per-restaurant Dijkstra on Rayon.      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fd_core::SimConfig;
//! use fd_graph::{Graph, GraphSnapshot, DijkstraRouter};
//! use fd_sim::{NoopObserver, SimBuilder};
//!
//! let config = SimConfig::default();
//! let graph = Graph::from_snapshot(&snapshot, config.order_frequency)?;
//! let mut sim = SimBuilder::new(config, graph, DijkstraRouter).build()?;
//! sim.run(&mut NoopObserver)?;
//! println!("{:?}", sim.stats());
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod stats;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use stats::{SimStats, TickReport};
