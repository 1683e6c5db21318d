//! `fd-dispatch` — orders, order generation, courier matching, and idle-zone
//! selection.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`order`]    | `Order`, `OrderStatus`, `OrderBook` (history + pending queue)  |
//! | [`generate`] | `generate_orders` — per-restaurant demand rolls                |
//! | [`assign`]   | `assign_pending` — nearest available courier per order         |
//! | [`heatmap`]  | `Heatmap` — demand heat and greedy idle-zone selection         |
//! | [`error`]    | `DispatchError`, `DispatchResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Heatmap Dijkstra runs fan out over Rayon.  Heat is still    |
//! |            | accumulated in restaurant order, so results are identical.  |

pub mod assign;
pub mod error;
pub mod generate;
pub mod heatmap;
pub mod order;

#[cfg(test)]
mod tests;

pub use assign::{Assignment, assign_pending};
pub use error::{DispatchError, DispatchResult};
pub use generate::generate_orders;
pub use heatmap::{DECAY_FACTOR, HEAT_RADIUS_FACTOR, HeatLevel, Heatmap};
pub use order::{MAX_DELIVERY_MINUTES, Order, OrderBook, OrderStatus};
