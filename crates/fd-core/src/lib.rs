//! `fd-core` — foundational types for the food-delivery simulation engine.
//!
//! This crate is a dependency of every other `fd-*` crate.  It intentionally
//! has no `fd-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`, `CourierId`, `OrderId`            |
//! | [`geo`]         | `Point`, Euclidean distance                           |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`demand`]      | `IntensityCurve` (lunch/dinner order intensity)       |
//! | [`rng`]         | `SimRng` (seeded, reproducible)                       |
//! | [`error`]       | `FdError`, `FdResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to load `SimConfig` from JSON.                    |

pub mod demand;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use demand::IntensityCurve;
pub use error::{FdError, FdResult};
pub use geo::Point;
pub use ids::{CourierId, EdgeId, NodeId, OrderId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick};
