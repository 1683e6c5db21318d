//! `fd-courier` — courier state, movement, and fleet headcount.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`state`]     | `CourierState`, `CourierPosition`, `Job`                        |
//! | [`courier`]   | `Courier` — one courier's position, job, and remaining route    |
//! | [`fleet`]     | `Fleet` — id-ordered courier store, assignment, movement step   |
//! | [`headcount`] | `HOURLY_MULTIPLIER`, `target_headcount`, `Fleet::rescale`       |
//! | [`event`]     | `CourierEvent` — arrivals reported back to dispatch             |
//! | [`error`]     | `FleetError`, `FleetResult<T>`                                  |
//!
//! # Movement model (distance budget per tick)
//!
//! Each tick a courier may cover `distance_per_tick` units of edge **weight**,
//! so a congested street (obstruction > 1) takes proportionally longer.
//!
//! 1. A courier at a node with a non-empty route steps onto the edge to the
//!    next route node.
//! 2. Progress along an edge is a fraction of the edge weight; budget left
//!    over after reaching a node carries on to the next edge.
//! 3. Reaching the **last** node of a route ends that courier's movement for
//!    the tick and may emit a [`CourierEvent`].
//!
//! The fleet never touches orders directly.  `fd-sim` applies the returned
//! events to the order book, so order state and courier state stay in
//! separate crates.

pub mod courier;
pub mod error;
pub mod event;
pub mod fleet;
pub mod headcount;
pub mod state;


pub use courier::Courier;
pub use error::{FleetError, FleetResult};
pub use event::CourierEvent;
pub use fleet::Fleet;
pub use headcount::{HOURLY_MULTIPLIER, HeadcountChange, target_headcount};
pub use state::{CourierPosition, CourierState, Job};
