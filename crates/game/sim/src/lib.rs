//! Deterministic in-memory game world.
//!
//! [`SimWorld`] implements every collaborator trait of `game-core` on top of a
//! small tile grid: it serves snapshots, reacts to simulated input and packet
//! requests, and answers pathing queries. Tests drive the runtime against it,
//! and the client uses it for dry runs.
//!
//! Input is applied synchronously: a click or key press changes the world
//! immediately and shows up in the next fetched snapshot.
mod grid;
mod input;
mod packets;
mod pathing;
pub mod units;
mod world;

#[cfg(feature = "loaders")]
pub mod scenario;

pub use grid::Grid;
pub use world::{InputAction, PacketRequest, SimWorld, WorldBuilder};

#[cfg(feature = "loaders")]
pub use scenario::{Scenario, ScenarioLoader};
