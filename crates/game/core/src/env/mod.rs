//! Traits describing the external collaborators.
//!
//! The memory reader, the input driver, the pathfinder and the packet
//! transport live outside this workspace. The runtime reaches them only
//! through the narrow interfaces declared here so any backend (the real game,
//! the simulator in `game-sim`, or a test double) can be plugged in.
mod error;
mod input;
mod packets;
mod pathing;
mod provider;

pub use error::EnvError;
pub use input::{HeldKey, InputDevice, Key, MouseButton, ScreenPoint};
pub use packets::PacketSender;
pub use pathing::{Path, Pathfinder};
pub use provider::SnapshotProvider;
