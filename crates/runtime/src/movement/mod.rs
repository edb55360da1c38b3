//! Movement controller.
//!
//! [`move_to`] walks or teleports the player to a destination, reacting to
//! closed doors, destructible obstacles and blocking monsters, and detects
//! when the character is stuck or oscillating between positions.
mod controller;
mod obstacles;
mod options;
mod tracker;

pub use controller::move_to;
pub use options::{MonsterFilter, MoveOptions};

use std::time::Duration;

use game_core::{AreaId, Classified, ErrorSeverity, Position, UnitId};
use thiserror::Error;

/// How a successful move ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Within the finish distance of the destination.
    Arrived,
    /// The player left the starting area and the new area finished loading.
    AreaChanged { area: AreaId },
}

/// Typed movement failures. All of them are recoverable: the caller decides
/// whether to clear monsters, retry or abandon the sub-goal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("{count} monsters in path, closest {closest}")]
    MonstersInPath { count: usize, closest: UnitId },

    #[error("player stuck at {position} for {elapsed:?}")]
    PlayerStuck { position: Position, elapsed: Duration },

    #[error("player oscillating around {position} for {elapsed:?}")]
    PlayerRoundTrip { position: Position, elapsed: Duration },

    #[error("no path to {destination}")]
    NoPath { destination: Position },
}

impl Classified for MoveError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MonstersInPath { .. } => "MOVE_MONSTERS_IN_PATH",
            Self::PlayerStuck { .. } => "MOVE_PLAYER_STUCK",
            Self::PlayerRoundTrip { .. } => "MOVE_PLAYER_ROUND_TRIP",
            Self::NoPath { .. } => "MOVE_NO_PATH",
        }
    }
}
