//! Unified error type surfaced by the engine.
//!
//! Low-level controllers return typed conditions, step helpers decide whether
//! to retry, escalate or swallow them, and only the orchestrator ends a
//! session, based on [`BotError::is_critical`].
use std::time::Duration;

use game_core::{Classified, EnvError, ErrorSeverity, Position, UnitId, WeaponSet};
use thiserror::Error;

use crate::movement::MoveError;

pub type Result<T> = std::result::Result<T, BotError>;

#[derive(Debug, Clone, Error)]
pub enum BotError {
    /// The active tier switched to Stop or the session scope was cancelled.
    #[error("session stopped")]
    Stopped,

    #[error("player died")]
    PlayerDied,

    /// Life dropped under the emergency threshold and the game must be left.
    #[error("chicken: life at {life_percent}%")]
    Chicken { life_percent: u32 },

    #[error("emergency exit: {reason}")]
    EmergencyExit { reason: String },

    #[error("player idle for {idle:?}")]
    IdleTimeout { idle: Duration },

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("item {item} too far away ({distance} tiles)")]
    ItemTooFar { item: UnitId, distance: u32 },

    #[error("no line of sight to {target} at {position}")]
    NoLineOfSight { target: UnitId, position: Position },

    #[error("weapon swap to {expected} timed out")]
    WeaponSwapTimeout { expected: WeaponSet },

    #[error("interaction with {object} failed after {attempts} attempts")]
    InteractionFailed { object: UnitId, attempts: u32 },
}

impl BotError {
    pub fn is_critical(&self) -> bool {
        self.severity().is_critical()
    }
}

impl Classified for BotError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Stopped
            | Self::PlayerDied
            | Self::Chicken { .. }
            | Self::EmergencyExit { .. }
            | Self::IdleTimeout { .. } => ErrorSeverity::Critical,
            Self::Env(e) => e.severity(),
            Self::Move(e) => e.severity(),
            Self::ItemTooFar { .. }
            | Self::NoLineOfSight { .. }
            | Self::WeaponSwapTimeout { .. }
            | Self::InteractionFailed { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Stopped => "STOPPED",
            Self::PlayerDied => "PLAYER_DIED",
            Self::Chicken { .. } => "CHICKEN",
            Self::EmergencyExit { .. } => "EMERGENCY_EXIT",
            Self::IdleTimeout { .. } => "IDLE_TIMEOUT",
            Self::Env(e) => e.error_code(),
            Self::Move(e) => e.error_code(),
            Self::ItemTooFar { .. } => "ITEM_TOO_FAR",
            Self::NoLineOfSight { .. } => "NO_LINE_OF_SIGHT",
            Self::WeaponSwapTimeout { .. } => "WEAPON_SWAP_TIMEOUT",
            Self::InteractionFailed { .. } => "INTERACTION_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ending_errors_are_critical() {
        assert!(BotError::PlayerDied.is_critical());
        assert!(BotError::Stopped.is_critical());
        assert!(BotError::Chicken { life_percent: 20 }.is_critical());
        assert!(BotError::from(EnvError::NotInGame).is_critical());
    }

    #[test]
    fn test_pathing_hiccups_are_recoverable() {
        let stuck = BotError::from(MoveError::PlayerStuck {
            position: Position::ORIGIN,
            elapsed: Duration::from_secs(3),
        });
        assert!(!stuck.is_critical());
        assert!(!BotError::from(EnvError::PacketRejected("busy".into())).is_critical());
        assert!(
            !BotError::WeaponSwapTimeout {
                expected: WeaponSet::Swap
            }
            .is_critical()
        );
    }
}
