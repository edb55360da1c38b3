//! Collaborator errors.

use crate::error::{Classified, ErrorSeverity};

/// Failures reported by the external collaborators (memory reader, packet
/// transport).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnvError {
    /// The game process could not be read; usually the client crashed or the
    /// character left the game.
    #[error("game data unavailable: {0}")]
    SnapshotUnavailable(String),

    /// No game is currently loaded (character selection or loading screen).
    #[error("not in game")]
    NotInGame,

    /// The packet transport refused or failed to send a request.
    #[error("packet rejected: {0}")]
    PacketRejected(String),

    /// The packet transport is disabled for this session.
    #[error("packet transport disabled")]
    PacketsDisabled,
}

impl Classified for EnvError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SnapshotUnavailable(_) | Self::NotInGame => ErrorSeverity::Critical,
            Self::PacketRejected(_) | Self::PacketsDisabled => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SnapshotUnavailable(_) => "ENV_SNAPSHOT_UNAVAILABLE",
            Self::NotInGame => "ENV_NOT_IN_GAME",
            Self::PacketRejected(_) => "ENV_PACKET_REJECTED",
            Self::PacketsDisabled => "ENV_PACKETS_DISABLED",
        }
    }
}
