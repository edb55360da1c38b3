//! Event types for different topics.

use game_core::{AreaId, Snapshot, UnitId};
use serde::{Deserialize, Serialize};

/// Game lifecycle events published by the supervisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    GameStarted {
        /// Sequence number of the game within this session, starting at 1.
        game: u32,
    },

    GameFinished {
        game: u32,
        /// Error that ended the game, if any.
        error: Option<String>,
        duration_ms: u64,
    },

    Paused,
    Resumed,
    Stopped,
}

/// Events related to the runs executed by the low-priority loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
    RunStarted { name: String },

    RunFinished {
        name: String,
        outcome: RunOutcome,
        duration_ms: u64,
    },

    /// The player ended up outside the area a run expects.
    AreaCorrection { expected: AreaId, actual: AreaId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Completed,
    Failed { error: String, code: String },
}

/// Ground item pickup events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemEvent {
    PickedUp { item: UnitId, name: String },

    /// Every pickup attempt failed and the item was blacklisted for the rest
    /// of the game. Carries the observation at the time of the decision for
    /// offline diagnosis.
    Blacklisted {
        item: UnitId,
        name: String,
        attempts: u32,
        snapshot: Box<Snapshot>,
    },
}

/// Combat decisions worth a diagnostic trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CombatEvent {
    Repositioned { target: UnitId, attempt: u32 },

    /// The target took no damage across every allowed reposition and was
    /// abandoned.
    TargetAbandoned {
        target: UnitId,
        name: String,
        snapshot: Box<Snapshot>,
    },
}
