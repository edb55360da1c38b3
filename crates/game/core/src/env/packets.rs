use super::error::EnvError;
use crate::state::{Position, SkillId, UnitId};

/// Optional lower-level transport that talks to the game server directly.
///
/// When enabled by configuration the runtime tries these primitives first and
/// falls back to simulated input whenever one of them errors.
pub trait PacketSender: Send + Sync {
    fn interact(&self, object: UnitId) -> Result<(), EnvError>;

    fn cast_skill_at_unit(&self, skill: SkillId, target: UnitId) -> Result<(), EnvError>;

    fn cast_skill_at(&self, skill: SkillId, position: Position) -> Result<(), EnvError>;

    fn pick_up(&self, item: UnitId) -> Result<(), EnvError>;
}
