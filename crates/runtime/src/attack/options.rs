use game_core::{SkillId, UnitId};

use crate::config::BotConfig;
use crate::movement::MonsterFilter;

/// What an attack call aims at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttackTarget {
    /// One specific monster.
    Unit(UnitId),
    /// Whichever matching enemy is closest, re-selected every iteration.
    ClosestWithin { radius: u32, filter: MonsterFilter },
}

/// Mouse button the attack skill is cast with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkillSlot {
    Primary,
    Secondary,
}

/// Per-call attack options.
#[derive(Clone, Debug)]
pub struct AttackOptions {
    /// Targets further than this are approached or reported out of range.
    pub max_range: u32,
    /// Walk into range instead of returning [`AttackOutcome::OutOfRange`].
    pub follow_enemy: bool,
    /// Attack even without line of sight.
    pub force_attack: bool,
    pub stand_still: bool,
    /// Skill to cast; `None` uses the slot's configured skill.
    pub skill: Option<SkillId>,
}

impl Default for AttackOptions {
    fn default() -> Self {
        Self::from_config(&BotConfig::default())
    }
}

impl AttackOptions {
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            max_range: config.attack.default_max_range,
            follow_enemy: true,
            force_attack: false,
            stand_still: config.character.stand_still,
            skill: None,
        }
    }

    pub fn range(mut self, max_range: u32) -> Self {
        self.max_range = max_range;
        self
    }

    pub fn skill(mut self, skill: SkillId) -> Self {
        self.skill = Some(skill);
        self
    }

    pub fn no_follow(mut self) -> Self {
        self.follow_enemy = false;
        self
    }

    pub fn force(mut self) -> Self {
        self.force_attack = true;
        self
    }
}

/// How an attack call ended. None of these is an error: the caller decides
/// what to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Every requested repetition was issued.
    Completed,
    /// The target died or no matching target remains.
    TargetGone,
    /// The target is out of range and following was disabled.
    OutOfRange { target: UnitId },
    /// No damage landed across every allowed reposition, or no position
    /// with line of sight exists.
    Unreachable { target: UnitId, repositions: u32 },
}
