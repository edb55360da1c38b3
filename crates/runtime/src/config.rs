//! Engine configuration structures and loaders.
//!
//! Every tunable of the controllers lives here with the defaults the engine
//! ships with. Loading configuration files belongs to the host application;
//! [`BotConfig::from_env`] only applies environment overrides on top of the
//! defaults.
use std::env;
use std::time::Duration;

use game_core::{PlayerStates, SkillId};
use serde::Deserialize;

/// Complete configuration for one bot session.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub session: SessionConfig,
    pub movement: MovementConfig,
    pub attack: AttackConfig,
    pub health: HealthConfig,
    pub character: CharacterConfig,
    pub pickup: PickupConfig,
    /// Try the packet transport before simulated input when one is attached.
    pub use_packets: bool,
}

impl BotConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BOT_USE_PACKETS` - Prefer packet interaction/casting (default: false)
    /// - `BOT_USE_TELEPORT` - Teleport instead of walking when bound (default: true)
    /// - `BOT_CLEAR_PATH_DISTANCE` - Abort moves when enemies are this close (default: 0, off)
    /// - `BOT_CHICKEN_AT` - Leave the game under this life percentage (default: 20)
    /// - `BOT_HEALING_POTION_AT` - Drink healing potions under this life percentage (default: 60)
    /// - `BOT_MANA_POTION_AT` - Drink mana potions under this mana percentage (default: 20)
    /// - `BOT_MAX_REPOSITIONS` - Repositions before a stalled target is abandoned (default: 1)
    /// - `BOT_REPOSITION_COOLDOWN_MS` - Minimum time between repositions (default: 2000)
    /// - `BOT_IDLE_TIMEOUT_SECS` - Abort the game after this long without moving (default: 120)
    /// - `BOT_PICKUP_ITEMS` - Enable ground item pickup (default: true)
    /// - `BOT_MAX_FAILED_GAMES` - Consecutive failed games before giving up (default: 5)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(enable) = read_env::<bool>("BOT_USE_PACKETS") {
            config.use_packets = enable;
        }
        if let Some(enable) = read_env::<bool>("BOT_USE_TELEPORT") {
            config.character.use_teleport = enable;
        }
        if let Some(distance) = read_env::<u32>("BOT_CLEAR_PATH_DISTANCE") {
            config.movement.clear_path_distance = distance;
        }
        if let Some(percent) = read_env::<u32>("BOT_CHICKEN_AT") {
            config.health.chicken_at = percent.min(100);
        }
        if let Some(percent) = read_env::<u32>("BOT_HEALING_POTION_AT") {
            config.health.healing_potion_at = percent.min(100);
        }
        if let Some(percent) = read_env::<u32>("BOT_MANA_POTION_AT") {
            config.health.mana_potion_at = percent.min(100);
        }
        if let Some(count) = read_env::<u32>("BOT_MAX_REPOSITIONS") {
            config.attack.max_repositions = count;
        }
        if let Some(ms) = read_env::<u64>("BOT_REPOSITION_COOLDOWN_MS") {
            config.attack.reposition_cooldown = Duration::from_millis(ms);
        }
        if let Some(secs) = read_env::<u64>("BOT_IDLE_TIMEOUT_SECS") {
            config.health.idle_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(enable) = read_env::<bool>("BOT_PICKUP_ITEMS") {
            config.pickup.enabled = enable;
        }
        if let Some(count) = read_env::<u32>("BOT_MAX_FAILED_GAMES") {
            config.session.max_consecutive_failures = count.max(1);
        }

        config
    }
}

/// Loop cadences and session-level limits.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Snapshots younger than this are reused instead of re-read.
    pub refresh_interval: Duration,
    pub background_tick: Duration,
    pub health_tick: Duration,
    pub high_priority_tick: Duration,
    /// Cadence of condition polling in the step helpers.
    pub poll_interval: Duration,
    /// Consecutive failed games before the supervisor gives up.
    pub max_consecutive_failures: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(20),
            background_tick: Duration::from_millis(50),
            health_tick: Duration::from_millis(100),
            high_priority_tick: Duration::from_millis(100),
            poll_interval: Duration::from_millis(50),
            max_consecutive_failures: 5,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Distance (inclusive) at which a move counts as arrived.
    pub finish_distance: u32,
    /// Hard ceiling for one move call, paused time included.
    pub absolute_timeout: Duration,
    pub poll_interval: Duration,
    /// Unchanged position for this long marks a walking character as blocked.
    pub walk_stuck_threshold: Duration,
    /// Base of the teleport stuck threshold before latency and cast scaling.
    pub teleport_stuck_base: Duration,
    /// Unchanged position for this long triggers a smart escape.
    pub escape_after: Duration,
    pub max_escape_attempts: u32,
    /// Radius of the randomized escape destination.
    pub escape_radius: i32,
    pub round_trip_radius: u32,
    /// Oscillation without progress for this long marks the move as blocked.
    pub round_trip_blocked_after: Duration,
    /// Oscillation without progress for this long aborts the move.
    pub round_trip_abort_after: Duration,
    /// Abort moves when a hostile is this close (0 disables the check).
    pub clear_path_distance: u32,
    /// Tiles advanced per walking click.
    pub walk_step: usize,
    /// Tiles covered by one teleport.
    pub teleport_range: usize,
    pub walk_click_interval: Duration,
    /// Bound on waiting for collision data after an area transition.
    pub area_load_timeout: Duration,
    /// Destructibles closer than this to a blocked player get clicked.
    pub destructible_radius: u32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            finish_distance: 2,
            absolute_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(50),
            walk_stuck_threshold: Duration::from_millis(1500),
            teleport_stuck_base: Duration::from_millis(150),
            escape_after: Duration::from_secs(3),
            max_escape_attempts: 3,
            escape_radius: 5,
            round_trip_radius: 8,
            round_trip_blocked_after: Duration::from_secs(2),
            round_trip_abort_after: Duration::from_secs(5),
            clear_path_distance: 0,
            walk_step: 8,
            teleport_range: 25,
            walk_click_interval: Duration::from_millis(250),
            area_load_timeout: Duration::from_secs(3),
            destructible_radius: 3,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    /// Minimum time between two health samples of the same target.
    pub health_sample_interval: Duration,
    /// Length of a no-damage streak that triggers a reposition.
    pub failed_attempt_timeout: Duration,
    pub reposition_cooldown: Duration,
    /// Repositions allowed per target before it is declared unreachable.
    pub max_repositions: u32,
    /// Tiles past the target the reposition aims for.
    pub reposition_distance: i32,
    /// Attack states untouched for this long are collected.
    pub stale_after: Duration,
    /// Table size above which stale states are collected.
    pub gc_threshold: usize,
    pub default_max_range: u32,
    pub poll_interval: Duration,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            health_sample_interval: Duration::from_millis(100),
            failed_attempt_timeout: Duration::from_secs(3),
            reposition_cooldown: Duration::from_secs(2),
            max_repositions: 1,
            reposition_distance: 3,
            stale_after: Duration::from_secs(5 * 60),
            gc_threshold: 100,
            default_max_range: 20,
            poll_interval: Duration::from_millis(25),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub healing_potion_at: u32,
    pub mana_potion_at: u32,
    pub rejuvenation_at: u32,
    pub chicken_at: u32,
    pub healing_potion_cooldown: Duration,
    pub mana_potion_cooldown: Duration,
    /// No significant movement for this long aborts the game.
    pub idle_timeout: Duration,
    /// Movement below this many tiles does not reset the idle watchdog.
    pub idle_min_distance: u32,
    /// Go back to town once fewer healing potions than this remain in the belt.
    pub town_return_healing_potions: u32,
    /// Minimum time between two town returns.
    pub town_return_cooldown: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            healing_potion_at: 60,
            mana_potion_at: 20,
            rejuvenation_at: 40,
            chicken_at: 20,
            healing_potion_cooldown: Duration::from_secs(4),
            mana_potion_cooldown: Duration::from_secs(4),
            idle_timeout: Duration::from_secs(120),
            idle_min_distance: 5,
            town_return_healing_potions: 1,
            town_return_cooldown: Duration::from_secs(60),
        }
    }
}

/// A skill cast on the player to maintain a state.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct BuffSkill {
    pub skill: SkillId,
    /// State the skill grants; the buff is recast as soon as it is missing.
    pub grants: PlayerStates,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub primary_skill: SkillId,
    pub secondary_skill: SkillId,
    pub use_teleport: bool,
    pub buffs: Vec<BuffSkill>,
    pub buff_interval: Duration,
    /// Minimum time between two buff cycles, even with a state missing.
    pub buff_retry: Duration,
    /// Hold the stand-still modifier while attacking.
    pub stand_still: bool,
    /// Attacks issued per target before re-evaluating in `clear_area`.
    pub attacks_per_cycle: u32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            primary_skill: SkillId::ATTACK,
            secondary_skill: SkillId::ATTACK,
            use_teleport: true,
            buffs: Vec::new(),
            buff_interval: Duration::from_secs(30),
            buff_retry: Duration::from_secs(5),
            stand_still: true,
            attacks_per_cycle: 3,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub enabled: bool,
    /// Items further than this are walked to before picking them up.
    pub max_distance: u32,
    /// Range of the telekinesis pickup strategy.
    pub telekinesis_range: u32,
    pub attempts: u32,
    /// Time allowed for an item to leave the ground after one attempt.
    pub confirm_timeout: Duration,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_distance: 5,
            telekinesis_range: 15,
            attempts: 5,
            confirm_timeout: Duration::from_millis(600),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_the_give_up_policy() {
        let config = BotConfig::default();
        assert_eq!(config.attack.max_repositions, 1);
        assert_eq!(config.attack.failed_attempt_timeout, Duration::from_secs(3));
        assert_eq!(config.attack.reposition_cooldown, Duration::from_secs(2));
        assert_eq!(config.movement.absolute_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_buff_retry_is_shorter_than_the_interval() {
        let character = CharacterConfig::default();
        assert_eq!(character.buff_retry, Duration::from_secs(5));
        assert!(character.buff_retry < character.buff_interval);
    }

    #[test]
    fn test_missing_env_values_keep_defaults() {
        assert_eq!(read_env::<u32>("BOT_SURELY_NOT_SET_ANYWHERE"), None);
    }
}
