//! Life, mana and idle monitoring for the health loop.
//!
//! The monitor never touches the input device. It raises critical errors for
//! death, chicken and idle timeouts, and queues potion requests that the
//! high-priority loop drinks while it holds priority.
use game_core::{PotionKind, Snapshot};
use tokio::time::Instant;

use crate::config::HealthConfig;
use crate::error::{BotError, Result};
use crate::session::CurrentGame;

#[derive(Debug, Clone)]
pub(crate) struct HealthMonitor {
    cfg: HealthConfig,
}

impl HealthMonitor {
    pub(crate) fn new(cfg: HealthConfig) -> Self {
        Self { cfg }
    }

    pub(crate) fn check(&self, data: &Snapshot, game: &mut CurrentGame, now: Instant) -> Result<()> {
        if data.player.is_dead {
            return Err(BotError::PlayerDied);
        }

        let life = data.life_percent();
        let idle = game.observe_position(data.player.position, self.cfg.idle_min_distance, now);
        if data.is_in_town() {
            return Ok(());
        }

        if life <= self.cfg.chicken_at {
            return Err(BotError::Chicken { life_percent: life });
        }
        if idle >= self.cfg.idle_timeout {
            return Err(BotError::IdleTimeout { idle });
        }

        if life <= self.cfg.rejuvenation_at && data.belt.count(PotionKind::Rejuvenation) > 0 {
            game.request_potion(PotionKind::Rejuvenation);
        } else if life <= self.cfg.healing_potion_at
            && game.potion_ready(PotionKind::Healing, self.cfg.healing_potion_cooldown, now)
        {
            game.request_potion(PotionKind::Healing);
        }

        if data.mana_percent() <= self.cfg.mana_potion_at
            && game.potion_ready(PotionKind::Mana, self.cfg.mana_potion_cooldown, now)
        {
            game.request_potion(PotionKind::Mana);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{BeltSlot, Key, Position, ResourceMeter};
    use std::time::Duration;

    fn snapshot(life: u32, mana: u32) -> Snapshot {
        let mut data = Snapshot::default();
        data.player.life = ResourceMeter::new(life, 100);
        data.player.mana = ResourceMeter::new(mana, 100);
        data
    }

    #[test]
    fn test_death_is_critical() {
        let monitor = HealthMonitor::new(HealthConfig::default());
        let mut game = CurrentGame::new(true);
        let mut data = snapshot(0, 0);
        data.player.is_dead = true;

        let err = monitor.check(&data, &mut game, Instant::now()).unwrap_err();
        assert!(matches!(err, BotError::PlayerDied));
    }

    #[test]
    fn test_chicken_below_threshold_outside_town() {
        let monitor = HealthMonitor::new(HealthConfig::default());
        let mut game = CurrentGame::new(true);

        let err = monitor
            .check(&snapshot(15, 100), &mut game, Instant::now())
            .unwrap_err();
        assert!(matches!(err, BotError::Chicken { life_percent: 15 }));

        let mut in_town = snapshot(15, 100);
        in_town.area.is_town = true;
        assert!(monitor.check(&in_town, &mut game, Instant::now()).is_ok());
    }

    #[test]
    fn test_low_life_and_mana_queue_potions() {
        let monitor = HealthMonitor::new(HealthConfig::default());
        let mut game = CurrentGame::new(true);

        monitor
            .check(&snapshot(50, 10), &mut game, Instant::now())
            .unwrap();

        assert_eq!(
            game.take_potion_requests(),
            vec![PotionKind::Healing, PotionKind::Mana]
        );
    }

    #[test]
    fn test_rejuvenation_preferred_when_available() {
        let monitor = HealthMonitor::new(HealthConfig::default());
        let mut game = CurrentGame::new(true);
        let mut data = snapshot(30, 100);
        data.belt.slots.push(BeltSlot {
            kind: PotionKind::Rejuvenation,
            key: Key::Char('4'),
            count: 2,
        });

        monitor.check(&data, &mut game, Instant::now()).unwrap();
        assert_eq!(game.take_potion_requests(), vec![PotionKind::Rejuvenation]);
    }

    #[test]
    fn test_potion_cooldown_suppresses_requests() {
        let monitor = HealthMonitor::new(HealthConfig::default());
        let mut game = CurrentGame::new(true);
        let now = Instant::now();
        game.record_potion(PotionKind::Healing, now);

        monitor
            .check(&snapshot(50, 100), &mut game, now + Duration::from_secs(1))
            .unwrap();
        assert!(!game.has_pending_potions());
    }

    #[test]
    fn test_idle_watchdog() {
        let cfg = HealthConfig {
            idle_timeout: Duration::from_secs(10),
            ..HealthConfig::default()
        };
        let monitor = HealthMonitor::new(cfg);
        let mut game = CurrentGame::new(true);
        let start = Instant::now();
        let mut data = snapshot(100, 100);
        data.player.position = Position::new(5, 5);

        monitor.check(&data, &mut game, start).unwrap();
        let err = monitor
            .check(&data, &mut game, start + Duration::from_secs(10))
            .unwrap_err();
        assert!(matches!(err, BotError::IdleTimeout { .. }));
    }
}
