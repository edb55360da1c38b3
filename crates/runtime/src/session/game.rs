use std::collections::{HashMap, HashSet};

use game_core::{AreaId, Position, PotionKind, UnitId};
use tokio::time::{Duration, Instant};

/// Per-game mutable record, reset whenever a new game starts.
#[derive(Debug)]
pub struct CurrentGame {
    pub started_at: Instant,
    /// Items that failed every pickup attempt; never retried this game.
    blacklisted_items: HashSet<UnitId>,
    picked_up: HashMap<UnitId, Instant>,
    /// Area the current run expects to be in, checked by the high-priority loop.
    pub area_correction: Option<AreaId>,
    pub pickup_items: bool,
    pub last_buff_at: Option<Instant>,
    pub last_town_return_at: Option<Instant>,
    pending_potions: Vec<PotionKind>,
    last_potion_at: HashMap<PotionKind, Instant>,
    idle: IdleWatch,
}

#[derive(Debug)]
struct IdleWatch {
    anchor: Option<Position>,
    since: Instant,
}

impl CurrentGame {
    pub fn new(pickup_items: bool) -> Self {
        let now = Instant::now();
        Self {
            started_at: now,
            blacklisted_items: HashSet::new(),
            picked_up: HashMap::new(),
            area_correction: None,
            pickup_items,
            last_buff_at: None,
            last_town_return_at: None,
            pending_potions: Vec::new(),
            last_potion_at: HashMap::new(),
            idle: IdleWatch {
                anchor: None,
                since: now,
            },
        }
    }

    /// Returns `false` if the item was already blacklisted.
    pub fn blacklist(&mut self, item: UnitId) -> bool {
        self.blacklisted_items.insert(item)
    }

    pub fn is_blacklisted(&self, item: UnitId) -> bool {
        self.blacklisted_items.contains(&item)
    }

    pub fn blacklisted_count(&self) -> usize {
        self.blacklisted_items.len()
    }

    pub fn record_pickup(&mut self, item: UnitId) {
        self.picked_up.insert(item, Instant::now());
    }

    pub fn picked_up(&self, item: UnitId) -> Option<Instant> {
        self.picked_up.get(&item).copied()
    }

    pub fn picked_up_count(&self) -> usize {
        self.picked_up.len()
    }

    /// Queue a potion for the high-priority loop. Duplicates collapse.
    pub fn request_potion(&mut self, kind: PotionKind) {
        if !self.pending_potions.contains(&kind) {
            self.pending_potions.push(kind);
        }
    }

    pub fn take_potion_requests(&mut self) -> Vec<PotionKind> {
        std::mem::take(&mut self.pending_potions)
    }

    pub fn has_pending_potions(&self) -> bool {
        !self.pending_potions.is_empty()
    }

    pub fn record_potion(&mut self, kind: PotionKind, at: Instant) {
        self.last_potion_at.insert(kind, at);
    }

    pub fn potion_ready(&self, kind: PotionKind, cooldown: Duration, now: Instant) -> bool {
        self.last_potion_at
            .get(&kind)
            .is_none_or(|last| now.saturating_duration_since(*last) >= cooldown)
    }

    /// Feed the idle watchdog and return how long the player has stayed
    /// within `min_distance` tiles of the last significant position.
    pub fn observe_position(&mut self, position: Position, min_distance: u32, now: Instant) -> Duration {
        match self.idle.anchor {
            Some(anchor) if anchor.distance(position) < min_distance => {
                now.saturating_duration_since(self.idle.since)
            }
            _ => {
                self.idle.anchor = Some(position);
                self.idle.since = now;
                Duration::ZERO
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blacklist_is_idempotent() {
        let mut game = CurrentGame::new(true);
        assert!(game.blacklist(UnitId(7)));
        assert!(!game.blacklist(UnitId(7)));
        assert!(game.is_blacklisted(UnitId(7)));
        assert_eq!(game.blacklisted_count(), 1);
    }

    #[test]
    fn test_potion_requests_collapse_and_drain() {
        let mut game = CurrentGame::new(true);
        game.request_potion(PotionKind::Healing);
        game.request_potion(PotionKind::Healing);
        game.request_potion(PotionKind::Mana);

        assert_eq!(
            game.take_potion_requests(),
            vec![PotionKind::Healing, PotionKind::Mana]
        );
        assert!(!game.has_pending_potions());
    }

    #[test]
    fn test_potion_cooldown() {
        let mut game = CurrentGame::new(true);
        let now = Instant::now();
        let cooldown = Duration::from_secs(4);
        assert!(game.potion_ready(PotionKind::Healing, cooldown, now));

        game.record_potion(PotionKind::Healing, now);
        assert!(!game.potion_ready(PotionKind::Healing, cooldown, now + Duration::from_secs(1)));
        assert!(game.potion_ready(PotionKind::Healing, cooldown, now + cooldown));
        assert!(game.potion_ready(PotionKind::Mana, cooldown, now));
    }

    #[test]
    fn test_idle_watch_resets_on_significant_movement() {
        let mut game = CurrentGame::new(true);
        let t0 = Instant::now();

        assert_eq!(game.observe_position(Position::new(0, 0), 5, t0), Duration::ZERO);
        let idle = game.observe_position(Position::new(2, 0), 5, t0 + Duration::from_secs(10));
        assert_eq!(idle, Duration::from_secs(10));

        let moved = game.observe_position(Position::new(10, 0), 5, t0 + Duration::from_secs(11));
        assert_eq!(moved, Duration::ZERO);
    }
}
