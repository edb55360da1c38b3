use std::collections::HashSet;

use game_core::{Monster, MonsterRarity, UnitId};

/// Per-call movement options.
#[derive(Clone, Debug, Default)]
pub struct MoveOptions {
    /// Overrides the configured finish distance.
    pub finish_distance: Option<u32>,
    /// Never abort because of monsters near the path.
    pub ignore_monsters: bool,
    /// Skip picking up items after arrival.
    pub ignore_items: bool,
    pub monster_filter: MonsterFilter,
}

impl MoveOptions {
    pub fn finish_distance(mut self, distance: u32) -> Self {
        self.finish_distance = Some(distance);
        self
    }

    pub fn ignore_monsters(mut self) -> Self {
        self.ignore_monsters = true;
        self
    }

    pub fn ignore_items(mut self) -> Self {
        self.ignore_items = true;
        self
    }

    pub fn monster_filter(mut self, filter: MonsterFilter) -> Self {
        self.monster_filter = filter;
        self
    }
}

/// Selects which enemies count as blocking or as targets.
///
/// An empty rarity list matches every rarity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonsterFilter {
    pub rarities: Vec<MonsterRarity>,
    pub ignored: HashSet<UnitId>,
}

impl MonsterFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn rarities(rarities: impl IntoIterator<Item = MonsterRarity>) -> Self {
        Self {
            rarities: rarities.into_iter().collect(),
            ignored: HashSet::new(),
        }
    }

    pub fn ignore(mut self, id: UnitId) -> Self {
        self.ignored.insert(id);
        self
    }

    pub fn matches(&self, monster: &Monster) -> bool {
        monster.is_valid_enemy()
            && !self.ignored.contains(&monster.id)
            && (self.rarities.is_empty() || self.rarities.contains(&monster.rarity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Position, ResourceMeter};

    fn monster(id: u32, rarity: MonsterRarity) -> Monster {
        Monster {
            id: UnitId(id),
            name: "fallen".into(),
            position: Position::ORIGIN,
            life: ResourceMeter::full(50),
            rarity,
            hostile: true,
        }
    }

    #[test]
    fn test_empty_filter_matches_every_enemy() {
        let filter = MonsterFilter::any();
        assert!(filter.matches(&monster(1, MonsterRarity::Normal)));
        assert!(filter.matches(&monster(2, MonsterRarity::Unique)));
    }

    #[test]
    fn test_filter_by_rarity_and_ignore_list() {
        let filter = MonsterFilter::rarities([MonsterRarity::Champion, MonsterRarity::Unique])
            .ignore(UnitId(3));

        assert!(!filter.matches(&monster(1, MonsterRarity::Normal)));
        assert!(filter.matches(&monster(2, MonsterRarity::Unique)));
        assert!(!filter.matches(&monster(3, MonsterRarity::Unique)));
    }

    #[test]
    fn test_dead_or_friendly_monsters_never_match() {
        let mut dead = monster(1, MonsterRarity::Normal);
        dead.life = ResourceMeter::new(0, 50);
        let mut friendly = monster(2, MonsterRarity::Normal);
        friendly.hostile = false;

        assert!(!MonsterFilter::any().matches(&dead));
        assert!(!MonsterFilter::any().matches(&friendly));
    }
}
