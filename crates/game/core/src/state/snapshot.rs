use bitflags::bitflags;

use super::common::{AreaId, Position, UnitId};
use super::units::{
    Belt, GroundItem, Inventory, KeyBindings, Monster, Object, PlayerUnit, SkillId,
};

bitflags! {
    /// In-game panels that capture input while open.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Menus: u16 {
        const INVENTORY  = 1 << 0;
        const CHARACTER  = 1 << 1;
        const SKILL_TREE = 1 << 2;
        const STASH      = 1 << 3;
        const VENDOR     = 1 << 4;
        const WAYPOINT   = 1 << 5;
        const NPC_DIALOG = 1 << 6;
        const QUEST_LOG  = 1 << 7;
    }
}

/// Area the player currently stands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaInfo {
    pub id: AreaId,
    pub is_town: bool,
    /// Collision data for the area has been read and pathing queries are valid.
    pub collision_loaded: bool,
}

/// Complete point-in-time observation of the game.
///
/// A snapshot is never mutated after it has been produced by a
/// [`SnapshotProvider`](crate::env::SnapshotProvider); the runtime replaces it
/// wholesale on every refresh so concurrent readers never see a torn state.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub player: PlayerUnit,
    pub monsters: Vec<Monster>,
    pub objects: Vec<Object>,
    pub items: Vec<GroundItem>,
    pub inventory: Inventory,
    pub belt: Belt,
    pub menus: Menus,
    pub area: AreaInfo,
    pub key_bindings: KeyBindings,
    /// Round-trip latency to the game server in milliseconds.
    pub ping_ms: u32,
}

impl Snapshot {
    pub fn monster(&self, id: UnitId) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.id == id)
    }

    pub fn object(&self, id: UnitId) -> Option<&Object> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn ground_item(&self, id: UnitId) -> Option<&GroundItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Hostile, living monsters.
    pub fn enemies(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.iter().filter(|m| m.is_valid_enemy())
    }

    /// Closest living enemy within `radius` tiles of the player, if any.
    pub fn closest_enemy_within(&self, radius: u32) -> Option<&Monster> {
        self.enemies()
            .map(|m| (self.distance_from_me(m.position), m))
            .filter(|(distance, _)| *distance <= radius)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, m)| m)
    }

    pub fn distance_from_me(&self, position: Position) -> u32 {
        self.player.position.distance(position)
    }

    pub fn is_in_town(&self) -> bool {
        self.area.is_town
    }

    /// Teleport is usable outside town when the skill has a key bound.
    pub fn can_teleport(&self) -> bool {
        !self.is_in_town() && self.key_bindings.skill(SkillId::TELEPORT).is_some()
    }

    pub fn life_percent(&self) -> u32 {
        self.player.life.percent()
    }

    pub fn mana_percent(&self) -> u32 {
        self.player.mana.percent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{MonsterRarity, ResourceMeter};

    fn monster(id: u32, x: i32, y: i32, life: u32, hostile: bool) -> Monster {
        Monster {
            id: UnitId(id),
            name: format!("m{id}"),
            position: Position::new(x, y),
            life: ResourceMeter::new(life, 100),
            rarity: MonsterRarity::Normal,
            hostile,
        }
    }

    #[test]
    fn test_closest_enemy_skips_dead_and_friendly() {
        let snapshot = Snapshot {
            monsters: vec![
                monster(1, 1, 1, 0, true),
                monster(2, 2, 0, 50, false),
                monster(3, 4, 0, 50, true),
                monster(4, 9, 0, 50, true),
            ],
            ..Snapshot::default()
        };

        let closest = snapshot.closest_enemy_within(5).expect("enemy in range");
        assert_eq!(closest.id, UnitId(3));
        assert!(snapshot.closest_enemy_within(3).is_none());
    }

    #[test]
    fn test_teleport_requires_binding_outside_town() {
        let mut snapshot = Snapshot::default();
        assert!(!snapshot.can_teleport());

        snapshot
            .key_bindings
            .skills
            .insert(SkillId::TELEPORT, crate::env::Key::F(3));
        assert!(snapshot.can_teleport());

        snapshot.area.is_town = true;
        assert!(!snapshot.can_teleport());
    }
}
