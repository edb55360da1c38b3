//! Units observed in the game world: the player, monsters, objects and items.
use std::collections::HashMap;
use std::time::Duration;

use bitflags::bitflags;

use super::common::{AreaId, Position, ResourceMeter, UnitId};
use crate::env::Key;

/// Skill identifier as reported by the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillId(pub u16);

impl SkillId {
    pub const ATTACK: Self = Self(0);
    pub const FROZEN_ARMOR: Self = Self(40);
    pub const TELEKINESIS: Self = Self(43);
    pub const TELEPORT: Self = Self(54);
    pub const ENERGY_SHIELD: Self = Self(58);
    pub const HOLY_SHIELD: Self = Self(117);
    pub const SHOUT: Self = Self(138);
    pub const BATTLE_ORDERS: Self = Self(149);
    pub const BATTLE_COMMAND: Self = Self(155);
}

bitflags! {
    /// Timed states (buffs and debuffs) currently applied to the player.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PlayerStates: u32 {
        const BATTLE_ORDERS  = 1 << 0;
        const BATTLE_COMMAND = 1 << 1;
        const SHOUT          = 1 << 2;
        const ARMOR          = 1 << 3;
        const ENERGY_SHIELD  = 1 << 4;
        const HOLY_SHIELD    = 1 << 5;
        const POISONED       = 1 << 6;
        const FROZEN         = 1 << 7;
    }
}

/// Which of the two weapon sets is equipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum WeaponSet {
    #[default]
    Main,
    Swap,
}

impl WeaponSet {
    pub fn other(self) -> Self {
        match self {
            WeaponSet::Main => WeaponSet::Swap,
            WeaponSet::Swap => WeaponSet::Main,
        }
    }
}

/// The controlled character.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerUnit {
    pub id: UnitId,
    pub name: String,
    pub position: Position,
    pub area: AreaId,
    pub life: ResourceMeter,
    pub mana: ResourceMeter,
    pub is_dead: bool,
    pub left_skill: SkillId,
    pub right_skill: SkillId,
    /// Time the current character needs to finish one cast/attack animation.
    pub cast_duration: Duration,
    pub weapon_set: WeaponSet,
    pub states: PlayerStates,
}

impl PlayerUnit {
    pub fn has_state(&self, states: PlayerStates) -> bool {
        self.states.contains(states)
    }
}

/// Rarity tier of a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MonsterRarity {
    #[default]
    Normal,
    Minion,
    Champion,
    Unique,
    SuperUnique,
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Monster {
    pub id: UnitId,
    pub name: String,
    pub position: Position,
    pub life: ResourceMeter,
    pub rarity: MonsterRarity,
    /// `false` for pets, mercenaries and town NPCs.
    pub hostile: bool,
}

impl Monster {
    pub fn is_alive(&self) -> bool {
        !self.life.is_empty()
    }

    pub fn is_valid_enemy(&self) -> bool {
        self.hostile && self.is_alive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ObjectKind {
    Door,
    Chest,
    Shrine,
    /// Barrels, urns and similar obstacles that break when clicked.
    Destructible,
    Portal,
    Waypoint,
    #[default]
    Other,
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Object {
    pub id: UnitId,
    pub name: String,
    pub kind: ObjectKind,
    pub position: Position,
    /// Whether the object still reacts to interaction. Opened chests and
    /// doors, used shrines and broken barrels stop being selectable.
    pub selectable: bool,
}

impl Object {
    pub fn is_door(&self) -> bool {
        self.kind == ObjectKind::Door
    }

    pub fn is_closed_door(&self) -> bool {
        self.is_door() && self.selectable
    }

    pub fn is_container(&self) -> bool {
        self.kind == ObjectKind::Chest
    }
}

/// An item lying on the ground.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundItem {
    pub id: UnitId,
    pub name: String,
    pub position: Position,
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryItem {
    pub id: UnitId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    pub items: Vec<InventoryItem>,
    pub free_slots: u32,
}

impl Inventory {
    pub fn contains(&self, id: UnitId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn is_full(&self) -> bool {
        self.free_slots == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PotionKind {
    Healing,
    Mana,
    Rejuvenation,
}

/// A belt column with its bottom potion and the key that drinks it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeltSlot {
    pub kind: PotionKind,
    pub key: Key,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Belt {
    pub slots: Vec<BeltSlot>,
}

impl Belt {
    /// First non-empty column holding `kind`.
    pub fn first(&self, kind: PotionKind) -> Option<&BeltSlot> {
        self.slots
            .iter()
            .find(|slot| slot.kind == kind && slot.count > 0)
    }

    pub fn count(&self, kind: PotionKind) -> u32 {
        self.slots
            .iter()
            .filter(|slot| slot.kind == kind)
            .map(|slot| slot.count)
            .sum()
    }
}

/// Keys the game client has bound for the character.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyBindings {
    pub skills: HashMap<SkillId, Key>,
    pub swap_weapons: Key,
    pub force_move: Key,
    pub stand_still: Key,
    pub close_menus: Key,
}

impl KeyBindings {
    pub fn skill(&self, skill: SkillId) -> Option<Key> {
        self.skills.get(&skill).copied()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            skills: HashMap::new(),
            swap_weapons: Key::Char('w'),
            force_move: Key::Char('e'),
            stand_still: Key::Shift,
            close_menus: Key::Escape,
        }
    }
}
