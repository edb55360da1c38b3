//! Shorthand constructors for the units a world is populated with.
use game_core::{
    GroundItem, Monster, MonsterRarity, Object, ObjectKind, Position, ResourceMeter, UnitId,
};

pub fn monster(id: u32, position: Position, life: u32) -> Monster {
    Monster {
        id: UnitId(id),
        name: format!("monster{id}"),
        position,
        life: ResourceMeter::full(life),
        rarity: MonsterRarity::Normal,
        hostile: true,
    }
}

pub fn object(id: u32, kind: ObjectKind, position: Position) -> Object {
    Object {
        id: UnitId(id),
        name: format!("{kind}{id}"),
        kind,
        position,
        selectable: true,
    }
}

/// A closed door.
pub fn door(id: u32, position: Position) -> Object {
    object(id, ObjectKind::Door, position)
}

/// An unopened chest.
pub fn chest(id: u32, position: Position) -> Object {
    object(id, ObjectKind::Chest, position)
}

pub fn barrel(id: u32, position: Position) -> Object {
    object(id, ObjectKind::Destructible, position)
}

pub fn item(id: u32, name: &str, position: Position) -> GroundItem {
    GroundItem {
        id: UnitId(id),
        name: name.to_owned(),
        position,
    }
}
