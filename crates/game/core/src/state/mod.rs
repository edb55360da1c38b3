//! Observed game state.
//!
//! Everything in this module is plain data produced by a
//! [`SnapshotProvider`](crate::env::SnapshotProvider). The runtime reads these
//! types but never mutates a snapshot it did not build itself.
mod common;
mod snapshot;
mod units;

pub use common::{AreaId, Position, ResourceMeter, UnitId};
pub use snapshot::{AreaInfo, Menus, Snapshot};
pub use units::{
    Belt, BeltSlot, GroundItem, Inventory, InventoryItem, KeyBindings, Monster, MonsterRarity,
    Object, ObjectKind, PlayerStates, PlayerUnit, PotionKind, SkillId, WeaponSet,
};
