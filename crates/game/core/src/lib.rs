//! Observation model and collaborator interfaces shared across the workspace.
//!
//! `game-core` defines what the bot can see ([`state`]) and the traits through
//! which it reads and drives the game ([`env`]). It holds no behaviour of its
//! own; the decision making lives in `bot-runtime`.
pub mod env;
pub mod error;
pub mod state;

pub use env::{
    EnvError, HeldKey, InputDevice, Key, MouseButton, PacketSender, Path, Pathfinder, ScreenPoint,
    SnapshotProvider,
};
pub use error::{Classified, ErrorSeverity};
pub use state::{
    AreaId, AreaInfo, Belt, BeltSlot, GroundItem, Inventory, InventoryItem, KeyBindings, Menus,
    Monster, MonsterRarity, Object, ObjectKind, PlayerStates, PlayerUnit, PotionKind, Position,
    ResourceMeter, SkillId, Snapshot, UnitId, WeaponSet,
};
