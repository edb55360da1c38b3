use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use game_core::{
    AreaId, AreaInfo, Belt, BeltSlot, EnvError, GroundItem, Inventory, Key, Monster, MouseButton, Object,
    ObjectKind, PlayerStates, Position, PotionKind, ResourceMeter, ScreenPoint, SkillId, Snapshot,
    SnapshotProvider, UnitId,
};

use crate::grid::Grid;

/// Damage one simulated attack deals.
const DEFAULT_DAMAGE: u32 = 25;
/// Maximum distance a click can pick an item up from.
pub(crate) const PICKUP_REACH: u32 = 5;

/// One input or packet request received by the world, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputAction {
    Key(Key),
    KeyDown(Key),
    KeyUp(Key),
    Click {
        point: ScreenPoint,
        button: MouseButton,
        modifier: Option<Key>,
    },
    Pointer(ScreenPoint),
    ReleaseAll,
    Packet(PacketRequest),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PacketRequest {
    Interact(UnitId),
    CastAtUnit(SkillId, UnitId),
    CastAt(SkillId, Position),
    PickUp(UnitId),
}

pub(crate) struct WorldState {
    pub(crate) snapshot: Snapshot,
    pub(crate) grid: Grid,
    pub(crate) pointer: ScreenPoint,
    pub(crate) frozen: bool,
    pub(crate) unresponsive: bool,
    pub(crate) invulnerable: HashSet<UnitId>,
    pub(crate) sticky: HashSet<UnitId>,
    pub(crate) grants: HashMap<SkillId, PlayerStates>,
    pub(crate) damage: u32,
    pub(crate) held: HashSet<Key>,
    pub(crate) actions: Vec<InputAction>,
    pub(crate) reject_packets: bool,
    pub(crate) fetch_error: Option<EnvError>,
}

/// Shared in-memory game. Every collaborator trait is implemented on it, so
/// one `Arc<SimWorld>` serves as provider, input device, pathfinder and
/// packet transport at once.
pub struct SimWorld {
    state: Mutex<WorldState>,
    fetches: AtomicUsize,
}

impl SimWorld {
    pub fn builder(width: i32, height: i32) -> WorldBuilder {
        WorldBuilder::new(width, height)
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, WorldState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current world state as the next fetch would return it.
    pub fn snapshot(&self) -> Snapshot {
        self.state().snapshot.clone()
    }

    /// Mutate the world directly, e.g. to move monsters or change areas.
    pub fn update<R>(&self, f: impl FnOnce(&mut Snapshot) -> R) -> R {
        f(&mut self.state().snapshot)
    }

    /// Number of times [`SnapshotProvider::fetch`] was called.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn actions(&self) -> Vec<InputAction> {
        self.state().actions.clone()
    }

    pub fn clear_actions(&self) {
        self.state().actions.clear();
    }

    /// Keys currently held down.
    pub fn held_keys(&self) -> Vec<Key> {
        self.state().held.iter().copied().collect()
    }

    /// A frozen player ignores every movement request.
    pub fn set_frozen(&self, frozen: bool) {
        self.state().frozen = frozen;
    }

    /// Keys and clicks are still recorded but have no effect, like a game
    /// client that lost focus.
    pub fn set_unresponsive(&self, unresponsive: bool) {
        self.state().unresponsive = unresponsive;
    }

    /// Attacks on `monster` land but deal no damage.
    pub fn make_invulnerable(&self, monster: UnitId) {
        self.state().invulnerable.insert(monster);
    }

    /// `item` stays on the ground no matter how it is picked up.
    pub fn make_sticky(&self, item: UnitId) {
        self.state().sticky.insert(item);
    }

    pub fn reject_packets(&self, reject: bool) {
        self.state().reject_packets = reject;
    }

    /// Make every fetch fail with `error` until cleared.
    pub fn set_fetch_error(&self, error: Option<EnvError>) {
        self.state().fetch_error = error;
    }

    pub fn grid(&self) -> Grid {
        self.state().grid.clone()
    }
}

impl SnapshotProvider for SimWorld {
    fn fetch(&self) -> Result<Snapshot, EnvError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        match &state.fetch_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.snapshot.clone()),
        }
    }
}

impl WorldState {
    /// Tile occupied by something the player cannot walk through.
    pub(crate) fn is_blocked(&self, position: Position) -> bool {
        !self.grid.is_open(position)
            || self.snapshot.objects.iter().any(|o| {
                o.position == position
                    && o.selectable
                    && matches!(o.kind, ObjectKind::Door | ObjectKind::Destructible)
            })
    }

    /// Walk along the grid route towards `target`, stopping in front of the
    /// first blocked tile.
    pub(crate) fn walk_to(&mut self, target: Position) {
        if self.frozen {
            return;
        }
        let from = self.snapshot.player.position;
        let Some(route) = self.grid.route(from, target) else {
            return;
        };
        let mut reached = from;
        for node in route {
            if self.is_blocked(node) {
                break;
            }
            reached = node;
        }
        self.snapshot.player.position = reached;
    }

    pub(crate) fn teleport_to(&mut self, target: Position) {
        if self.frozen || self.is_blocked(target) {
            return;
        }
        self.snapshot.player.position = target;
    }

    pub(crate) fn hit(&mut self, monster: UnitId) -> bool {
        let damage = if self.invulnerable.contains(&monster) {
            0
        } else {
            self.damage
        };
        let Some(target) = self.snapshot.monsters.iter_mut().find(|m| m.id == monster) else {
            return false;
        };
        target.life.current = target.life.current.saturating_sub(damage);
        tracing::trace!(%monster, life = target.life.current, "monster hit");
        true
    }

    pub(crate) fn monster_at(&self, position: Position) -> Option<UnitId> {
        self.snapshot
            .monsters
            .iter()
            .find(|m| m.position == position && m.is_alive())
            .map(|m| m.id)
    }

    pub(crate) fn interact(&mut self, object: UnitId) -> bool {
        let Some(target) = self.snapshot.objects.iter_mut().find(|o| o.id == object) else {
            return false;
        };
        if !target.selectable {
            return false;
        }
        target.selectable = false;
        tracing::trace!(%object, kind = %target.kind, "object used");
        true
    }

    pub(crate) fn pick_up(&mut self, item: UnitId) -> bool {
        if self.sticky.contains(&item) || self.snapshot.inventory.is_full() {
            return false;
        }
        let Some(index) = self.snapshot.items.iter().position(|i| i.id == item) else {
            return false;
        };
        let picked = self.snapshot.items.remove(index);
        let inventory = &mut self.snapshot.inventory;
        inventory.free_slots -= 1;
        inventory.items.push(game_core::InventoryItem {
            id: picked.id,
            name: picked.name,
        });
        true
    }

    pub(crate) fn record(&mut self, action: InputAction) {
        self.actions.push(action);
    }
}

fn potion(kind: PotionKind, key: char, count: u32) -> BeltSlot {
    BeltSlot {
        kind,
        key: Key::Char(key),
        count,
    }
}

/// Construction-time configuration of a [`SimWorld`].
pub struct WorldBuilder {
    grid: Grid,
    snapshot: Snapshot,
    grants: HashMap<SkillId, PlayerStates>,
    damage: u32,
}

impl WorldBuilder {
    fn new(width: i32, height: i32) -> Self {
        let mut snapshot = Snapshot::default();
        snapshot.player.id = UnitId(1);
        snapshot.player.name = "sim".to_owned();
        snapshot.player.life = ResourceMeter::full(100);
        snapshot.player.mana = ResourceMeter::full(100);
        snapshot.player.cast_duration = Duration::from_millis(200);
        snapshot.area = AreaInfo {
            id: AreaId(1),
            is_town: false,
            collision_loaded: true,
        };
        snapshot.player.area = AreaId(1);
        snapshot.inventory = Inventory {
            items: Vec::new(),
            free_slots: 40,
        };
        snapshot.ping_ms = 20;
        snapshot.belt = Belt {
            slots: vec![
                potion(PotionKind::Healing, '1', 4),
                potion(PotionKind::Healing, '2', 4),
                potion(PotionKind::Mana, '3', 4),
                potion(PotionKind::Rejuvenation, '4', 2),
            ],
        };

        let grants = HashMap::from([
            (SkillId::BATTLE_ORDERS, PlayerStates::BATTLE_ORDERS),
            (SkillId::BATTLE_COMMAND, PlayerStates::BATTLE_COMMAND),
            (SkillId::SHOUT, PlayerStates::SHOUT),
            (SkillId::FROZEN_ARMOR, PlayerStates::ARMOR),
            (SkillId::ENERGY_SHIELD, PlayerStates::ENERGY_SHIELD),
            (SkillId::HOLY_SHIELD, PlayerStates::HOLY_SHIELD),
        ]);

        Self {
            grid: Grid::new(width, height),
            snapshot,
            grants,
            damage: DEFAULT_DAMAGE,
        }
    }

    pub fn player_at(mut self, position: Position) -> Self {
        self.snapshot.player.position = position;
        self
    }

    pub fn wall(mut self, position: Position) -> Self {
        self.grid.add_wall(position);
        self
    }

    pub fn wall_line(mut self, from: Position, to: Position) -> Self {
        self.grid.add_line(from, to);
        self
    }

    pub fn monster(mut self, monster: Monster) -> Self {
        self.snapshot.monsters.push(monster);
        self
    }

    pub fn object(mut self, object: Object) -> Self {
        self.snapshot.objects.push(object);
        self
    }

    pub fn item(mut self, item: GroundItem) -> Self {
        self.snapshot.items.push(item);
        self
    }

    pub fn bind_skill(mut self, skill: SkillId, key: Key) -> Self {
        self.snapshot.key_bindings.skills.insert(skill, key);
        self
    }

    /// Damage dealt per attack.
    pub fn damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    /// Adjust any remaining snapshot field.
    pub fn with(mut self, f: impl FnOnce(&mut Snapshot)) -> Self {
        f(&mut self.snapshot);
        self
    }

    pub fn build(self) -> SimWorld {
        SimWorld {
            state: Mutex::new(WorldState {
                snapshot: self.snapshot,
                grid: self.grid,
                pointer: ScreenPoint::default(),
                frozen: false,
                unresponsive: false,
                invulnerable: HashSet::new(),
                sticky: HashSet::new(),
                grants: self.grants,
                damage: self.damage,
                held: HashSet::new(),
                actions: Vec::new(),
                reject_packets: false,
                fetch_error: None,
            }),
            fetches: AtomicUsize::new(0),
        }
    }
}
