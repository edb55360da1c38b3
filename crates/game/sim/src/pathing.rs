use game_core::{Object, Path, Pathfinder, Position, ScreenPoint, Snapshot};

use crate::grid::line;
use crate::world::SimWorld;

/// Plans over the static grid only. Closed doors and unbroken destructibles
/// are left in the route, like the real game's collision map, so the player
/// runs into them and the runtime has to clear them.
impl Pathfinder for SimWorld {
    fn path(&self, snapshot: &Snapshot, to: Position) -> Option<Path> {
        let state = self.state();
        state.grid.route(snapshot.player.position, to).map(Path::new)
    }

    fn line_of_sight(&self, snapshot: &Snapshot, from: Position, to: Position) -> bool {
        let state = self.state();
        line(from, to).into_iter().all(|p| {
            state.grid.is_open(p)
                && !snapshot
                    .objects
                    .iter()
                    .any(|o| o.position == p && o.is_closed_door())
        })
    }

    fn door_between(&self, snapshot: &Snapshot, from: Position, to: Position) -> Option<Object> {
        line(from, to).into_iter().find_map(|p| {
            snapshot
                .objects
                .iter()
                .find(|o| o.position == p && o.is_closed_door())
                .cloned()
        })
    }

    fn is_walkable(&self, _snapshot: &Snapshot, position: Position) -> bool {
        self.state().grid.is_open(position)
    }

    fn to_screen(&self, _snapshot: &Snapshot, position: Position) -> ScreenPoint {
        ScreenPoint::new(position.x, position.y)
    }
}
