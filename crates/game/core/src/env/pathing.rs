use super::input::ScreenPoint;
use crate::state::{Object, Position, Snapshot};

/// Walkable route from the player's tile to a destination.
///
/// `nodes` excludes the starting tile and ends at the destination.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Path {
    pub nodes: Vec<Position>,
}

impl Path {
    pub fn new(nodes: Vec<Position>) -> Self {
        Self { nodes }
    }

    /// Path length in tiles.
    pub fn distance(&self) -> u32 {
        self.nodes.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn destination(&self) -> Option<Position> {
        self.nodes.last().copied()
    }

    /// Node `steps` tiles along the path, clamped to the destination.
    pub fn waypoint(&self, steps: usize) -> Option<Position> {
        if self.nodes.is_empty() {
            return None;
        }
        let index = steps.clamp(1, self.nodes.len()) - 1;
        Some(self.nodes[index])
    }
}

/// Pure queries over the collision data of the current snapshot.
///
/// Implementations own the grid and graph algorithms; the runtime only ever
/// asks questions through this trait.
pub trait Pathfinder: Send + Sync {
    /// Route from the player's current position to `to`, or `None` when the
    /// destination is unreachable.
    fn path(&self, snapshot: &Snapshot, to: Position) -> Option<Path>;

    fn line_of_sight(&self, snapshot: &Snapshot, from: Position, to: Position) -> bool;

    /// Closed door blocking the straight segment between two points.
    fn door_between(&self, snapshot: &Snapshot, from: Position, to: Position) -> Option<Object>;

    fn is_walkable(&self, snapshot: &Snapshot, position: Position) -> bool;

    /// Map a world tile to the pixel the input device has to click.
    fn to_screen(&self, snapshot: &Snapshot, position: Position) -> ScreenPoint;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waypoint_is_clamped() {
        let path = Path::new(vec![
            Position::new(1, 0),
            Position::new(2, 0),
            Position::new(3, 0),
        ]);

        assert_eq!(path.waypoint(0), Some(Position::new(1, 0)));
        assert_eq!(path.waypoint(2), Some(Position::new(2, 0)));
        assert_eq!(path.waypoint(10), Some(Position::new(3, 0)));
        assert_eq!(Path::default().waypoint(3), None);
    }
}
