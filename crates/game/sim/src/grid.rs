use std::collections::{HashMap, HashSet, VecDeque};

use game_core::Position;

/// Static collision data: a bounded rectangle with wall tiles.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    width: i32,
    height: i32,
    walls: HashSet<Position>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            walls: HashSet::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn add_wall(&mut self, position: Position) {
        self.walls.insert(position);
    }

    /// Wall segment between two points (inclusive), horizontal, vertical or
    /// diagonal.
    pub fn add_line(&mut self, from: Position, to: Position) {
        for position in line(from, to) {
            self.add_wall(position);
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        (0..self.width).contains(&position.x) && (0..self.height).contains(&position.y)
    }

    pub fn is_open(&self, position: Position) -> bool {
        self.contains(position) && !self.walls.contains(&position)
    }

    /// Shortest 8-connected route from `from` to `to` over open tiles.
    ///
    /// The returned nodes exclude `from`; an empty route means both points
    /// coincide.
    pub fn route(&self, from: Position, to: Position) -> Option<Vec<Position>> {
        if !self.is_open(to) {
            return None;
        }
        if from == to {
            return Some(Vec::new());
        }

        let mut previous: HashMap<Position, Position> = HashMap::new();
        let mut queue = VecDeque::from([from]);
        previous.insert(from, from);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut nodes = vec![to];
                let mut at = to;
                while let Some(&prev) = previous.get(&at) {
                    if prev == from {
                        break;
                    }
                    nodes.push(prev);
                    at = prev;
                }
                nodes.reverse();
                return Some(nodes);
            }
            for next in neighbours(current) {
                if self.is_open(next) && !previous.contains_key(&next) {
                    previous.insert(next, current);
                    queue.push_back(next);
                }
            }
        }
        None
    }
}

fn neighbours(p: Position) -> impl Iterator<Item = Position> {
    const STEPS: [(i32, i32); 8] = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    STEPS.into_iter().map(move |(dx, dy)| p.offset(dx, dy))
}

/// Bresenham line between two tiles, both ends included.
pub(crate) fn line(from: Position, to: Position) -> Vec<Position> {
    let (mut x, mut y) = (from.x, from.y);
    let dx = (to.x - x).abs();
    let dy = -(to.y - y).abs();
    let sx = if x < to.x { 1 } else { -1 };
    let sy = if y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut points = Vec::new();

    loop {
        points.push(Position::new(x, y));
        if x == to.x && y == to.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    points
}
