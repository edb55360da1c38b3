use std::fmt;

/// Identifier the game assigns to every unit (player, monster, object, item).
///
/// Identifiers are only unique within a single game instance; they are reused
/// by the game after a unit is removed, so consumers must never persist them
/// across games.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a game area (level).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaId(pub u32);

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "area:{}", self.0)
    }
}

/// World position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in whole tiles (rounded down).
    ///
    /// Every range check in the engine (finishing distance, attack range,
    /// clear-path distance) compares against this value, so boundaries are
    /// inclusive integers.
    pub fn distance(self, other: Position) -> u32 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt() as u32
    }

    /// Chebyshev distance, used for the small "same spot" radius checks.
    pub fn chebyshev(self, other: Position) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Point `extra` tiles past `target` on the ray starting at `self`.
    ///
    /// Returns `target` unchanged when both points coincide.
    pub fn beyond(self, target: Position, extra: i32) -> Position {
        let dx = (target.x - self.x) as f64;
        let dy = (target.y - self.y) as f64;
        let length = (dx * dx + dy * dy).sqrt();
        if length < f64::EPSILON {
            return target;
        }
        let scale = extra as f64 / length;
        Position::new(
            target.x + (dx * scale).round() as i32,
            target.y + (dy * scale).round() as i32,
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Current/maximum pair for life and mana.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub const fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    pub const fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    /// Percentage in `[0, 100]`; a meter without maximum counts as full.
    pub fn percent(&self) -> u32 {
        if self.maximum == 0 {
            return 100;
        }
        (self.current.min(self.maximum) * 100) / self.maximum
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_rounds_down() {
        let a = Position::new(0, 0);
        assert_eq!(a.distance(Position::new(3, 4)), 5);
        assert_eq!(a.distance(Position::new(1, 1)), 1);
        assert_eq!(a.distance(a), 0);
    }

    #[test]
    fn test_beyond_extends_past_target() {
        let me = Position::new(0, 0);
        let target = Position::new(10, 0);
        assert_eq!(me.beyond(target, 3), Position::new(13, 0));
        assert_eq!(me.beyond(me, 3), me);
    }

    #[test]
    fn test_percent_handles_edges() {
        assert_eq!(ResourceMeter::new(50, 200).percent(), 25);
        assert_eq!(ResourceMeter::new(0, 0).percent(), 100);
        assert_eq!(ResourceMeter::new(300, 200).percent(), 100);
    }
}
