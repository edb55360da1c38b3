//! RON scenario files describing a simulated world.
//!
//! ```ron
//! (
//!     dimensions: (40, 20),
//!     player: (2, 10),
//!     walls: [((12, 0), (12, 16))],
//!     monsters: [(id: 100, at: (20, 10), life: 150)],
//!     objects: [(id: 200, kind: Door, at: (12, 18))],
//!     items: [(id: 300, name: "ring", at: (6, 10))],
//!     bindings: [(54, F(3))],
//! )
//! ```
use std::path::Path;

use anyhow::Context as _;
use game_core::{
    BeltSlot, Key, MonsterRarity, ObjectKind, Position, SkillId, UnitId,
};
use serde::Deserialize;

use crate::units;
use crate::world::SimWorld;

#[derive(Clone, Debug, Deserialize)]
pub struct MonsterSpec {
    pub id: u32,
    pub at: (i32, i32),
    pub life: u32,
    #[serde(default)]
    pub rarity: MonsterRarity,
    /// Attacks land but deal no damage.
    #[serde(default)]
    pub invulnerable: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ObjectSpec {
    pub id: u32,
    pub kind: ObjectKind,
    pub at: (i32, i32),
}

#[derive(Clone, Debug, Deserialize)]
pub struct ItemSpec {
    pub id: u32,
    pub name: String,
    pub at: (i32, i32),
}

/// A complete world description.
#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    pub dimensions: (i32, i32),
    pub player: (i32, i32),
    #[serde(default)]
    pub walls: Vec<((i32, i32), (i32, i32))>,
    #[serde(default)]
    pub monsters: Vec<MonsterSpec>,
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
    /// Skill id and the key it is bound to.
    #[serde(default)]
    pub bindings: Vec<(u16, Key)>,
    /// Replaces the default belt when non-empty.
    #[serde(default)]
    pub belt: Vec<BeltSlot>,
    #[serde(default)]
    pub town: bool,
}

impl Scenario {
    pub fn into_world(self) -> SimWorld {
        let at = |(x, y): (i32, i32)| Position::new(x, y);

        let mut builder = SimWorld::builder(self.dimensions.0, self.dimensions.1)
            .player_at(at(self.player));
        for (from, to) in self.walls {
            builder = builder.wall_line(at(from), at(to));
        }
        let mut invulnerable = Vec::new();
        for spec in self.monsters {
            let mut monster = units::monster(spec.id, at(spec.at), spec.life);
            monster.rarity = spec.rarity;
            if spec.invulnerable {
                invulnerable.push(monster.id);
            }
            builder = builder.monster(monster);
        }
        for spec in self.objects {
            builder = builder.object(units::object(spec.id, spec.kind, at(spec.at)));
        }
        for spec in self.items {
            builder = builder.item(units::item(spec.id, &spec.name, at(spec.at)));
        }
        for (skill, key) in self.bindings {
            builder = builder.bind_skill(SkillId(skill), key);
        }
        let (belt, town) = (self.belt, self.town);
        let world = builder
            .with(|s| {
                if !belt.is_empty() {
                    s.belt.slots = belt;
                }
                s.area.is_town = town;
            })
            .build();

        for id in invulnerable {
            world.make_invulnerable(id);
        }
        world
    }
}

/// Loader for scenario RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> anyhow::Result<Scenario> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Scenario> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELLAR: &str = r#"(
        dimensions: (30, 12),
        player: (1, 5),
        walls: [((10, 0), (10, 9))],
        monsters: [(id: 100, at: (20, 5), life: 150, rarity: Champion, invulnerable: true)],
        objects: [(id: 200, kind: Chest, at: (25, 5))],
        items: [(id: 300, name: "ring", at: (3, 5))],
        bindings: [(54, F(3))],
    )"#;

    #[test]
    fn test_parses_and_builds_a_world() {
        let world = ScenarioLoader::parse(CELLAR).expect("valid scenario").into_world();
        let snapshot = world.snapshot();

        assert_eq!(snapshot.player.position, Position::new(1, 5));
        assert_eq!(snapshot.monsters[0].rarity, MonsterRarity::Champion);
        assert!(snapshot.object(UnitId(200)).is_some_and(|o| o.is_container()));
        assert_eq!(snapshot.key_bindings.skill(SkillId::TELEPORT), Some(Key::F(3)));
        assert!(!world.grid().is_open(Position::new(10, 4)));
        assert!(world.grid().is_open(Position::new(10, 11)));
    }

    #[test]
    fn test_rejects_malformed_files() {
        assert!(ScenarioLoader::parse("(dimensions: 3)").is_err());
    }
}
