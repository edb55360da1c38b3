//! Simulated world backing a dry run.
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use game_sim::{ScenarioLoader, SimWorld};

const CELLAR: &str = include_str!("../scenarios/cellar.ron");

/// Build the world from `scenario`, or from the bundled cellar.
pub fn load_world(scenario: Option<&Path>) -> Result<Arc<SimWorld>> {
    let scenario = match scenario {
        Some(path) => {
            tracing::info!("Loading scenario from {}", path.display());
            ScenarioLoader::load(path)?
        }
        None => ScenarioLoader::parse(CELLAR)?,
    };
    Ok(Arc::new(scenario.into_world()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{ObjectKind, Position};

    #[test]
    fn test_bundled_cellar_loads() {
        let world = load_world(None).expect("bundled scenario parses");
        let snapshot = world.snapshot();

        assert_eq!(snapshot.player.position, Position::new(2, 10));
        assert_eq!(snapshot.monsters.len(), 4);
        assert!(snapshot.objects.iter().any(|o| o.kind == ObjectKind::Door));
        assert!(!snapshot.belt.slots.is_empty());
    }

    #[test]
    fn test_missing_scenario_file_is_an_error() {
        assert!(load_world(Some(Path::new("/nonexistent/scenario.ron"))).is_err());
    }
}
