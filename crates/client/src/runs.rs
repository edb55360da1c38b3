//! Runs bundled with the client for the dry-run backend.
use std::sync::Arc;

use async_trait::async_trait;
use bot_runtime::steps::{clear_area, move_to_resilient, open_container, pick_up_nearby};
use bot_runtime::{Context, MonsterFilter, MoveOptions, Result, Run};
use tracing::info;

/// Kill everything within `radius`, then loot what dropped.
pub struct ClearAndLoot {
    pub radius: u32,
}

#[async_trait]
impl Run for ClearAndLoot {
    fn name(&self) -> &str {
        "clear_and_loot"
    }

    async fn run(&self, ctx: &Context) -> Result<()> {
        let report = clear_area(ctx, self.radius, &MonsterFilter::any()).await?;
        let picked = pick_up_nearby(ctx, self.radius).await?;
        info!(killed = report.killed, skipped = report.skipped, picked, "area cleared");
        Ok(())
    }
}

/// Walk to every closed container, nearest first, clearing the way and
/// opening it.
pub struct OpenContainers;

#[async_trait]
impl Run for OpenContainers {
    fn name(&self) -> &str {
        "open_containers"
    }

    async fn run(&self, ctx: &Context) -> Result<()> {
        let data = ctx.refresh().await?;
        let mut containers: Vec<_> = data
            .objects
            .iter()
            .filter(|o| o.is_container() && o.selectable)
            .map(|o| (data.distance_from_me(o.position), o.id, o.position))
            .collect();
        containers.sort_unstable_by_key(|(distance, ..)| *distance);

        let opts = MoveOptions::default().finish_distance(2);
        for (_, id, position) in containers {
            move_to_resilient(ctx, position, &opts).await?;
            open_container(ctx, id).await?;
            pick_up_nearby(ctx, 4).await?;
        }
        Ok(())
    }
}

/// Runs executed every game, in order.
pub fn default_runs() -> Vec<Arc<dyn Run>> {
    vec![
        Arc::new(ClearAndLoot { radius: 12 }),
        Arc::new(OpenContainers),
        Arc::new(ClearAndLoot { radius: 30 }),
    ]
}
