//! Game routines for the simulated world.
use std::sync::Arc;

use async_trait::async_trait;
use bot_runtime::{Context, GameRoutines, Result};
use game_core::AreaId;
use game_sim::SimWorld;
use tracing::info;

/// Potions per belt slot after a town visit.
const BELT_REFILL: u32 = 4;

/// Town trips refill the belt in place; games are never left, the same world
/// is replayed.
pub struct SimRoutines {
    world: Arc<SimWorld>,
}

impl SimRoutines {
    pub fn new(world: Arc<SimWorld>) -> Self {
        Self { world }
    }
}

#[async_trait]
impl GameRoutines for SimRoutines {
    async fn start_game(&self, ctx: &Context) -> Result<()> {
        let data = ctx.force_refresh().await?;
        info!(
            area = %data.player.area,
            position = %data.player.position,
            monsters = data.monsters.len(),
            "entered simulated game"
        );
        Ok(())
    }

    async fn return_to_town(&self, _ctx: &Context) -> Result<()> {
        self.world.update(|s| {
            for slot in &mut s.belt.slots {
                slot.count = BELT_REFILL;
            }
        });
        info!("belt refilled");
        Ok(())
    }

    async fn correct_area(&self, _ctx: &Context, expected: AreaId) -> Result<()> {
        self.world.update(|s| s.player.area = expected);
        Ok(())
    }
}
