//! Game-specific routines the engine calls but does not implement.
use async_trait::async_trait;
use game_core::AreaId;

use crate::context::Context;
use crate::error::Result;

/// Hooks into menu flows, town logistics and game creation.
///
/// Every method has a no-op default so hosts only override what their game
/// needs. Implementations run under the priority tier of the calling
/// context and must use the step helpers for input.
#[async_trait]
pub trait GameRoutines: Send + Sync {
    /// Create or join a game. Called by the supervisor before the loops start.
    async fn start_game(&self, _ctx: &Context) -> Result<()> {
        Ok(())
    }

    /// Leave the current game. Called after every game, failed or not.
    async fn exit_game(&self, _ctx: &Context) -> Result<()> {
        Ok(())
    }

    /// Town preparation before a run (vendoring, repairs, stash).
    async fn pre_run(&self, _ctx: &Context, _first_run: bool) -> Result<()> {
        Ok(())
    }

    async fn post_run(&self, _ctx: &Context, _last_run: bool) -> Result<()> {
        Ok(())
    }

    /// Go back to town to refill the belt and empty the inventory.
    async fn return_to_town(&self, _ctx: &Context) -> Result<()> {
        Ok(())
    }

    /// Bring the player back to `expected` after an unplanned area change.
    async fn correct_area(&self, _ctx: &Context, _expected: AreaId) -> Result<()> {
        Ok(())
    }
}

/// Routines for hosts that manage games themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRoutines;

#[async_trait]
impl GameRoutines for NoopRoutines {}
