//! Movement with recovery on top of the movement controller.
use std::time::Duration;

use game_core::Position;
use tracing::{debug, warn};

use super::pickup::pick_up_nearby;
use super::retry::RetryPolicy;
use crate::context::Context;
use crate::error::{BotError, Result};
use crate::movement::{MoveError, MoveOptions, MoveOutcome, move_to};
use crate::steps::clear::clear_area;

/// Monster clearing rounds allowed before the blocked move is given up.
const MAX_CLEAR_ROUNDS: u32 = 10;

/// Move to `destination`, clearing blocking monsters and retrying after stuck
/// or round-trip failures. Picks up nearby items on arrival unless
/// `opts.ignore_items` is set.
pub async fn move_to_resilient(
    ctx: &Context,
    destination: Position,
    opts: &MoveOptions,
) -> Result<MoveOutcome> {
    let policy = RetryPolicy::new(3, Duration::from_millis(200), Duration::from_millis(300));
    let mut retries = 0;
    let mut clear_rounds = 0;

    loop {
        match move_to(ctx, destination, opts).await {
            Ok(outcome) => {
                let pickup = ctx.game(|g| g.pickup_items);
                if !opts.ignore_items && pickup {
                    let radius = ctx.config().pickup.max_distance;
                    pick_up_nearby(ctx, radius).await?;
                }
                return Ok(outcome);
            }
            Err(BotError::Move(MoveError::MonstersInPath { count, closest }))
                if clear_rounds < MAX_CLEAR_ROUNDS =>
            {
                clear_rounds += 1;
                debug!(count, %closest, round = clear_rounds, "clearing monsters in path");
                let radius = ctx.config().movement.clear_path_distance;
                clear_area(ctx, radius, &opts.monster_filter).await?;
            }
            Err(
                e @ BotError::Move(MoveError::PlayerStuck { .. } | MoveError::PlayerRoundTrip { .. }),
            ) if retries < policy.attempts => {
                retries += 1;
                warn!(%destination, retry = retries, error = %e, "move failed, retrying");
                ctx.sleep(policy.delay_for(retries)).await?;
            }
            Err(e) => return Err(e),
        }
    }
}
