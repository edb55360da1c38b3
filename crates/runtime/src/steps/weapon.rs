//! Weapon set swapping.
use std::time::Duration;

use game_core::WeaponSet;
use tracing::{debug, warn};

use super::PRIORITY_WAIT;
use super::retry::RetryPolicy;
use super::wait::wait_until;
use crate::context::Context;
use crate::error::{BotError, Result};

const SWAP_CONFIRM: Duration = Duration::from_secs(1);

/// Swap to `target`, verifying the weapon set actually changed.
///
/// Swapping is usually requested from inside a preempting task, so the
/// priority gate is bounded by [`PRIORITY_WAIT`]; on expiry the swap proceeds
/// anyway instead of deadlocking.
pub async fn swap_weapon(ctx: &Context, target: WeaponSet) -> Result<()> {
    if !ctx.pause_if_not_priority_timeout(PRIORITY_WAIT).await? {
        warn!(%target, "swapping weapons without priority");
    }

    let policy = RetryPolicy::new(3, Duration::from_millis(200), Duration::from_millis(200));
    for attempt in policy.attempts() {
        let data = ctx.refresh().await?;
        if data.player.weapon_set == target {
            return Ok(());
        }

        ctx.set_last_step("swap_weapon");
        ctx.input().press_key(data.key_bindings.swap_weapons);
        if wait_until(ctx, SWAP_CONFIRM, |s| s.player.weapon_set == target).await? {
            debug!(%target, attempt, "weapon set swapped");
            return Ok(());
        }
        ctx.sleep(policy.delay_for(attempt)).await?;
    }

    warn!(%target, "weapon swap not confirmed");
    Err(BotError::WeaponSwapTimeout { expected: target })
}

/// Swap to whichever set is not currently active.
pub async fn swap_to_other(ctx: &Context) -> Result<()> {
    let current = ctx.refresh().await?.player.weapon_set;
    swap_weapon(ctx, current.other()).await
}
