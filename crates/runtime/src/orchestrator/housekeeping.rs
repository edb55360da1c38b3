//! Work done by the high-priority loop while it holds priority.
use std::time::Duration;

use game_core::PotionKind;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::context::Context;
use crate::error::Result;
use crate::events::{Event, RunEvent};
use crate::steps::buff::buff_due;
use crate::steps::{buff_if_required, wait_until};

const MENU_CLOSE_TIMEOUT: Duration = Duration::from_millis(500);

/// One housekeeping pass. Each task runs even if an earlier one failed with a
/// recoverable error.
pub(crate) async fn tick(ctx: &Context) -> Result<()> {
    recover(ctx, "drink_potions", drink_potions(ctx).await)?;
    recover(ctx, "close_menus", close_menus(ctx).await)?;
    recover(ctx, "buff", buff_if_required(ctx).await.map(drop))?;
    recover(ctx, "area_correction", correct_area(ctx).await)?;
    recover(ctx, "town_return", town_return(ctx).await)
}

fn recover(ctx: &Context, task: &str, result: Result<()>) -> Result<()> {
    match result {
        Err(e) if e.is_critical() => Err(e),
        Err(e) => {
            warn!(task, error = %e, tier = %ctx.priority(), "housekeeping task failed");
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

/// Whether a pass has anything to do, checked before preempting.
pub(crate) fn pending(ctx: &Context) -> bool {
    let data = ctx.data();
    ctx.game(|g| g.has_pending_potions() || g.area_correction.is_some_and(|a| a != data.player.area))
        || (!data.is_in_town() && !data.menus.is_empty())
        || buff_due(ctx, &data)
        || needs_town(ctx, &data)
}

async fn drink_potions(ctx: &Context) -> Result<()> {
    let requests = ctx.game(|g| g.take_potion_requests());
    if requests.is_empty() {
        return Ok(());
    }

    let data = ctx.refresh().await?;
    for kind in requests {
        let Some(slot) = data.belt.first(kind) else {
            debug!(%kind, "no potion of this kind in belt");
            continue;
        };
        ctx.set_last_step(format!("drink {kind}"));
        ctx.input().press_key(slot.key);
        ctx.game(|g| g.record_potion(kind, Instant::now()));
        info!(
            %kind,
            life = data.life_percent(),
            mana = data.mana_percent(),
            left = slot.count.saturating_sub(1),
            "drinking potion"
        );
    }
    Ok(())
}

async fn close_menus(ctx: &Context) -> Result<()> {
    let data = ctx.refresh().await?;
    if data.menus.is_empty() || data.is_in_town() {
        return Ok(());
    }

    debug!(menus = ?data.menus, "closing open menus");
    ctx.set_last_step("close_menus");
    ctx.input().press_key(data.key_bindings.close_menus);
    if !wait_until(ctx, MENU_CLOSE_TIMEOUT, |s| s.menus.is_empty()).await? {
        debug!("menus still open");
    }
    Ok(())
}

async fn correct_area(ctx: &Context) -> Result<()> {
    let Some(expected) = ctx.game(|g| g.area_correction) else {
        return Ok(());
    };
    let data = ctx.refresh().await?;
    if data.is_in_town() || data.player.area == expected {
        return Ok(());
    }

    let actual = data.player.area;
    warn!(%expected, %actual, "player outside expected area");
    ctx.publish(Event::Run(RunEvent::AreaCorrection { expected, actual }));
    ctx.set_last_step("area_correction");
    ctx.routines().correct_area(ctx, expected).await
}

fn needs_town(ctx: &Context, data: &game_core::Snapshot) -> bool {
    let cfg = &ctx.config().health;
    if data.is_in_town() {
        return false;
    }
    let low_potions = data.belt.count(PotionKind::Healing) < cfg.town_return_healing_potions;
    if !low_potions && !data.inventory.is_full() {
        return false;
    }
    ctx.game(|g| g.last_town_return_at)
        .is_none_or(|at| at.elapsed() >= cfg.town_return_cooldown)
}

async fn town_return(ctx: &Context) -> Result<()> {
    let data = ctx.refresh().await?;
    if !needs_town(ctx, &data) {
        return Ok(());
    }

    ctx.game(|g| g.last_town_return_at = Some(Instant::now()));
    info!(
        healing_potions = data.belt.count(PotionKind::Healing),
        inventory_full = data.inventory.is_full(),
        "returning to town"
    );
    ctx.set_last_step("town_return");
    ctx.routines().return_to_town(ctx).await
}
