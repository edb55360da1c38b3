//! Character buffs.
use std::time::Duration;

use game_core::{MouseButton, PlayerStates, Snapshot};
use tokio::time::Instant;
use tracing::{debug, warn};

use super::wait::wait_until;
use crate::context::Context;
use crate::error::Result;

/// Time allowed for every buff state to show up after a cycle.
const VERIFY_TIMEOUT: Duration = Duration::from_secs(1);

/// Recast buffs when the interval elapsed or a buff state is missing.
///
/// Returns whether a buff cycle ran. Never buffs in town.
pub async fn buff_if_required(ctx: &Context) -> Result<bool> {
    let character = &ctx.config().character;
    if character.buffs.is_empty() {
        return Ok(false);
    }

    let data = ctx.refresh().await?;
    if !buff_due(ctx, &data) {
        return Ok(false);
    }

    buff(ctx).await?;
    Ok(true)
}

/// A buff cycle is due outside town when the interval elapsed or a state
/// granted by a configured buff is missing.
pub(crate) fn buff_due(ctx: &Context, data: &Snapshot) -> bool {
    let character = &ctx.config().character;
    if character.buffs.is_empty() || data.is_in_town() {
        return false;
    }
    let last = ctx.game(|g| g.last_buff_at);
    if last.is_some_and(|at| at.elapsed() < character.buff_retry) {
        return false;
    }
    last.is_none_or(|at| at.elapsed() >= character.buff_interval)
        || character
            .buffs
            .iter()
            .any(|buff| !data.player.has_state(buff.grants))
}

/// Cast every configured buff on the player.
///
/// The attempt time is recorded before casting, so a failing cycle is not
/// retried on the very next tick. Returns whether every state is present
/// afterwards.
pub async fn buff(ctx: &Context) -> Result<bool> {
    let character = &ctx.config().character;
    ctx.game(|g| g.last_buff_at = Some(Instant::now()));
    ctx.set_last_step("buff");

    let mut wanted = PlayerStates::empty();
    for buff in &character.buffs {
        ctx.pause_if_not_priority().await?;
        let data = ctx.refresh().await?;
        let Some(key) = data.key_bindings.skill(buff.skill) else {
            debug!(skill = ?buff.skill, "buff skill has no key binding");
            continue;
        };
        wanted |= buff.grants;

        ctx.input().press_key(key);
        let point = ctx.pathfinder().to_screen(&data, data.player.position);
        ctx.input().click(point, MouseButton::Right, None);
        ctx.sleep(data.player.cast_duration).await?;
    }

    let applied = wait_until(ctx, VERIFY_TIMEOUT, |s| s.player.has_state(wanted)).await?;
    if !applied {
        let missing = wanted.difference(ctx.data().player.states);
        warn!(?missing, "buff cycle incomplete");
    }
    Ok(applied)
}
