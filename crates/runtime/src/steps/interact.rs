//! Object interaction: doors, containers, shrines, destructibles.
use std::time::Duration;

use async_trait::async_trait;
use game_core::{EnvError, MouseButton, Object, Snapshot, UnitId};
use tracing::{debug, warn};

use super::retry::RetryPolicy;
use super::strategy::{Strategy, StrategyChain};
use super::wait::wait_until;
use crate::context::Context;
use crate::error::{BotError, Result};
use crate::movement::{MoveOptions, move_to};

/// Objects further than this are walked to first.
const INTERACT_DISTANCE: u32 = 5;
/// Time allowed for the game to react to one interaction.
const CONFIRM_TIMEOUT: Duration = Duration::from_secs(1);

struct PacketInteract;

#[async_trait]
impl Strategy<Object> for PacketInteract {
    fn name(&self) -> &'static str {
        "packet"
    }

    fn applicable(&self, ctx: &Context, _object: &Object) -> bool {
        ctx.packets().is_some()
    }

    async fn attempt(&self, ctx: &Context, object: &Object) -> Result<()> {
        let packets = ctx.packets().ok_or(EnvError::PacketsDisabled)?;
        packets.interact(object.id)?;
        Ok(())
    }
}

struct ClickInteract;

#[async_trait]
impl Strategy<Object> for ClickInteract {
    fn name(&self) -> &'static str {
        "click"
    }

    async fn attempt(&self, ctx: &Context, object: &Object) -> Result<()> {
        let data = ctx.data();
        let point = ctx.pathfinder().to_screen(&data, object.position);
        ctx.input().move_pointer(point);
        ctx.input().click(point, MouseButton::Left, None);
        Ok(())
    }
}

fn object_strategies() -> StrategyChain<Object> {
    StrategyChain::new().with(PacketInteract).with(ClickInteract)
}

/// Interact with `id` until `done` holds, walking to it when needed.
///
/// Attempts follow the default [`RetryPolicy`]; exhausting it yields
/// [`BotError::InteractionFailed`].
pub async fn interact_object<F>(ctx: &Context, id: UnitId, done: F) -> Result<()>
where
    F: Fn(&Snapshot) -> bool + Send + Sync,
{
    let policy = RetryPolicy::default();
    let chain = object_strategies();

    for attempt in policy.attempts() {
        ctx.pause_if_not_priority().await?;
        let data = ctx.refresh().await?;
        if done(&data) {
            return Ok(());
        }
        let Some(object) = data.object(id).cloned() else {
            debug!(object = %id, "object disappeared before interaction");
            break;
        };

        if data.distance_from_me(object.position) > INTERACT_DISTANCE {
            let opts = MoveOptions::default()
                .finish_distance(INTERACT_DISTANCE - 1)
                .ignore_items();
            if let Err(e) = move_to(ctx, object.position, &opts).await {
                if e.is_critical() {
                    return Err(e);
                }
                debug!(object = %id, attempt, error = %e, "could not reach object");
                ctx.sleep(policy.delay_for(attempt)).await?;
                continue;
            }
        }

        ctx.set_last_step(format!("interact {}", object.name));
        if let Some(strategy) = chain.run(ctx, &object).await? {
            debug!(object = %id, name = %object.name, strategy, attempt, "interaction issued");
        }
        if wait_until(ctx, CONFIRM_TIMEOUT, &done).await? {
            return Ok(());
        }
        ctx.sleep(policy.delay_for(attempt)).await?;
    }

    warn!(object = %id, attempts = policy.attempts, "interaction failed");
    Err(BotError::InteractionFailed {
        object: id,
        attempts: policy.attempts,
    })
}

/// Single interaction without movement, used while a move is blocked.
pub(crate) async fn interact_in_place<F>(ctx: &Context, object: &Object, done: F) -> Result<bool>
where
    F: Fn(&Snapshot) -> bool + Send + Sync,
{
    ctx.pause_if_not_priority().await?;
    if object_strategies().run(ctx, object).await?.is_none() {
        return Ok(false);
    }
    wait_until(ctx, CONFIRM_TIMEOUT, done).await
}

/// Open a chest or other container.
///
/// Idempotent: a container that is already open (no longer selectable) or
/// gone is reported as success without any input.
pub async fn open_container(ctx: &Context, id: UnitId) -> Result<()> {
    let data = ctx.refresh().await?;
    match data.object(id) {
        None => {
            debug!(object = %id, "container not found");
            Ok(())
        }
        Some(object) if !object.selectable => {
            debug!(object = %id, name = %object.name, "container already open");
            Ok(())
        }
        Some(_) => {
            interact_object(ctx, id, move |s| s.object(id).is_none_or(|o| !o.selectable)).await
        }
    }
}
