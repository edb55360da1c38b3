//! Ground item pickup with blacklisting.
use std::time::Duration;

use async_trait::async_trait;
use game_core::{EnvError, GroundItem, MouseButton, SkillId, UnitId};
use tracing::{debug, info, warn};

use super::PRIORITY_WAIT;
use super::retry::RetryPolicy;
use super::strategy::{Strategy, StrategyChain};
use super::wait::wait_until;
use crate::context::Context;
use crate::error::{BotError, Result};
use crate::events::{Event, ItemEvent};
use crate::movement::{MoveOptions, move_to};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupOutcome {
    PickedUp,
    /// The item was no longer on the ground.
    Gone,
    /// Every attempt failed; the item is skipped for the rest of the game.
    Blacklisted,
    NoSpace,
    /// Pickup is disabled for this game.
    Disabled,
}

struct Telekinesis;

#[async_trait]
impl Strategy<GroundItem> for Telekinesis {
    fn name(&self) -> &'static str {
        "telekinesis"
    }

    fn applicable(&self, ctx: &Context, item: &GroundItem) -> bool {
        let data = ctx.data();
        !data.is_in_town()
            && data.key_bindings.skill(SkillId::TELEKINESIS).is_some()
            && data.distance_from_me(item.position) <= ctx.config().pickup.telekinesis_range
    }

    async fn attempt(&self, ctx: &Context, item: &GroundItem) -> Result<()> {
        let data = ctx.data();
        if data.player.right_skill != SkillId::TELEKINESIS
            && let Some(key) = data.key_bindings.skill(SkillId::TELEKINESIS)
        {
            ctx.input().press_key(key);
        }
        let point = ctx.pathfinder().to_screen(&data, item.position);
        ctx.input().click(point, MouseButton::Right, None);
        Ok(())
    }
}

struct PacketPickup;

#[async_trait]
impl Strategy<GroundItem> for PacketPickup {
    fn name(&self) -> &'static str {
        "packet"
    }

    fn applicable(&self, ctx: &Context, _item: &GroundItem) -> bool {
        ctx.packets().is_some()
    }

    async fn attempt(&self, ctx: &Context, item: &GroundItem) -> Result<()> {
        let packets = ctx.packets().ok_or(EnvError::PacketsDisabled)?;
        packets.pick_up(item.id)?;
        Ok(())
    }
}

struct WalkAndClick;

#[async_trait]
impl Strategy<GroundItem> for WalkAndClick {
    fn name(&self) -> &'static str {
        "click"
    }

    async fn attempt(&self, ctx: &Context, item: &GroundItem) -> Result<()> {
        let max_distance = ctx.config().pickup.max_distance;
        if ctx.data().distance_from_me(item.position) > max_distance {
            let opts = MoveOptions::default().finish_distance(1).ignore_items();
            move_to(ctx, item.position, &opts).await?;
        }

        let data = ctx.refresh().await?;
        let distance = data.distance_from_me(item.position);
        if distance > max_distance {
            return Err(BotError::ItemTooFar {
                item: item.id,
                distance,
            });
        }

        let point = ctx.pathfinder().to_screen(&data, item.position);
        ctx.input().move_pointer(point);
        ctx.input().click(point, MouseButton::Left, None);
        Ok(())
    }
}

fn pickup_strategies() -> StrategyChain<GroundItem> {
    StrategyChain::new()
        .with(Telekinesis)
        .with(PacketPickup)
        .with(WalkAndClick)
}

/// Pick up one ground item, blacklisting it after every attempt failed.
///
/// The priority gate is bounded so a pickup requested while another tier is
/// active proceeds instead of hanging.
pub async fn pick_up_item(ctx: &Context, id: UnitId) -> Result<PickupOutcome> {
    let cfg = &ctx.config().pickup;
    let (enabled, blacklisted) = ctx.game(|g| (g.pickup_items, g.is_blacklisted(id)));
    if !enabled {
        return Ok(PickupOutcome::Disabled);
    }
    if blacklisted {
        debug!(item = %id, "item is blacklisted");
        return Ok(PickupOutcome::Blacklisted);
    }

    let policy = RetryPolicy::new(cfg.attempts, Duration::from_millis(150), Duration::from_millis(100));
    let chain = pickup_strategies();
    let mut name = String::new();

    for attempt in policy.attempts() {
        if !ctx.pause_if_not_priority_timeout(PRIORITY_WAIT).await? {
            debug!(item = %id, "picking up without priority");
        }

        let data = ctx.refresh().await?;
        let Some(item) = data.ground_item(id).cloned() else {
            if attempt == 1 {
                return Ok(PickupOutcome::Gone);
            }
            return Ok(picked_up(ctx, id, name));
        };
        if data.inventory.is_full() {
            info!(item = %id, name = %item.name, "inventory full, leaving item");
            return Ok(PickupOutcome::NoSpace);
        }

        ctx.set_last_step(format!("pick_up {}", item.name));
        name.clone_from(&item.name);
        match chain.run(ctx, &item).await? {
            Some(strategy) => debug!(item = %id, strategy, attempt, "pickup issued"),
            None => debug!(item = %id, attempt, "no pickup strategy succeeded"),
        }

        if wait_until(ctx, cfg.confirm_timeout, |s| s.ground_item(id).is_none()).await? {
            return Ok(picked_up(ctx, id, name));
        }
        ctx.sleep(policy.delay_for(attempt)).await?;
    }

    let data = ctx.data();
    ctx.game(|g| g.blacklist(id));
    warn!(item = %id, %name, attempts = policy.attempts, "failed to pick up item, blacklisting");
    ctx.publish(Event::Item(ItemEvent::Blacklisted {
        item: id,
        name,
        attempts: policy.attempts,
        snapshot: Box::new((*data).clone()),
    }));
    Ok(PickupOutcome::Blacklisted)
}

fn picked_up(ctx: &Context, id: UnitId, name: String) -> PickupOutcome {
    ctx.game(|g| g.record_pickup(id));
    info!(item = %id, %name, "picked up item");
    ctx.publish(Event::Item(ItemEvent::PickedUp { item: id, name }));
    PickupOutcome::PickedUp
}

/// Pick up every item within `radius`, closest first.
pub async fn pick_up_nearby(ctx: &Context, radius: u32) -> Result<u32> {
    let data = ctx.refresh().await?;
    let mut nearby: Vec<(u32, UnitId)> = data
        .items
        .iter()
        .map(|item| (data.distance_from_me(item.position), item.id))
        .filter(|(distance, _)| *distance <= radius)
        .collect();
    nearby.sort_unstable();

    let mut picked = 0;
    for (_, id) in nearby {
        match pick_up_item(ctx, id).await? {
            PickupOutcome::PickedUp => picked += 1,
            PickupOutcome::NoSpace | PickupOutcome::Disabled => break,
            PickupOutcome::Gone | PickupOutcome::Blacklisted => {}
        }
    }
    Ok(picked)
}
