use std::time::Duration;

use game_core::{AreaId, MouseButton, Path, Position, SkillId, Snapshot, UnitId};
use rand::Rng;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::obstacles::clear_obstacles;
use super::tracker::{ProgressTracker, TrackerConfig, Verdict};
use super::{MoveError, MoveOptions, MoveOutcome};
use crate::config::MovementConfig;
use crate::context::Context;
use crate::error::Result;
use crate::steps::wait_until;

/// Random tiles sampled when looking for an escape destination.
const ESCAPE_SAMPLES: usize = 16;

/// Move the player to `destination`.
///
/// Every iteration checks, in order: the absolute timeout, the priority gate,
/// an area change, arrival, monsters near the path, the path itself and the
/// progress tracker. The absolute timeout is checked before the gate and the
/// gate itself is bounded by the remaining budget, so the call never outlives
/// the timeout by more than one polling interval.
pub async fn move_to(ctx: &Context, destination: Position, opts: &MoveOptions) -> Result<MoveOutcome> {
    let cfg = &ctx.config().movement;
    let finish = opts.finish_distance.unwrap_or(cfg.finish_distance);
    let started = Instant::now();
    let start_area = ctx.refresh().await?.player.area;
    let mut tracker = ProgressTracker::new(TrackerConfig::from_movement(cfg), started);
    let mut last_step: Option<Instant> = None;

    ctx.set_last_step(format!("move_to {destination}"));

    loop {
        let elapsed = started.elapsed();
        if elapsed >= cfg.absolute_timeout {
            let position = ctx.data().player.position;
            warn!(%destination, %position, ?elapsed, "move timed out");
            return Err(MoveError::PlayerStuck { position, elapsed }.into());
        }
        if !ctx
            .pause_if_not_priority_timeout(cfg.absolute_timeout - elapsed)
            .await?
        {
            continue;
        }

        let data = ctx.refresh().await?;
        if data.player.area != start_area {
            return wait_for_area(ctx, data.player.area).await;
        }

        let position = data.player.position;
        if data.distance_from_me(destination) <= finish {
            debug!(%destination, %position, "arrived");
            return Ok(MoveOutcome::Arrived);
        }

        if !opts.ignore_monsters
            && cfg.clear_path_distance > 0
            && let Some((count, closest)) =
                monsters_in_path(ctx, &data, opts, cfg.clear_path_distance)
        {
            debug!(count, %closest, "monsters in path");
            return Err(MoveError::MonstersInPath { count, closest }.into());
        }

        let Some(path) = ctx.pathfinder().path(&data, destination) else {
            debug!(%destination, %position, "no path");
            return Err(MoveError::NoPath { destination }.into());
        };

        let teleport = ctx.config().character.use_teleport && data.can_teleport();
        tracker.set_stuck_threshold(stuck_threshold(cfg, &data, teleport));

        match tracker.observe(Instant::now(), position, path.distance()) {
            Verdict::Progressing => {}
            Verdict::Blocked => clear_obstacles(ctx, &data, &path).await?,
            Verdict::Escape => {
                escape(ctx, &data, teleport, cfg.escape_radius);
                last_step = Some(Instant::now());
                ctx.sleep(cfg.poll_interval).await?;
                continue;
            }
            Verdict::Stuck { elapsed } => {
                warn!(%destination, %position, ?elapsed, escapes = tracker.escapes(), "player stuck");
                return Err(MoveError::PlayerStuck { position, elapsed }.into());
            }
            Verdict::RoundTrip { elapsed } => {
                warn!(%destination, %position, ?elapsed, "player walking in circles");
                return Err(MoveError::PlayerRoundTrip { position, elapsed }.into());
            }
        }

        let interval = if teleport {
            data.player.cast_duration
        } else {
            cfg.walk_click_interval
        };
        if last_step.is_none_or(|at| at.elapsed() >= interval) {
            step(ctx, &data, &path, teleport);
            last_step = Some(Instant::now());
        }

        ctx.sleep(cfg.poll_interval).await?;
    }
}

/// An area change ends the move once the new collision data is available.
async fn wait_for_area(ctx: &Context, area: AreaId) -> Result<MoveOutcome> {
    let timeout = ctx.config().movement.area_load_timeout;
    let loaded = wait_until(ctx, timeout, |s| s.area.collision_loaded).await?;
    if loaded {
        debug!(%area, "area changed during move");
    } else {
        warn!(%area, ?timeout, "collision data still loading after area change");
    }
    Ok(MoveOutcome::AreaChanged { area })
}

fn stuck_threshold(cfg: &MovementConfig, data: &Snapshot, teleport: bool) -> Duration {
    if !teleport {
        return cfg.walk_stuck_threshold;
    }
    cfg.teleport_stuck_base
        + data.player.cast_duration * 2
        + Duration::from_millis(u64::from(data.ping_ms) * 2)
}

fn monsters_in_path(
    ctx: &Context,
    data: &Snapshot,
    opts: &MoveOptions,
    max_distance: u32,
) -> Option<(usize, UnitId)> {
    let me = data.player.position;
    let pathfinder = ctx.pathfinder();
    let blocking: Vec<_> = data
        .monsters
        .iter()
        .filter(|m| opts.monster_filter.matches(m))
        .filter(|m| me.distance(m.position) <= max_distance)
        .filter(|m| pathfinder.line_of_sight(data, me, m.position))
        .filter(|m| pathfinder.door_between(data, me, m.position).is_none())
        .collect();

    let closest = blocking.iter().min_by_key(|m| me.distance(m.position))?.id;
    Some((blocking.len(), closest))
}

/// Issue one movement input towards the next waypoint.
fn step(ctx: &Context, data: &Snapshot, path: &Path, teleport: bool) {
    let cfg = &ctx.config().movement;
    let waypoint = if teleport {
        path.waypoint(cfg.teleport_range)
    } else {
        path.waypoint(cfg.walk_step)
    };
    let Some(waypoint) = waypoint else {
        return;
    };
    move_towards(ctx, data, waypoint, teleport);
}

fn move_towards(ctx: &Context, data: &Snapshot, target: Position, teleport: bool) {
    let input = ctx.input();
    let point = ctx.pathfinder().to_screen(data, target);

    if teleport {
        if data.player.right_skill != SkillId::TELEPORT
            && let Some(key) = data.key_bindings.skill(SkillId::TELEPORT)
        {
            input.press_key(key);
        }
        input.click(point, MouseButton::Right, None);
    } else {
        input.move_pointer(point);
        input.press_key(data.key_bindings.force_move);
    }
}

fn escape(ctx: &Context, data: &Snapshot, teleport: bool, radius: i32) {
    let origin = data.player.position;
    let pathfinder = ctx.pathfinder();
    let Some(target) = escape_target(origin, radius, |p| pathfinder.is_walkable(data, p)) else {
        debug!(%origin, "no walkable tile to escape to");
        return;
    };
    info!(from = %origin, to = %target, "trying to escape stuck position");
    ctx.set_last_step("escape");
    move_towards(ctx, data, target, teleport);
}

fn escape_target(origin: Position, radius: i32, walkable: impl Fn(Position) -> bool) -> Option<Position> {
    let radius = radius.max(1);
    let mut rng = rand::thread_rng();
    (0..ESCAPE_SAMPLES)
        .map(|_| {
            origin.offset(
                rng.gen_range(-radius..=radius),
                rng.gen_range(-radius..=radius),
            )
        })
        .find(|p| *p != origin && walkable(*p))
}
