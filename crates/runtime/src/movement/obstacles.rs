//! Obstacle handling for a blocked move.
use game_core::{Object, ObjectKind, Path, Snapshot};
use tracing::debug;

use crate::context::Context;
use crate::error::Result;
use crate::steps::interact::interact_in_place;

/// Waypoint index checked for a door between the player and the path.
const DOOR_LOOKAHEAD: usize = 5;

/// Open a closed door on the upcoming path segment, or failing that break
/// destructibles around the player.
///
/// Interaction failures are logged and swallowed; only critical errors
/// propagate.
pub(crate) async fn clear_obstacles(ctx: &Context, data: &Snapshot, path: &Path) -> Result<()> {
    let me = data.player.position;

    if let Some(next) = path.waypoint(DOOR_LOOKAHEAD)
        && let Some(door) = ctx.pathfinder().door_between(data, me, next)
        && door.is_closed_door()
    {
        debug!(door = %door.id, position = %door.position, "opening door in path");
        ctx.set_last_step("open_door");
        let id = door.id;
        let opened = interact_in_place(ctx, &door, move |s: &Snapshot| {
            s.object(id).is_none_or(|o| !o.is_closed_door())
        })
        .await;
        return swallow(opened, &door);
    }

    let radius = ctx.config().movement.destructible_radius;
    let destructibles: Vec<Object> = data
        .objects
        .iter()
        .filter(|o| o.kind == ObjectKind::Destructible && o.selectable)
        .filter(|o| me.distance(o.position) <= radius)
        .cloned()
        .collect();

    for object in destructibles {
        debug!(object = %object.id, name = %object.name, "breaking destructible obstacle");
        ctx.set_last_step("break_obstacle");
        let id = object.id;
        let broken = interact_in_place(ctx, &object, move |s: &Snapshot| {
            s.object(id).is_none_or(|o| !o.selectable)
        })
        .await;
        swallow(broken, &object)?;
    }

    Ok(())
}

fn swallow(result: Result<bool>, object: &Object) -> Result<()> {
    match result {
        Ok(true) => Ok(()),
        Ok(false) => {
            debug!(object = %object.id, "obstacle did not react");
            Ok(())
        }
        Err(e) if e.is_critical() => Err(e),
        Err(e) => {
            debug!(object = %object.id, error = %e, "obstacle interaction failed");
            Ok(())
        }
    }
}
