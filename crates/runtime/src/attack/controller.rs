use std::sync::{Mutex, MutexGuard, PoisonError};

use game_core::{HeldKey, Monster, MouseButton, Position, Snapshot, UnitId};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::options::{AttackOptions, AttackOutcome, AttackTarget, SkillSlot};
use super::state::{AttackStateTable, StallVerdict};
use crate::config::AttackConfig;
use crate::context::Context;
use crate::error::{BotError, Result};
use crate::events::{CombatEvent, Event};
use crate::movement::{MoveError, MoveOptions, move_to};

/// Attack loop with per-target stall tracking.
///
/// The state table lives behind a synchronous mutex that is only ever held
/// for a single table operation, never across an await point.
#[derive(Debug)]
pub struct AttackController {
    cfg: AttackConfig,
    table: Mutex<AttackStateTable>,
}

impl AttackController {
    pub(crate) fn new(cfg: AttackConfig) -> Self {
        Self {
            table: Mutex::new(AttackStateTable::new(cfg.clone())),
            cfg,
        }
    }

    /// Number of targets currently tracked.
    pub fn tracked(&self) -> usize {
        self.table().len()
    }

    pub(crate) fn clear(&self) {
        self.table().clear();
    }

    fn table(&self) -> MutexGuard<'_, AttackStateTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) async fn attack(
        &self,
        ctx: &Context,
        slot: SkillSlot,
        target: &AttackTarget,
        repetitions: u32,
        opts: &AttackOptions,
    ) -> Result<AttackOutcome> {
        let mut remaining = repetitions;
        let mut last_attack: Option<Instant> = None;
        let mut current: Option<UnitId> = None;
        ctx.set_last_step(format!("{slot}_attack"));

        loop {
            ctx.pause_if_not_priority().await?;
            let data = ctx.refresh().await?;
            let selected = select_target(&data, target);

            let next = selected.as_ref().map(|m| m.id);
            if let Some(previous) = current
                && next != Some(previous)
            {
                self.forget_if_dead(&data, previous);
            }
            current = next;

            let Some(monster) = selected else {
                if let AttackTarget::Unit(id) = target {
                    self.table().remove(*id);
                }
                return Ok(AttackOutcome::TargetGone);
            };
            if remaining == 0 {
                return Ok(AttackOutcome::Completed);
            }

            let now = Instant::now();
            let verdict = self.table().observe(&monster, now);
            match verdict {
                StallVerdict::GiveUp => return Ok(self.give_up(ctx, &data, &monster)),
                StallVerdict::Reposition => {
                    let attempt = self.table().record_reposition(monster.id, now);
                    info!(target = %monster.id, name = %monster.name, attempt, "no damage dealt, repositioning");
                    ctx.publish(Event::Combat(CombatEvent::Repositioned {
                        target: monster.id,
                        attempt,
                    }));
                    self.reposition(ctx, &data, &monster).await?;
                    continue;
                }
                StallVerdict::Progressing | StallVerdict::Stalled => {}
            }

            let me = data.player.position;
            if data.distance_from_me(monster.position) > opts.max_range {
                if !opts.follow_enemy {
                    return Ok(AttackOutcome::OutOfRange { target: monster.id });
                }
                approach(ctx, monster.position, opts.max_range.saturating_sub(1).max(1), true).await?;
                continue;
            }

            if !opts.force_attack && !ctx.pathfinder().line_of_sight(&data, me, monster.position) {
                let Some(spot) = sight_position(ctx, &data, monster.position, opts.max_range) else {
                    warn!(target = %monster.id, position = %monster.position, "no position with line of sight");
                    let repositions = self.forget(monster.id);
                    return Ok(AttackOutcome::Unreachable {
                        target: monster.id,
                        repositions,
                    });
                };
                debug!(target = %monster.id, %spot, "moving into line of sight");
                approach(ctx, spot, 0, true).await?;
                continue;
            }

            let cast = data.player.cast_duration;
            if let Some(at) = last_attack {
                let since = at.elapsed();
                if since < cast {
                    ctx.sleep(cast - since).await?;
                    continue;
                }
            }

            cast_at(ctx, &data, slot, &monster, opts);
            last_attack = Some(Instant::now());
            remaining -= 1;
            ctx.sleep(self.cfg.poll_interval).await?;
        }
    }

    fn give_up(&self, ctx: &Context, data: &Snapshot, monster: &Monster) -> AttackOutcome {
        let repositions = self.forget(monster.id);
        warn!(
            target = %monster.id,
            name = %monster.name,
            life = monster.life.current,
            repositions,
            "target takes no damage, giving up"
        );
        ctx.publish(Event::Combat(CombatEvent::TargetAbandoned {
            target: monster.id,
            name: monster.name.clone(),
            snapshot: Box::new(data.clone()),
        }));
        AttackOutcome::Unreachable {
            target: monster.id,
            repositions,
        }
    }

    fn forget(&self, id: UnitId) -> u32 {
        self.table().remove(id).map_or(0, |state| state.repositions())
    }

    /// Drop the state of a target the selection moved away from once it is
    /// dead or gone.
    fn forget_if_dead(&self, data: &Snapshot, id: UnitId) {
        if data.monster(id).is_none_or(|m| !m.is_alive()) {
            debug!(target = %id, "target gone, dropping its attack state");
            self.table().remove(id);
        }
    }

    /// Move to a walkable tile past or beside the target.
    async fn reposition(&self, ctx: &Context, data: &Snapshot, monster: &Monster) -> Result<()> {
        let me = data.player.position;
        let d = self.cfg.reposition_distance;
        let target = monster.position;
        let candidates = [
            me.beyond(target, d),
            target.offset(d, 0),
            target.offset(-d, 0),
            target.offset(0, d),
            target.offset(0, -d),
        ];
        let pathfinder = ctx.pathfinder();
        let Some(spot) = candidates
            .into_iter()
            .find(|p| *p != me && pathfinder.is_walkable(data, *p))
        else {
            debug!(target = %monster.id, "no walkable reposition spot");
            return Ok(());
        };
        ctx.set_last_step("reposition");
        approach(ctx, spot, 1, false).await
    }
}

fn select_target(data: &Snapshot, target: &AttackTarget) -> Option<Monster> {
    match target {
        AttackTarget::Unit(id) => data.monster(*id).filter(|m| m.is_alive()).cloned(),
        AttackTarget::ClosestWithin { radius, filter } => data
            .monsters
            .iter()
            .filter(|m| filter.matches(m))
            .map(|m| (data.distance_from_me(m.position), m))
            .filter(|(distance, _)| distance <= radius)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, m)| m.clone()),
    }
}

/// First tile along the path to `target` that is in range and sees it.
fn sight_position(ctx: &Context, data: &Snapshot, target: Position, max_range: u32) -> Option<Position> {
    let pathfinder = ctx.pathfinder();
    let path = pathfinder.path(data, target)?;
    path.nodes
        .into_iter()
        .find(|node| node.distance(target) <= max_range && pathfinder.line_of_sight(data, *node, target))
}

/// Move closer without caring about monsters. Recoverable movement errors are
/// logged; a missing path is only fatal when `path_required` is set.
async fn approach(ctx: &Context, destination: Position, finish: u32, path_required: bool) -> Result<()> {
    let opts = MoveOptions::default()
        .ignore_monsters()
        .ignore_items()
        .finish_distance(finish);
    match move_to(ctx, destination, &opts).await {
        Ok(_) => Ok(()),
        Err(e) if e.is_critical() => Err(e),
        Err(e @ BotError::Move(MoveError::NoPath { .. })) if path_required => Err(e),
        Err(e) => {
            debug!(%destination, error = %e, "approach failed");
            Ok(())
        }
    }
}

/// Cast the attack skill at `monster`, packet transport first.
fn cast_at(ctx: &Context, data: &Snapshot, slot: SkillSlot, monster: &Monster, opts: &AttackOptions) {
    let character = &ctx.config().character;
    let skill = opts.skill.unwrap_or(match slot {
        SkillSlot::Primary => character.primary_skill,
        SkillSlot::Secondary => character.secondary_skill,
    });

    if let Some(packets) = ctx.packets() {
        match packets.cast_skill_at_unit(skill, monster.id) {
            Ok(()) => return,
            Err(e) => debug!(error = %e, "packet cast failed, falling back to input"),
        }
    }

    let (selected, button) = match slot {
        SkillSlot::Primary => (data.player.left_skill, MouseButton::Left),
        SkillSlot::Secondary => (data.player.right_skill, MouseButton::Right),
    };
    if selected != skill {
        match data.key_bindings.skill(skill) {
            Some(key) => ctx.input().press_key(key),
            None => debug!(?skill, "attack skill has no key binding, using the selected skill"),
        }
    }

    let point = ctx.pathfinder().to_screen(data, monster.position);
    let _stand_still = opts
        .stand_still
        .then(|| HeldKey::hold(ctx.input(), data.key_bindings.stand_still));
    ctx.input().click(point, button, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::MonsterFilter;
    use game_core::{MonsterRarity, ResourceMeter};

    fn monster(id: u32, x: i32, rarity: MonsterRarity) -> Monster {
        Monster {
            id: UnitId(id),
            name: format!("m{id}"),
            position: Position::new(x, 0),
            life: ResourceMeter::full(10),
            rarity,
            hostile: true,
        }
    }

    fn data() -> Snapshot {
        let mut data = Snapshot::default();
        data.monsters = vec![
            monster(1, 3, MonsterRarity::Normal),
            monster(2, 6, MonsterRarity::Champion),
            monster(3, 30, MonsterRarity::Unique),
        ];
        data
    }

    #[test]
    fn test_select_specific_unit() {
        let data = data();
        let selected = select_target(&data, &AttackTarget::Unit(UnitId(3)));
        assert_eq!(selected.map(|m| m.id), Some(UnitId(3)));
        assert!(select_target(&data, &AttackTarget::Unit(UnitId(9))).is_none());
    }

    #[test]
    fn test_select_closest_matching_within_radius() {
        let data = data();
        let closest = AttackTarget::ClosestWithin {
            radius: 10,
            filter: MonsterFilter::any(),
        };
        assert_eq!(select_target(&data, &closest).map(|m| m.id), Some(UnitId(1)));

        let elites = AttackTarget::ClosestWithin {
            radius: 10,
            filter: MonsterFilter::rarities([MonsterRarity::Champion, MonsterRarity::Unique]),
        };
        assert_eq!(select_target(&data, &elites).map(|m| m.id), Some(UnitId(2)));

        let nothing_near = AttackTarget::ClosestWithin {
            radius: 2,
            filter: MonsterFilter::any(),
        };
        assert!(select_target(&data, &nothing_near).is_none());
    }

    #[test]
    fn test_dead_unit_is_gone() {
        let mut data = data();
        data.monsters[0].life = ResourceMeter::new(0, 10);
        assert!(select_target(&data, &AttackTarget::Unit(UnitId(1))).is_none());
    }
}
