//! Area clearing on top of the attack controller.
use std::collections::HashSet;

use game_core::UnitId;
use tracing::{debug, info};

use crate::attack::{AttackOptions, AttackOutcome, AttackTarget, secondary_attack};
use crate::context::Context;
use crate::error::Result;
use crate::movement::MonsterFilter;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub killed: u32,
    /// Targets skipped as unreachable or out of range.
    pub skipped: u32,
}

/// Kill every matching enemy within `radius` of the player.
///
/// Targets the attack controller gives up on are skipped for the rest of the
/// call, so the loop always terminates.
pub async fn clear_area(ctx: &Context, radius: u32, filter: &MonsterFilter) -> Result<ClearReport> {
    let per_cycle = ctx.config().character.attacks_per_cycle.max(1);
    let opts = AttackOptions::from_config(ctx.config());
    let mut skipped: HashSet<UnitId> = HashSet::new();
    let mut report = ClearReport::default();
    ctx.set_last_step("clear_area");

    loop {
        let data = ctx.refresh().await?;
        let Some(target) = data
            .enemies()
            .filter(|m| filter.matches(m) && !skipped.contains(&m.id))
            .map(|m| (data.distance_from_me(m.position), m.id))
            .filter(|(distance, _)| *distance <= radius)
            .min()
            .map(|(_, id)| id)
        else {
            break;
        };

        match secondary_attack(ctx, AttackTarget::Unit(target), per_cycle, &opts).await? {
            AttackOutcome::Completed => {}
            AttackOutcome::TargetGone => report.killed += 1,
            AttackOutcome::OutOfRange { target } | AttackOutcome::Unreachable { target, .. } => {
                debug!(%target, "skipping target");
                skipped.insert(target);
                report.skipped += 1;
            }
        }
    }

    info!(killed = report.killed, skipped = report.skipped, radius, "area cleared");
    Ok(report)
}
