//! Attack controller.
//!
//! Issues repeated attacks on a target, tracks whether damage lands, and
//! repositions or gives the target up when it does not.
mod controller;
mod options;
mod state;

pub use controller::AttackController;
pub use options::{AttackOptions, AttackOutcome, AttackTarget, SkillSlot};

use crate::context::Context;
use crate::error::Result;

/// Attack with the primary (left) skill slot.
pub async fn primary_attack(
    ctx: &Context,
    target: AttackTarget,
    repetitions: u32,
    opts: &AttackOptions,
) -> Result<AttackOutcome> {
    ctx.session()
        .attack()
        .attack(ctx, SkillSlot::Primary, &target, repetitions, opts)
        .await
}

/// Attack with the secondary (right) skill slot.
pub async fn secondary_attack(
    ctx: &Context,
    target: AttackTarget,
    repetitions: u32,
    opts: &AttackOptions,
) -> Result<AttackOutcome> {
    ctx.session()
        .attack()
        .attack(ctx, SkillSlot::Secondary, &target, repetitions, opts)
        .await
}
