//! The four concurrent session loops.
//!
//! Each loop owns a [`Context`] at its own tier and returns when its work is
//! done, when the game scope is cancelled, or with the first critical error.
use std::sync::Arc;

use game_core::Classified;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::health::HealthMonitor;
use super::housekeeping;
use crate::api::Run;
use crate::context::Context;
use crate::error::Result;
use crate::events::{Event, RunEvent, RunOutcome};
use crate::priority::Priority;

/// Keeps the shared snapshot fresh.
pub(crate) async fn background(ctx: Context) -> Result<()> {
    let tick = ctx.config().session.background_tick;
    loop {
        ctx.refresh().await?;
        ctx.sleep(tick).await?;
    }
}

/// Watches life, mana and progress. Never drives input.
pub(crate) async fn health(ctx: Context) -> Result<()> {
    let tick = ctx.config().session.health_tick;
    let monitor = HealthMonitor::new(ctx.config().health.clone());
    loop {
        let data = ctx.refresh().await?;
        let now = Instant::now();
        if let Err(e) = ctx.game(|g| monitor.check(&data, g, now)) {
            error!(error = %e, code = e.error_code(), life = data.life_percent(), "health check failed");
            return Err(e);
        }
        ctx.sleep(tick).await?;
    }
}

/// Preempts the normal tier for housekeeping and hands it back afterwards.
///
/// Priority is taken with a compare-and-switch from Normal, so an external
/// Pause or Stop is never overridden. A pause that began mid-tick makes the
/// hand back fail and resume restores High, so High seen between ticks is
/// always returned to Normal.
pub(crate) async fn high_priority(ctx: Context) -> Result<()> {
    let tick = ctx.config().session.high_priority_tick;
    let arbitrator = ctx.session().arbitrator();
    loop {
        ctx.check_cancelled()?;
        if arbitrator.yield_priority(Priority::High, Priority::Normal) {
            debug!("returned priority held across a pause");
        }
        if housekeeping::pending(&ctx) && arbitrator.preempt(Priority::Normal, Priority::High) {
            debug!("high priority tasks preempting");
            let result = housekeeping::tick(&ctx).await;
            arbitrator.yield_priority(Priority::High, Priority::Normal);
            result?;
        }
        ctx.sleep(tick).await?;
    }
}

/// Executes the game's runs in order.
///
/// Recoverable errors end only the current run; critical errors end the
/// game.
pub(crate) async fn low_priority(ctx: Context, runs: Arc<[Arc<dyn Run>]>) -> Result<()> {
    let count = runs.len();
    for (index, run) in runs.iter().enumerate() {
        ctx.pause_if_not_priority().await?;

        let name = run.name().to_owned();
        ctx.set_last_action(name.clone());
        ctx.publish(Event::Run(RunEvent::RunStarted { name: name.clone() }));
        info!(run = %name, "starting run");
        let started = Instant::now();

        let result = execute(&ctx, run.as_ref(), index == 0, index + 1 == count).await;
        ctx.game(|g| g.area_correction = None);
        let duration_ms = started.elapsed().as_millis() as u64;

        let outcome = match &result {
            Ok(()) => {
                info!(run = %name, duration_ms, "run finished");
                RunOutcome::Completed
            }
            Err(e) => {
                warn!(run = %name, error = %e, code = e.error_code(), critical = e.is_critical(), "run failed");
                RunOutcome::Failed {
                    error: e.to_string(),
                    code: e.error_code().to_owned(),
                }
            }
        };
        ctx.publish(Event::Run(RunEvent::RunFinished {
            name,
            outcome,
            duration_ms,
        }));

        if let Err(e) = result
            && e.is_critical()
        {
            return Err(e);
        }
    }
    Ok(())
}

async fn execute(ctx: &Context, run: &dyn Run, first: bool, last: bool) -> Result<()> {
    ctx.routines().pre_run(ctx, first).await?;
    run.run(ctx).await?;
    ctx.routines().post_run(ctx, last).await
}
