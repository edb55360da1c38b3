use std::time::Duration;

use game_core::Snapshot;
use tokio::time::Instant;

use crate::context::Context;
use crate::error::Result;

/// Poll fresh snapshots until `condition` holds or `timeout` elapses.
///
/// Returns `Ok(false)` on timeout. The condition is checked at least once,
/// so a zero timeout still reports the current state.
pub async fn wait_until<F>(ctx: &Context, timeout: Duration, mut condition: F) -> Result<bool>
where
    F: FnMut(&Snapshot) -> bool + Send,
{
    let deadline = Instant::now() + timeout;
    let poll = ctx.config().session.poll_interval;
    loop {
        let data = ctx.refresh().await?;
        if condition(&data) {
            return Ok(true);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        ctx.sleep(poll.min(deadline - now)).await?;
    }
}
