//! Asynchronous abstraction for the scripted routes a game executes.
use async_trait::async_trait;

use crate::context::Context;
use crate::error::Result;

/// One scripted route, e.g. "clear the pit" or "kill a boss".
///
/// Runs are executed in order by the low-priority loop. A run drives the
/// game exclusively through the step and controller helpers, which gate every
/// input on the arbitrator, so a run never has to care about preemption.
///
/// Recoverable errors abort only the current run; critical errors end the
/// game.
#[async_trait]
pub trait Run: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, ctx: &Context) -> Result<()>;
}
