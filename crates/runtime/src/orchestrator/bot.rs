use std::sync::Arc;

use game_core::Classified;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info_span};

use super::loops;
use crate::api::Run;
use crate::context::Context;
use crate::error::{BotError, Result};
use crate::priority::Priority;
use crate::session::Session;

/// Runs one game: the four loops under a shared cancellation scope.
pub struct Bot {
    session: Arc<Session>,
    runs: Arc<[Arc<dyn Run>]>,
}

impl Bot {
    pub fn new(session: Arc<Session>, runs: Vec<Arc<dyn Run>>) -> Self {
        Self {
            session,
            runs: runs.into(),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Run the loops until one of them finishes.
    ///
    /// The first loop to return cancels `scope`, which unwinds the others.
    /// The result is the first error that was not caused by that
    /// cancellation; held input is always released on exit.
    pub async fn run_game(&self, scope: CancellationToken) -> Result<()> {
        let ctx = |tier| Context::new(Arc::clone(&self.session), tier, scope.clone());

        let mut loops = JoinSet::new();
        loops.spawn(
            loops::background(ctx(Priority::Background))
                .instrument(info_span!("loop", kind = %Priority::Background)),
        );
        loops.spawn(
            loops::health(ctx(Priority::Background))
                .instrument(info_span!("loop", kind = "health")),
        );
        loops.spawn(
            loops::high_priority(ctx(Priority::High))
                .instrument(info_span!("loop", kind = %Priority::High)),
        );
        loops.spawn(
            loops::low_priority(ctx(Priority::Normal), Arc::clone(&self.runs))
                .instrument(info_span!("loop", kind = %Priority::Normal)),
        );

        let mut outcome = Ok(());
        let mut cancelled = false;
        while let Some(joined) = loops.join_next().await {
            let result = joined.unwrap_or_else(|e| {
                error!(error = %e, "session loop panicked");
                Err(BotError::EmergencyExit {
                    reason: format!("loop task failed: {e}"),
                })
            });

            match result {
                Err(BotError::Stopped) if cancelled => {}
                Err(e) if outcome.is_ok() => {
                    debug!(error = %e, code = e.error_code(), "game ending");
                    outcome = Err(e);
                }
                _ => {}
            }

            if !cancelled {
                cancelled = true;
                scope.cancel();
            }
        }

        self.session.env().input.release_all();
        outcome
    }
}
