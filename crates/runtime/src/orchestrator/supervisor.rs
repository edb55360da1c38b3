use std::sync::Arc;

use game_core::Classified;
use tokio::time::Instant;
use tracing::{error, info, warn};

use super::bot::Bot;
use crate::api::Run;
use crate::context::Context;
use crate::error::{BotError, Result};
use crate::events::{Event, SessionEvent};
use crate::priority::Priority;
use crate::session::Session;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SupervisorReport {
    pub games: u32,
    pub failed: u32,
}

/// Game lifecycle: create, run and leave games until stopped, a game limit
/// is reached, or too many games fail in a row.
pub struct Supervisor {
    bot: Bot,
}

impl Supervisor {
    pub fn new(session: Arc<Session>, runs: Vec<Arc<dyn Run>>) -> Self {
        Self {
            bot: Bot::new(session, runs),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        self.bot.session()
    }

    pub fn pause(&self) {
        self.session().pause();
    }

    pub fn resume(&self) {
        self.session().resume();
    }

    pub fn stop(&self) {
        self.session().stop();
    }

    /// Run games until stopped or until `max_games` have been played.
    ///
    /// Returns the last error once `max_consecutive_failures` games failed in
    /// a row.
    pub async fn run(&self, max_games: Option<u32>) -> Result<SupervisorReport> {
        let session = Arc::clone(self.session());
        let limit = session.config().session.max_consecutive_failures.max(1);
        let mut report = SupervisorReport::default();
        let mut consecutive = 0;

        loop {
            if session.is_stopped() || max_games.is_some_and(|max| report.games >= max) {
                break;
            }
            if session.arbitrator().active() == Priority::Pause {
                match session
                    .arbitrator()
                    .acquire(Priority::Normal, session.root_token())
                    .await
                {
                    Ok(()) => {}
                    Err(BotError::Stopped) => break,
                    Err(e) => return Err(e),
                }
            }

            report.games += 1;
            let game = report.games;
            let result = self.play(&session, game).await;

            match result {
                Ok(()) => consecutive = 0,
                Err(BotError::Stopped) => break,
                Err(e) => {
                    report.failed += 1;
                    consecutive += 1;
                    error!(game, error = %e, code = e.error_code(), consecutive, "game failed");
                    if consecutive >= limit {
                        error!(limit, "too many consecutive failed games, giving up");
                        return Err(e);
                    }
                }
            }
        }

        info!(games = report.games, failed = report.failed, "supervisor finished");
        Ok(report)
    }

    async fn play(&self, session: &Arc<Session>, game: u32) -> Result<()> {
        session.reset_game();
        let scope = session.root_token().child_token();
        let ctx = Context::new(Arc::clone(session), Priority::Normal, scope.clone());
        let started = Instant::now();

        info!(game, "starting game");
        let result = match ctx.routines().start_game(&ctx).await {
            Ok(()) => {
                session
                    .events()
                    .publish(Event::Session(SessionEvent::GameStarted { game }));
                self.bot.run_game(scope).await
            }
            Err(e) => Err(e),
        };

        if !session.is_stopped() {
            session.arbitrator().preempt(Priority::High, Priority::Normal);
            let exit = Context::new(
                Arc::clone(session),
                Priority::Normal,
                session.root_token().child_token(),
            );
            if let Err(e) = exit.routines().exit_game(&exit).await {
                warn!(game, error = %e, "failed to leave game");
            }
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        session.events().publish(Event::Session(SessionEvent::GameFinished {
            game,
            error: result.as_ref().err().map(ToString::to_string),
            duration_ms,
        }));
        info!(game, duration_ms, ok = result.is_ok(), "game finished");
        result
    }
}
