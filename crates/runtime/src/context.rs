//! Explicit per-task handle to the session.
//!
//! Every loop and every step receives a [`Context`] carrying the session, the
//! priority tier the task runs at and the cancellation scope of the current
//! game. Nothing is looked up from task-local or global state.
use std::sync::Arc;
use std::time::Duration;

use game_core::{InputDevice, PacketSender, Pathfinder, Snapshot};
use tokio_util::sync::CancellationToken;

use crate::api::GameRoutines;
use crate::config::BotConfig;
use crate::error::{BotError, Result};
use crate::events::{Event, EventBus};
use crate::priority::Priority;
use crate::session::{CurrentGame, Session};

#[derive(Clone, Debug)]
pub struct Context {
    session: Arc<Session>,
    priority: Priority,
    cancel: CancellationToken,
}

impl Context {
    pub fn new(session: Arc<Session>, priority: Priority, cancel: CancellationToken) -> Self {
        Self {
            session,
            priority,
            cancel,
        }
    }

    /// Same session and scope, different tier.
    pub fn with_priority(&self, priority: Priority) -> Self {
        Self {
            session: Arc::clone(&self.session),
            priority,
            cancel: self.cancel.clone(),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn config(&self) -> &BotConfig {
        self.session.config()
    }

    pub fn input(&self) -> &dyn InputDevice {
        self.session.env().input.as_ref()
    }

    pub fn pathfinder(&self) -> &dyn Pathfinder {
        self.session.env().pathfinder.as_ref()
    }

    /// Packet transport, only when one is attached and enabled.
    pub fn packets(&self) -> Option<&dyn PacketSender> {
        if !self.config().use_packets {
            return None;
        }
        self.session.env().packets.as_deref()
    }

    pub fn routines(&self) -> &dyn GameRoutines {
        self.session.env().routines.as_ref()
    }

    pub fn events(&self) -> &EventBus {
        self.session.events()
    }

    pub fn publish(&self, event: Event) {
        self.session.events().publish(event);
    }

    /// Latest snapshot without a refresh.
    pub fn data(&self) -> Arc<Snapshot> {
        self.session.latest()
    }

    pub async fn refresh(&self) -> Result<Arc<Snapshot>> {
        self.check_cancelled()?;
        self.session.refresh().await
    }

    pub async fn force_refresh(&self) -> Result<Arc<Snapshot>> {
        self.check_cancelled()?;
        self.session.force_refresh().await
    }

    pub fn game<R>(&self, f: impl FnOnce(&mut CurrentGame) -> R) -> R {
        self.session.with_game(f)
    }

    /// Block until this context's tier is the active one.
    pub async fn pause_if_not_priority(&self) -> Result<()> {
        self.session
            .arbitrator()
            .acquire(self.priority, &self.cancel)
            .await
    }

    /// Like [`pause_if_not_priority`](Self::pause_if_not_priority), but gives
    /// up after `timeout` and returns `false`.
    pub async fn pause_if_not_priority_timeout(&self, timeout: Duration) -> Result<bool> {
        self.session
            .arbitrator()
            .acquire_timeout(self.priority, &self.cancel, timeout)
            .await
    }

    pub fn switch_priority(&self, priority: Priority) {
        self.session.arbitrator().switch(priority);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled() || self.session.arbitrator().is_stopped()
    }

    pub fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(BotError::Stopped);
        }
        Ok(())
    }

    /// Sleep that ends early with [`BotError::Stopped`] when the scope is
    /// cancelled.
    pub async fn sleep(&self, duration: Duration) -> Result<()> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(BotError::Stopped),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }

    pub fn set_last_action(&self, action: impl Into<String>) {
        let action = action.into();
        self.session.set_marker(self.priority, |marker| {
            marker.action = Some(action);
            marker.step = None;
        });
    }

    pub fn set_last_step(&self, step: impl Into<String>) {
        let step = step.into();
        self.session
            .set_marker(self.priority, |marker| marker.step = Some(step));
    }
}
