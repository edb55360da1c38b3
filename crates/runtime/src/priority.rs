//! Cooperative priority arbitration between the session loops.
//!
//! Every loop declares a [`Priority`] tier when it is started. The
//! [`Arbitrator`] holds the single active tier; a loop may drive the input
//! device only while its own tier is the active one. Waiting is done on a
//! change notification rather than by polling, and a switch to
//! [`Priority::Stop`] wakes every waiter with [`BotError::Stopped`].
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::{BotError, Result};

/// Scheduling rank of a loop.
///
/// High preempts Normal, Normal preempts Background. Pause blocks every loop
/// and Stop is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    High,
    Normal,
    Background,
    Pause,
    Stop,
}

/// Holder of the session's active tier.
#[derive(Debug)]
pub struct Arbitrator {
    active: watch::Sender<Priority>,
    /// Tier to restore when a pause ends.
    paused_from: std::sync::Mutex<Option<Priority>>,
}

impl Arbitrator {
    pub fn new() -> Self {
        let (active, _) = watch::channel(Priority::Normal);
        Self {
            active,
            paused_from: std::sync::Mutex::new(None),
        }
    }

    pub fn active(&self) -> Priority {
        *self.active.borrow()
    }

    pub fn is_stopped(&self) -> bool {
        self.active() == Priority::Stop
    }

    /// Make `tier` the active tier. Once Stop is active it stays active.
    pub fn switch(&self, tier: Priority) {
        let changed = self.active.send_if_modified(|current| {
            if *current == Priority::Stop || *current == tier {
                return false;
            }
            *current = tier;
            true
        });
        if changed {
            tracing::debug!(%tier, "priority switched");
        }
    }

    /// Switch from `from` to `to` only if `from` is the active tier.
    ///
    /// The high-priority loop uses this so it never overrides an external
    /// Pause or Stop.
    pub fn preempt(&self, from: Priority, to: Priority) -> bool {
        self.active.send_if_modified(|current| {
            if *current != from {
                return false;
            }
            *current = to;
            true
        })
    }

    /// Hand priority back after a [`preempt`](Self::preempt).
    pub fn yield_priority(&self, from: Priority, to: Priority) -> bool {
        self.preempt(from, to)
    }

    pub fn pause(&self) {
        let previous = self.active();
        if matches!(previous, Priority::Pause | Priority::Stop) {
            return;
        }
        *self
            .paused_from
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(previous);
        self.switch(Priority::Pause);
    }

    /// End a pause, restoring the tier that was active when it began.
    pub fn resume(&self) {
        let restore = self
            .paused_from
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
            .unwrap_or(Priority::Normal);
        self.preempt(Priority::Pause, restore);
    }

    /// Block until `tier` is active.
    ///
    /// Returns [`BotError::Stopped`] as soon as Stop becomes active or `cancel`
    /// fires, whichever comes first.
    pub async fn acquire(&self, tier: Priority, cancel: &CancellationToken) -> Result<()> {
        let mut rx = self.active.subscribe();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(BotError::Stopped),
            seen = rx.wait_for(|active| *active == tier || *active == Priority::Stop) => {
                match seen {
                    Ok(active) if *active == tier => Ok(()),
                    _ => Err(BotError::Stopped),
                }
            }
        }
    }

    /// Like [`acquire`](Self::acquire) but gives up after `timeout`.
    ///
    /// `Ok(false)` means the tier never became active; callers are expected to
    /// proceed anyway rather than hang.
    pub async fn acquire_timeout(
        &self,
        tier: Priority,
        cancel: &CancellationToken,
        timeout: Duration,
    ) -> Result<bool> {
        match tokio::time::timeout(timeout, self.acquire(tier, cancel)).await {
            Ok(Ok(())) => Ok(true),
            Ok(Err(e)) => Err(e),
            Err(_) => Ok(false),
        }
    }
}

impl Default for Arbitrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use strum::IntoEnumIterator;
    use tokio::time::Instant;

    #[test]
    fn test_tiers_are_ordered() {
        let tiers: Vec<_> = Priority::iter().collect();
        let mut sorted = tiers.clone();
        sorted.sort();
        assert_eq!(tiers, sorted);
        assert!(Priority::High < Priority::Normal);
    }

    #[test]
    fn test_at_most_one_tier_is_active() {
        let arbitrator = Arbitrator::new();
        for tier in [Priority::High, Priority::Background, Priority::Normal] {
            arbitrator.switch(tier);
            let active: Vec<_> = Priority::iter()
                .filter(|t| *t == arbitrator.active())
                .collect();
            assert_eq!(active, vec![tier]);
        }
    }

    #[test]
    fn test_stop_is_terminal() {
        let arbitrator = Arbitrator::new();
        arbitrator.switch(Priority::Stop);
        arbitrator.switch(Priority::Normal);
        assert!(!arbitrator.preempt(Priority::Stop, Priority::High));
        assert_eq!(arbitrator.active(), Priority::Stop);
    }

    #[test]
    fn test_preempt_does_not_override_pause() {
        let arbitrator = Arbitrator::new();
        arbitrator.pause();
        assert!(!arbitrator.preempt(Priority::Normal, Priority::High));
        assert_eq!(arbitrator.active(), Priority::Pause);

        arbitrator.resume();
        assert_eq!(arbitrator.active(), Priority::Normal);
    }

    #[test]
    fn test_pause_during_high_tier_can_be_handed_back_after_resume() {
        let arbitrator = Arbitrator::new();
        assert!(arbitrator.preempt(Priority::Normal, Priority::High));
        arbitrator.pause();
        assert!(!arbitrator.yield_priority(Priority::High, Priority::Normal));

        arbitrator.resume();
        assert_eq!(arbitrator.active(), Priority::High);
        assert!(arbitrator.yield_priority(Priority::High, Priority::Normal));
        assert_eq!(arbitrator.active(), Priority::Normal);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_timeout_returns_false_after_the_budget() {
        let arbitrator = Arbitrator::new();
        arbitrator.switch(Priority::High);
        let cancel = CancellationToken::new();

        let started = Instant::now();
        let acquired = arbitrator
            .acquire_timeout(Priority::Normal, &cancel, Duration::from_millis(200))
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert!(!acquired);
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(210));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiter_wakes_when_its_tier_becomes_active() {
        let arbitrator = Arc::new(Arbitrator::new());
        arbitrator.switch(Priority::High);
        let cancel = CancellationToken::new();

        let waiter = {
            let arbitrator = Arc::clone(&arbitrator);
            let cancel = cancel.clone();
            tokio::spawn(async move { arbitrator.acquire(Priority::Normal, &cancel).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        arbitrator.switch(Priority::Normal);
        assert!(waiter.await.unwrap().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_unwinds_blocked_waiters() {
        let arbitrator = Arc::new(Arbitrator::new());
        arbitrator.pause();
        let cancel = CancellationToken::new();

        let waiter = {
            let arbitrator = Arc::clone(&arbitrator);
            let cancel = cancel.clone();
            tokio::spawn(async move { arbitrator.acquire(Priority::Normal, &cancel).await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        arbitrator.switch(Priority::Stop);

        assert!(matches!(waiter.await.unwrap(), Err(BotError::Stopped)));
    }

    #[tokio::test]
    async fn test_cancellation_unwinds_blocked_waiters() {
        let arbitrator = Arbitrator::new();
        arbitrator.switch(Priority::High);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = arbitrator.acquire(Priority::Normal, &cancel).await;
        assert!(matches!(result, Err(BotError::Stopped)));
    }
}
