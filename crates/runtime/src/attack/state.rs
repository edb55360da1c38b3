//! Per-target damage progress tracking.
//!
//! A target that takes no damage while neither it nor the player moves is
//! "stalled". A stall longer than the failed-attempt timeout earns a
//! reposition; once the allowed repositions are spent, a stall that is still
//! present when the cooldown since the last reposition has elapsed gives the
//! target up.
use std::collections::HashMap;
use std::time::Duration;

use game_core::{Monster, Position, UnitId};
use tokio::time::Instant;

use crate::config::AttackConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StallVerdict {
    Progressing,
    Stalled,
    Reposition,
    GiveUp,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct AttackState {
    last_health: u32,
    last_position: Position,
    last_check: Instant,
    stalled_since: Option<Instant>,
    last_reposition: Option<Instant>,
    repositions: u32,
    touched: Instant,
}

impl AttackState {
    fn new(monster: &Monster, now: Instant) -> Self {
        Self {
            last_health: monster.life.current,
            last_position: monster.position,
            last_check: now,
            stalled_since: None,
            last_reposition: None,
            repositions: 0,
            touched: now,
        }
    }

    pub(crate) fn repositions(&self) -> u32 {
        self.repositions
    }

    /// Record a health sample if the sampling interval has elapsed.
    fn sample(&mut self, monster: &Monster, now: Instant, interval: Duration) {
        self.touched = now;
        if now.saturating_duration_since(self.last_check) < interval {
            return;
        }

        let damaged = monster.life.current < self.last_health;
        let moved = monster.position != self.last_position;
        if damaged || moved {
            self.stalled_since = None;
        } else if self.stalled_since.is_none() {
            self.stalled_since = Some(now);
        }

        self.last_health = monster.life.current;
        self.last_position = monster.position;
        self.last_check = now;
    }

    fn verdict(&self, now: Instant, cfg: &AttackConfig) -> StallVerdict {
        let Some(since) = self.stalled_since else {
            return StallVerdict::Progressing;
        };
        let streak = now.saturating_duration_since(since);

        if self.repositions < cfg.max_repositions {
            let cooled = self
                .last_reposition
                .is_none_or(|at| now.saturating_duration_since(at) >= cfg.reposition_cooldown);
            if streak >= cfg.failed_attempt_timeout && cooled {
                return StallVerdict::Reposition;
            }
            return StallVerdict::Stalled;
        }

        let exhausted = match self.last_reposition {
            Some(at) => now.saturating_duration_since(at) >= cfg.reposition_cooldown,
            None => streak >= cfg.failed_attempt_timeout,
        };
        if exhausted {
            StallVerdict::GiveUp
        } else {
            StallVerdict::Stalled
        }
    }

    fn record_reposition(&mut self, now: Instant) {
        self.repositions += 1;
        self.last_reposition = Some(now);
        self.stalled_since = None;
        self.last_check = now;
    }
}

/// Attack states keyed by target id. Owned by the attack controller.
#[derive(Debug)]
pub(crate) struct AttackStateTable {
    cfg: AttackConfig,
    states: HashMap<UnitId, AttackState>,
}

impl AttackStateTable {
    pub(crate) fn new(cfg: AttackConfig) -> Self {
        Self {
            cfg,
            states: HashMap::new(),
        }
    }

    /// Sample `monster` and return the verdict for it.
    pub(crate) fn observe(&mut self, monster: &Monster, now: Instant) -> StallVerdict {
        if self.states.len() > self.cfg.gc_threshold {
            self.collect(now);
        }
        let interval = self.cfg.health_sample_interval;
        let state = self
            .states
            .entry(monster.id)
            .or_insert_with(|| AttackState::new(monster, now));
        state.sample(monster, now, interval);
        state.verdict(now, &self.cfg)
    }

    pub(crate) fn record_reposition(&mut self, id: UnitId, now: Instant) -> u32 {
        self.states.get_mut(&id).map_or(0, |state| {
            state.record_reposition(now);
            state.repositions
        })
    }

    pub(crate) fn get(&self, id: UnitId) -> Option<&AttackState> {
        self.states.get(&id)
    }

    pub(crate) fn remove(&mut self, id: UnitId) -> Option<AttackState> {
        self.states.remove(&id)
    }

    pub(crate) fn clear(&mut self) {
        self.states.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }

    fn collect(&mut self, now: Instant) {
        let stale_after = self.cfg.stale_after;
        let before = self.states.len();
        self.states
            .retain(|_, state| now.saturating_duration_since(state.touched) < stale_after);
        tracing::debug!(
            removed = before - self.states.len(),
            remaining = self.states.len(),
            "collected stale attack states"
        );
    }
}
