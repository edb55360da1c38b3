//! Stuck and round-trip detection for one move call.
//!
//! Per observation exactly one detector runs: the stuck detector when the
//! position did not change, the round-trip detector when it did. Both feed a
//! single `blocked` flag that makes the controller look for obstacles.
use std::time::Duration;

use game_core::Position;
use tokio::time::Instant;

use crate::config::MovementConfig;

#[derive(Clone, Copy, Debug)]
pub(crate) struct TrackerConfig {
    pub stuck_threshold: Duration,
    pub escape_after: Duration,
    pub max_escapes: u32,
    pub round_trip_radius: u32,
    pub round_trip_blocked_after: Duration,
    pub round_trip_abort_after: Duration,
}

impl TrackerConfig {
    pub(crate) fn from_movement(cfg: &MovementConfig) -> Self {
        Self {
            stuck_threshold: cfg.walk_stuck_threshold,
            escape_after: cfg.escape_after,
            max_escapes: cfg.max_escape_attempts,
            round_trip_radius: cfg.round_trip_radius,
            round_trip_blocked_after: cfg.round_trip_blocked_after,
            round_trip_abort_after: cfg.round_trip_abort_after,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Verdict {
    Progressing,
    /// Look for doors and destructibles before the next step.
    Blocked,
    /// Try a randomized escape move.
    Escape,
    Stuck { elapsed: Duration },
    RoundTrip { elapsed: Duration },
}

#[derive(Clone, Copy, Debug)]
struct Anchor {
    position: Position,
    since: Instant,
    /// Best distance-to-destination seen since the anchor was set.
    best: u32,
}

#[derive(Debug)]
pub(crate) struct ProgressTracker {
    cfg: TrackerConfig,
    last_position: Option<Position>,
    unchanged_since: Instant,
    escapes: u32,
    anchor: Option<Anchor>,
    blocked: bool,
}

impl ProgressTracker {
    pub(crate) fn new(cfg: TrackerConfig, now: Instant) -> Self {
        Self {
            cfg,
            last_position: None,
            unchanged_since: now,
            escapes: 0,
            anchor: None,
            blocked: false,
        }
    }

    /// Teleport thresholds follow latency and cast time, so they are updated
    /// on every observation.
    pub(crate) fn set_stuck_threshold(&mut self, threshold: Duration) {
        self.cfg.stuck_threshold = threshold;
    }

    pub(crate) fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub(crate) fn escapes(&self) -> u32 {
        self.escapes
    }

    /// Feed one observation of the player position and the remaining distance
    /// to the destination.
    pub(crate) fn observe(&mut self, now: Instant, position: Position, distance: u32) -> Verdict {
        let Some(last) = self.last_position.replace(position) else {
            self.unchanged_since = now;
            self.reset_anchor(now, position, distance);
            return Verdict::Progressing;
        };

        if last == position {
            self.observe_stationary(now)
        } else {
            self.unchanged_since = now;
            self.observe_motion(now, position, distance)
        }
    }

    fn observe_stationary(&mut self, now: Instant) -> Verdict {
        let idle = now.saturating_duration_since(self.unchanged_since);
        // Escapes never start before the method-dependent threshold.
        let escape_after = self.cfg.escape_after.max(self.cfg.stuck_threshold);

        if idle >= escape_after {
            if self.escapes >= self.cfg.max_escapes {
                return Verdict::Stuck { elapsed: idle };
            }
            self.escapes += 1;
            self.unchanged_since = now;
            self.blocked = true;
            return Verdict::Escape;
        }

        if idle >= self.cfg.stuck_threshold {
            self.blocked = true;
        }
        self.current()
    }

    fn observe_motion(&mut self, now: Instant, position: Position, distance: u32) -> Verdict {
        let Some(anchor) = self.anchor else {
            self.reset_anchor(now, position, distance);
            return self.current();
        };

        let left_area = position.chebyshev(anchor.position) > self.cfg.round_trip_radius;
        if left_area || distance < anchor.best {
            self.reset_anchor(now, position, distance);
            self.blocked = false;
            return Verdict::Progressing;
        }

        let elapsed = now.saturating_duration_since(anchor.since);
        if elapsed >= self.cfg.round_trip_abort_after {
            return Verdict::RoundTrip { elapsed };
        }
        if elapsed >= self.cfg.round_trip_blocked_after {
            self.blocked = true;
        }
        self.current()
    }

    fn reset_anchor(&mut self, now: Instant, position: Position, distance: u32) {
        self.anchor = Some(Anchor {
            position,
            since: now,
            best: distance,
        });
    }

    fn current(&self) -> Verdict {
        if self.blocked {
            Verdict::Blocked
        } else {
            Verdict::Progressing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(100);

    fn config() -> TrackerConfig {
        TrackerConfig {
            stuck_threshold: Duration::from_millis(500),
            escape_after: Duration::from_secs(1),
            max_escapes: 2,
            round_trip_radius: 8,
            round_trip_blocked_after: Duration::from_secs(2),
            round_trip_abort_after: Duration::from_secs(4),
        }
    }

    /// Feed `distances` while alternating between two nearby tiles.
    fn oscillate(tracker: &mut ProgressTracker, start: Instant, distances: &[u32]) -> Vec<Verdict> {
        let a = Position::new(10, 10);
        let b = Position::new(12, 10);
        distances
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                let position = if i % 2 == 0 { a } else { b };
                tracker.observe(start + TICK * i as u32, position, d)
            })
            .collect()
    }

    #[test]
    fn test_non_decreasing_distance_round_trip_terminates() {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new(config(), start);
        let distances: Vec<u32> = (0..60).map(|i| 30 + (i % 3)).collect();

        let verdicts = oscillate(&mut tracker, start, &distances);

        let first = verdicts
            .iter()
            .position(|v| matches!(v, Verdict::RoundTrip { .. }))
            .expect("round trip detected");
        assert!(TICK * first as u32 >= config().round_trip_abort_after);
        assert!(verdicts[..first].contains(&Verdict::Blocked));
    }

    #[test]
    fn test_decreasing_distance_is_never_a_round_trip() {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new(config(), start);
        let distances: Vec<u32> = (0..60).rev().collect();

        let verdicts = oscillate(&mut tracker, start, &distances);

        assert!(verdicts.iter().all(|v| *v == Verdict::Progressing));
    }

    #[test]
    fn test_leaving_the_radius_resets_the_round_trip_timer() {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new(config(), start);

        for i in 0..30u32 {
            let position = Position::new(i as i32 * 10, 0);
            let verdict = tracker.observe(start + TICK * i, position, 50);
            assert_eq!(verdict, Verdict::Progressing);
        }
    }

    #[test]
    fn test_stationary_player_is_blocked_then_escapes_then_stuck() {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new(config(), start);
        let here = Position::new(5, 5);

        assert_eq!(tracker.observe(start, here, 20), Verdict::Progressing);
        assert_eq!(tracker.observe(start + TICK, here, 20), Verdict::Progressing);
        assert_eq!(
            tracker.observe(start + Duration::from_millis(600), here, 20),
            Verdict::Blocked
        );
        assert_eq!(
            tracker.observe(start + Duration::from_secs(1), here, 20),
            Verdict::Escape
        );
        assert_eq!(
            tracker.observe(start + Duration::from_secs(2), here, 20),
            Verdict::Escape
        );
        assert_eq!(tracker.escapes(), 2);
        assert!(matches!(
            tracker.observe(start + Duration::from_secs(3), here, 20),
            Verdict::Stuck { .. }
        ));
    }

    #[test]
    fn test_progress_clears_blocked_flag() {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new(config(), start);
        let here = Position::new(5, 5);

        tracker.observe(start, here, 20);
        tracker.observe(start + Duration::from_millis(600), here, 20);
        assert!(tracker.is_blocked());

        let verdict = tracker.observe(start + Duration::from_millis(700), Position::new(6, 5), 19);
        assert_eq!(verdict, Verdict::Progressing);
        assert!(!tracker.is_blocked());
    }

    #[test]
    fn test_stuck_threshold_can_be_raised() {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new(config(), start);
        tracker.set_stuck_threshold(Duration::from_millis(900));
        let here = Position::new(1, 1);

        tracker.observe(start, here, 20);
        assert_eq!(
            tracker.observe(start + Duration::from_millis(600), here, 20),
            Verdict::Progressing
        );
    }

    #[test]
    fn test_escape_waits_for_a_slower_method_threshold() {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new(
            TrackerConfig {
                escape_after: Duration::from_secs(3),
                ..config()
            },
            start,
        );
        tracker.set_stuck_threshold(Duration::from_millis(3950));
        let here = Position::new(1, 1);

        tracker.observe(start, here, 20);
        assert_eq!(
            tracker.observe(start + Duration::from_secs(3), here, 20),
            Verdict::Progressing
        );
        assert_eq!(tracker.escapes(), 0);
        assert_eq!(
            tracker.observe(start + Duration::from_secs(4), here, 20),
            Verdict::Escape
        );
    }
}
