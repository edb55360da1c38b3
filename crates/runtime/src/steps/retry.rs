use std::time::Duration;

/// Bounded attempts with a delay that grows by a fixed step per attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub initial_delay: Duration,
    pub delay_step: Duration,
}

impl RetryPolicy {
    pub const fn new(attempts: u32, initial_delay: Duration, delay_step: Duration) -> Self {
        Self {
            attempts,
            initial_delay,
            delay_step,
        }
    }

    /// Delay to wait after the failed `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay + self.delay_step * attempt.saturating_sub(1)
    }

    pub fn attempts(&self) -> impl Iterator<Item = u32> {
        1..=self.attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_millis(150), Duration::from_millis(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_escalates_linearly() {
        let policy = RetryPolicy::new(3, Duration::from_millis(200), Duration::from_millis(300));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(500));
        assert_eq!(policy.delay_for(3), Duration::from_millis(800));
        assert_eq!(policy.delay_for(0), Duration::from_millis(200));
    }

    #[test]
    fn test_attempts_are_one_based() {
        let policy = RetryPolicy::new(3, Duration::ZERO, Duration::ZERO);
        assert_eq!(policy.attempts().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
