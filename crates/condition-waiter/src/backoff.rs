//! # Poll interval schedules
//!
//! The waiter sleeps between probes according to a [`PollInterval`]. The
//! default is a fixed interval. A Fibonacci schedule is available for long
//! waits (VM boot, disk import) where hammering the API early buys nothing:
//! the pause grows more slowly than exponential backoff and is capped.
//!
//! Sequence for `min = 1s, max = 10s`: 1s, 1s, 2s, 3s, 5s, 8s, 10s, 10s, ...

use std::time::Duration;

/// How long to sleep between two probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollInterval {
    /// Same pause before every probe
    Fixed(Duration),
    /// Fibonacci growth from `min`, capped at `max`
    Fibonacci {
        /// First two pauses
        min: Duration,
        /// Upper bound for every pause
        max: Duration,
    },
}

impl Default for PollInterval {
    fn default() -> Self {
        Self::Fixed(Duration::from_secs(2))
    }
}

impl PollInterval {
    /// Start a fresh schedule for one wait.
    pub(crate) fn schedule(self) -> IntervalSchedule {
        match self {
            Self::Fixed(pause) => IntervalSchedule::Fixed(pause),
            Self::Fibonacci { min, max } => {
                IntervalSchedule::Fibonacci(FibonacciBackoff::new(min, max))
            }
        }
    }
}

/// Per-wait state of a [`PollInterval`].
#[derive(Debug, Clone)]
pub(crate) enum IntervalSchedule {
    Fixed(Duration),
    Fibonacci(FibonacciBackoff),
}

impl IntervalSchedule {
    pub(crate) fn next_interval(&mut self) -> Duration {
        match self {
            Self::Fixed(pause) => *pause,
            Self::Fibonacci(backoff) => backoff.next_backoff(),
        }
    }

    pub(crate) fn reset(&mut self) {
        if let Self::Fibonacci(backoff) = self {
            backoff.reset();
        }
    }
}

/// Fibonacci backoff calculator
///
/// Each pause is the sum of the previous two, starting at `min` and capped
/// at `max`.
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    /// Minimum pause (for reset)
    min: Duration,
    /// Previous pause
    prev: Duration,
    /// Current pause
    current: Duration,
    /// Maximum pause
    max: Duration,
}

impl FibonacciBackoff {
    /// Create a new Fibonacci backoff between `min` and `max`
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            prev: Duration::ZERO,
            current: min.min(max),
            max,
        }
    }

    /// Get the next pause and advance the sequence
    pub fn next_backoff(&mut self) -> Duration {
        let result = self.current;

        let next = self.prev.saturating_add(self.current);
        self.prev = self.current;
        self.current = next.min(self.max);

        result
    }

    /// Reset the backoff to the initial state
    pub fn reset(&mut self) {
        self.prev = Duration::ZERO;
        self.current = self.min.min(self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_fibonacci_backoff_sequence() {
        let mut backoff = FibonacciBackoff::new(secs(1), secs(10));

        assert_eq!(backoff.next_backoff(), secs(1));
        assert_eq!(backoff.next_backoff(), secs(1));
        assert_eq!(backoff.next_backoff(), secs(2));
        assert_eq!(backoff.next_backoff(), secs(3));
        assert_eq!(backoff.next_backoff(), secs(5));
        assert_eq!(backoff.next_backoff(), secs(8));
        assert_eq!(backoff.next_backoff(), secs(10)); // capped
        assert_eq!(backoff.next_backoff(), secs(10));
    }

    #[test]
    fn test_fibonacci_backoff_reset() {
        let mut backoff = FibonacciBackoff::new(secs(1), secs(10));

        assert_eq!(backoff.next_backoff(), secs(1));
        assert_eq!(backoff.next_backoff(), secs(1));
        assert_eq!(backoff.next_backoff(), secs(2));

        backoff.reset();

        assert_eq!(backoff.next_backoff(), secs(1));
        assert_eq!(backoff.next_backoff(), secs(1));
        assert_eq!(backoff.next_backoff(), secs(2));
    }

    #[test]
    fn test_fibonacci_min_above_max_is_capped() {
        let mut backoff = FibonacciBackoff::new(secs(30), secs(10));
        assert_eq!(backoff.next_backoff(), secs(10));
        assert_eq!(backoff.next_backoff(), secs(10));
    }

    #[test]
    fn test_fixed_schedule_never_changes() {
        let mut schedule = PollInterval::Fixed(secs(3)).schedule();
        for _ in 0..5 {
            assert_eq!(schedule.next_interval(), secs(3));
        }
        schedule.reset();
        assert_eq!(schedule.next_interval(), secs(3));
    }
}
