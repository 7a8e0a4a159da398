//! The polling loop.
//!
//! One call to [`StateWaiter::wait`] drives a single, strictly sequential
//! probe loop:
//!
//! ```text
//! NotStarted --(delay)--> Probing --target / absent--> Succeeded
//!                           |  ^
//!                pending /  |  |
//!       tolerated absence   +--+
//!                           |
//!                           +--timeout / probe error / unexpected state--> Failed
//! ```
//!
//! The waiter holds no state between calls; concurrent waits on different
//! resources are independent.

use crate::backoff::PollInterval;
use crate::error::WaitError;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep_until, timeout_at};
use tracing::{debug, info, trace, warn};

/// Result of one probe invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    /// The resource exists and its state reduces to `state`
    Found {
        /// Normalized state label
        state: String,
        /// Observed resource, returned to the caller on success
        value: T,
    },
    /// The resource does not exist (yet, or anymore)
    NotFound,
}

impl<T> Probe<T> {
    /// Shorthand for [`Probe::Found`].
    pub fn found(state: impl Into<String>, value: T) -> Self {
        Self::Found {
            state: state.into(),
            value,
        }
    }
}

/// How a successful wait ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<T> {
    /// A target label was observed; carries the last observed value
    Reached(T),
    /// The resource was absent and no target labels were configured
    Absent,
}

impl<T> Resolved<T> {
    /// The observed value, if the wait ended on a target label.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Reached(value) => Some(value),
            Self::Absent => None,
        }
    }
}

/// Lifecycle of a single wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// Waiting out the initial delay
    NotStarted,
    /// Probing the resource
    Probing,
    /// Target reached (terminal)
    Succeeded,
    /// Gave up (terminal)
    Failed,
}

impl fmt::Display for WaitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotStarted => "NotStarted",
            Self::Probing => "Probing",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
        };
        f.write_str(s)
    }
}

/// Parameters of one wait.
///
/// An empty `target` set means the wait only succeeds once the resource is
/// gone (deletion). Labels are compared verbatim: a transient empty label
/// must be listed in `pending` explicitly.
#[derive(Debug, Clone)]
pub struct WaitConfig {
    pending: Vec<String>,
    target: Vec<String>,
    timeout: Duration,
    delay: Duration,
    poll_interval: PollInterval,
    not_found_checks: Option<u32>,
}

impl WaitConfig {
    /// New configuration with the given overall budget, no labels, no
    /// initial delay, the default poll interval and unbounded not-found
    /// tolerance.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            pending: Vec::new(),
            target: Vec::new(),
            timeout,
            delay: Duration::ZERO,
            poll_interval: PollInterval::default(),
            not_found_checks: None,
        }
    }

    /// Labels that keep the wait going.
    #[must_use]
    pub fn pending<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Labels that end the wait successfully.
    #[must_use]
    pub fn target<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Time to wait before the first probe.
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Pause schedule between probes.
    #[must_use]
    pub fn poll_interval(mut self, poll_interval: PollInterval) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Consecutive not-found probes tolerated before failing. Ignored when
    /// `target` is empty, since absence is then the success condition.
    #[must_use]
    pub fn not_found_checks(mut self, checks: u32) -> Self {
        self.not_found_checks = Some(checks);
        self
    }

}

/// Drives one probe loop per [`StateWaiter::wait`] call.
#[derive(Debug, Clone)]
pub struct StateWaiter {
    config: WaitConfig,
}

impl StateWaiter {
    /// Creates a waiter for the given configuration.
    #[must_use]
    pub fn new(config: WaitConfig) -> Self {
        Self { config }
    }

    /// Poll `probe` until the target condition holds.
    ///
    /// Probe errors are returned immediately without retrying. The deadline
    /// is checked before every probe and also bounds each probe call, so no
    /// probe runs past `timeout`.
    pub async fn wait<T, E, F, Fut>(&self, mut probe: F) -> Result<Resolved<T>, WaitError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Probe<T>, E>>,
    {
        let cfg = &self.config;
        let started = Instant::now();
        let deadline = started
            .checked_add(cfg.timeout)
            .unwrap_or_else(|| started + Duration::from_secs(60 * 60 * 24 * 365));
        let mut intervals = cfg.poll_interval.schedule();
        let mut last_state: Option<String> = None;
        let mut not_found: u32 = 0;
        let mut probes: u32 = 0;

        trace!(state = %WaitState::NotStarted, "Waiting {:?} before first probe", cfg.delay);
        if !cfg.delay.is_zero() {
            sleep_until(capped(started, cfg.delay, deadline)).await;
        }

        loop {
            if Instant::now() >= deadline {
                return Err(self.timed_out(last_state, probes));
            }

            probes += 1;
            trace!(state = %WaitState::Probing, "Probe #{}", probes);
            let Ok(result) = timeout_at(deadline, probe()).await else {
                warn!("Probe #{} was still running at the deadline", probes);
                return Err(self.timed_out(last_state, probes));
            };

            match result {
                Err(e) => {
                    warn!(state = %WaitState::Failed, "Probe #{} failed, giving up", probes);
                    return Err(WaitError::Probe(e));
                }
                Ok(Probe::NotFound) => {
                    if cfg.target.is_empty() {
                        info!(state = %WaitState::Succeeded, "Resource is gone after {} probe(s)", probes);
                        return Ok(Resolved::Absent);
                    }
                    not_found += 1;
                    if let Some(limit) = cfg.not_found_checks {
                        if not_found > limit {
                            warn!(state = %WaitState::Failed, "Resource still not found after {} checks", not_found);
                            return Err(WaitError::NotFound { checks: not_found });
                        }
                    }
                    debug!("Resource not found yet ({} consecutive)", not_found);
                }
                Ok(Probe::Found { state, value }) => {
                    not_found = 0;
                    if cfg.target.contains(&state) {
                        info!(state = %WaitState::Succeeded, "Reached '{}' after {} probe(s)", state, probes);
                        return Ok(Resolved::Reached(value));
                    }
                    if !cfg.pending.contains(&state) {
                        warn!(state = %WaitState::Failed, "Unexpected state '{}'", state);
                        return Err(WaitError::UnexpectedState {
                            state,
                            pending: cfg.pending.clone(),
                            target: cfg.target.clone(),
                        });
                    }
                    debug!("Still '{}' (probe #{})", state, probes);
                    if last_state.as_deref() != Some(state.as_str()) {
                        intervals.reset();
                    }
                    last_state = Some(state);
                }
            }

            let pause = intervals.next_interval();
            sleep_until(capped(Instant::now(), pause, deadline)).await;
        }
    }

    fn timed_out<E>(&self, last_state: Option<String>, probes: u32) -> WaitError<E> {
        warn!(
            state = %WaitState::Failed,
            "Timed out after {:?} and {} probe(s), last state: {:?}",
            self.config.timeout, probes, last_state
        );
        WaitError::Timeout {
            timeout: self.config.timeout,
            target: self.config.target.clone(),
            last_state,
        }
    }
}

/// `from + pause`, never later than `deadline`.
fn capped(from: Instant, pause: Duration, deadline: Instant) -> Instant {
    from.checked_add(pause).map_or(deadline, |t| t.min(deadline))
}

/// Free-function form of [`StateWaiter::wait`].
pub async fn wait_for_condition<T, E, F, Fut>(
    config: WaitConfig,
    probe: F,
) -> Result<Resolved<T>, WaitError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Probe<T>, E>>,
{
    StateWaiter::new(config).wait(probe).await
}
