//! Wait errors

use std::time::Duration;
use thiserror::Error;

/// Reasons a wait can fail.
///
/// `E` is the error type of the probe, surfaced unchanged through
/// [`WaitError::Probe`].
#[derive(Debug, Error)]
pub enum WaitError<E> {
    /// The target condition was not reached within the allotted budget
    #[error(
        "timeout while waiting for state to become {target:?} (last state: '{}', timeout: {timeout:?})",
        .last_state.as_deref().unwrap_or("<none>")
    )]
    Timeout {
        /// Overall wait budget
        timeout: Duration,
        /// Target labels that were never reached
        target: Vec<String>,
        /// Last label observed before the deadline, if any
        last_state: Option<String>,
    },

    /// The probe itself failed (transport, auth, malformed response)
    #[error("probe failed: {0}")]
    Probe(#[source] E),

    /// The probe returned a label that is neither pending nor a target
    #[error("unexpected state '{state}', wanted target {target:?}")]
    UnexpectedState {
        /// The unrecognized label
        state: String,
        /// Labels that would have kept the wait going
        pending: Vec<String>,
        /// Labels that would have ended the wait
        target: Vec<String>,
    },

    /// The resource stayed absent for more consecutive probes than tolerated
    #[error("couldn't find resource ({checks} retries)")]
    NotFound {
        /// Consecutive not-found probes observed
        checks: u32,
    },
}

impl<E> WaitError<E> {
    /// Last state label observed before the failure, if any.
    pub fn last_state(&self) -> Option<&str> {
        match self {
            Self::Timeout { last_state, .. } => last_state.as_deref(),
            Self::UnexpectedState { state, .. } => Some(state),
            Self::Probe(_) | Self::NotFound { .. } => None,
        }
    }

    /// Whether the wait ran out of time.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_without_state() {
        let err: WaitError<std::io::Error> = WaitError::Timeout {
            timeout: Duration::from_secs(5),
            target: vec!["Succeeded".to_string()],
            last_state: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("<none>"), "{msg}");
        assert!(msg.contains("Succeeded"), "{msg}");
        assert!(err.is_timeout());
        assert_eq!(err.last_state(), None);
    }

    #[test]
    fn test_unexpected_state_exposes_label() {
        let err: WaitError<std::io::Error> = WaitError::UnexpectedState {
            state: "Failed".to_string(),
            pending: vec!["Creating".to_string()],
            target: vec!["Succeeded".to_string()],
        };
        assert_eq!(err.last_state(), Some("Failed"));
        assert!(!err.is_timeout());
        assert_eq!(
            err.to_string(),
            "unexpected state 'Failed', wanted target [\"Succeeded\"]"
        );
    }
}
