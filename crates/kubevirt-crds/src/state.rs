//! Lifecycle labels shared by all kinds.
//!
//! Each kind has its own status shape (a phase, a pair of booleans, a pair
//! of replica counters). Waiting for creation only needs to know whether the
//! object is still being created, has succeeded, or has failed, so each kind
//! reduces its status to a [`CreationState`].

use std::fmt;

/// Creation progress of an object, reduced from its kind-specific status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationState {
    /// Still converging towards ready
    Creating,
    /// Ready (or finished, for run-to-completion objects)
    Succeeded,
    /// Reported a terminal failure
    Failed,
    /// Reported a phase this provider does not know about
    Unrecognized(String),
}

impl CreationState {
    /// Label for [`CreationState::Creating`]
    pub const CREATING: &'static str = "Creating";
    /// Label for [`CreationState::Succeeded`]
    pub const SUCCEEDED: &'static str = "Succeeded";
    /// Label for [`CreationState::Failed`]
    pub const FAILED: &'static str = "Failed";

    /// Label used when waiting on this state.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Creating => Self::CREATING,
            Self::Succeeded => Self::SUCCEEDED,
            Self::Failed => Self::FAILED,
            Self::Unrecognized(phase) => phase,
        }
    }
}

impl fmt::Display for CreationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Objects whose status can be reduced to a [`CreationState`].
pub trait CreationStatus {
    /// Current creation state, decoded from the object's status.
    fn creation_state(&self) -> CreationState;
}
