//! Provider error types.
//!
//! Client errors and wait failures are wrapped with the kind and id of the
//! object involved, so a failed apply names what it was waiting for.

use crate::identity::ResourceId;
use crate::kind::ResourceKind;
use condition_waiter::WaitError;
use kubevirt_client::ClientError;
use std::fmt;
use thiserror::Error;

/// Which lifecycle transition a wait was tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOperation {
    /// Waiting for a newly created object to become ready
    Create,
    /// Waiting for a deleted object to disappear
    Delete,
    /// Waiting for an instance to reach `Running`
    Start,
}

impl fmt::Display for WaitOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "creation",
            Self::Delete => "deletion",
            Self::Start => "start",
        })
    }
}

/// Errors that can occur in the provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// KubeVirt API client error
    #[error("KubeVirt client error: {0}")]
    Client(#[from] ClientError),

    /// A wait for a lifecycle transition failed
    #[error("error waiting for {kind} ({id}) {operation}: {source}")]
    Wait {
        /// Kind of the object
        kind: ResourceKind,
        /// Object being waited on
        id: ResourceId,
        /// Transition being tracked
        operation: WaitOperation,
        /// Why the wait stopped
        source: WaitError<ClientError>,
    },

    /// Object does not exist
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of the object
        kind: ResourceKind,
        /// Missing object
        id: ResourceId,
    },

    /// Malformed `namespace/name` id
    #[error("Invalid resource id: {0}")]
    InvalidId(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Manifest is missing fields or has an unsupported kind
    #[error("Invalid manifest: {0}")]
    Manifest(String),

    /// Manifest is not valid YAML or does not match the kind's schema
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Reading a manifest or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Whether this is a wait that ran out of time.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Wait { source, .. } if source.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_wait_error_names_kind_id_operation_and_last_state() {
        let err = ProviderError::Wait {
            kind: ResourceKind::DataVolume,
            id: ResourceId::new("default", "disk"),
            operation: WaitOperation::Create,
            source: WaitError::Timeout {
                timeout: Duration::from_secs(300),
                target: vec!["Succeeded".to_string()],
                last_state: Some("Creating".to_string()),
            },
        };
        let msg = err.to_string();
        assert!(msg.starts_with("error waiting for DataVolume (default/disk) creation"), "{msg}");
        assert!(msg.contains("Creating"), "{msg}");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_not_found_is_not_a_timeout() {
        let err = ProviderError::NotFound {
            kind: ResourceKind::VirtualMachine,
            id: ResourceId::new("default", "vm"),
        };
        assert_eq!(err.to_string(), "VirtualMachine default/vm not found");
        assert!(!err.is_timeout());
    }
}
