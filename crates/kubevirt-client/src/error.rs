//! KubeVirt client errors

use thiserror::Error;

/// Errors that can occur when talking to the cluster
#[derive(Debug, Error)]
pub enum ClientError {
    /// Kubernetes API or transport error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid request (e.g., object without namespace)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// API rejected the request
    #[error("API error: {0}")]
    Api(String),
}
