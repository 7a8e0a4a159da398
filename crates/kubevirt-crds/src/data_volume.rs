//! DataVolume (CDI)
//!
//! A PVC populated from a source (HTTP import, registry, clone, upload).

use crate::condition::ResourceCondition;
use crate::state::{CreationState, CreationStatus};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "cdi.kubevirt.io",
    version = "v1beta1",
    kind = "DataVolume",
    plural = "datavolumes",
    shortname = "dv",
    namespaced,
    status = "DataVolumeStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct DataVolumeSpec {
    /// Where the data comes from (http, registry, pvc, upload, blank)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<serde_json::Value>,

    /// Claim specification for the backing PVC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvc: Option<serde_json::Value>,

    /// Storage specification (alternative to `pvc`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<serde_json::Value>,

    /// "kubevirt" or "archive"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataVolumeStatus {
    /// Raw phase as reported by CDI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    /// Import/clone progress, e.g. "45.00%"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,

    /// Number of times the importer pod restarted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_count: Option<i32>,

    /// Observed conditions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ResourceCondition>,
}

/// Lifecycle phase of a DataVolume.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DataVolumePhase {
    /// No phase assigned yet
    #[default]
    Unset,
    /// Waiting for the claim to be created
    Pending,
    /// The backing claim is bound
    PVCBound,
    /// Import pod scheduled
    ImportScheduled,
    /// Import running
    ImportInProgress,
    /// Clone scheduled
    CloneScheduled,
    /// Clone running
    CloneInProgress,
    /// Snapshot for a smart clone being taken
    SnapshotForSmartCloneInProgress,
    /// Upload pod scheduled
    UploadScheduled,
    /// Ready to receive an upload
    UploadReady,
    /// Binding deferred until a pod uses the claim
    WaitForFirstConsumer,
    /// Population finished
    Succeeded,
    /// Population failed
    Failed,
    /// CDI reported `Unknown`
    Unknown,
    /// A phase this provider does not know about
    Other(String),
}

impl DataVolumePhase {
    /// Decode a raw phase string.
    #[must_use]
    pub fn parse(phase: &str) -> Self {
        match phase {
            "" => Self::Unset,
            "Pending" => Self::Pending,
            "PVCBound" => Self::PVCBound,
            "ImportScheduled" => Self::ImportScheduled,
            "ImportInProgress" => Self::ImportInProgress,
            "CloneScheduled" => Self::CloneScheduled,
            "CloneInProgress" => Self::CloneInProgress,
            "SnapshotForSmartCloneInProgress" => Self::SnapshotForSmartCloneInProgress,
            "UploadScheduled" => Self::UploadScheduled,
            "UploadReady" => Self::UploadReady,
            "WaitForFirstConsumer" => Self::WaitForFirstConsumer,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            "Unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    /// The phase as CDI spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unset => "",
            Self::Pending => "Pending",
            Self::PVCBound => "PVCBound",
            Self::ImportScheduled => "ImportScheduled",
            Self::ImportInProgress => "ImportInProgress",
            Self::CloneScheduled => "CloneScheduled",
            Self::CloneInProgress => "CloneInProgress",
            Self::SnapshotForSmartCloneInProgress => "SnapshotForSmartCloneInProgress",
            Self::UploadScheduled => "UploadScheduled",
            Self::UploadReady => "UploadReady",
            Self::WaitForFirstConsumer => "WaitForFirstConsumer",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
            Self::Other(phase) => phase,
        }
    }
}

impl fmt::Display for DataVolumePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DataVolume {
    /// Decoded phase; [`DataVolumePhase::Unset`] without a status.
    #[must_use]
    pub fn phase(&self) -> DataVolumePhase {
        self.status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .map(DataVolumePhase::parse)
            .unwrap_or_default()
    }

    /// Reported progress, if any.
    #[must_use]
    pub fn progress(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.progress.as_deref())
    }
}

impl CreationStatus for DataVolume {
    fn creation_state(&self) -> CreationState {
        match self.phase() {
            DataVolumePhase::Succeeded => CreationState::Succeeded,
            DataVolumePhase::Failed => CreationState::Failed,
            DataVolumePhase::Other(phase) => CreationState::Unrecognized(phase),
            _ => CreationState::Creating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dv_in(phase: &str) -> DataVolume {
        let mut dv = DataVolume::new("dv", DataVolumeSpec::default());
        dv.status = Some(DataVolumeStatus {
            phase: Some(phase.to_string()),
            progress: Some("45.00%".to_string()),
            ..Default::default()
        });
        dv
    }

    #[test]
    fn test_in_progress_phases_are_creating() {
        for phase in ["", "Pending", "PVCBound", "ImportScheduled", "ImportInProgress", "WaitForFirstConsumer"] {
            assert_eq!(dv_in(phase).creation_state(), CreationState::Creating, "{phase}");
        }
    }

    #[test]
    fn test_terminal_phases() {
        assert_eq!(dv_in("Succeeded").creation_state(), CreationState::Succeeded);
        assert_eq!(dv_in("Failed").creation_state(), CreationState::Failed);
    }

    #[test]
    fn test_unknown_phase_is_kept_verbatim() {
        let state = dv_in("ExpansionInProgress").creation_state();
        assert_eq!(state, CreationState::Unrecognized("ExpansionInProgress".to_string()));
        assert_eq!(state.label(), "ExpansionInProgress");
    }

    #[test]
    fn test_progress_is_exposed() {
        assert_eq!(dv_in("ImportInProgress").progress(), Some("45.00%"));
        assert_eq!(DataVolume::new("dv", DataVolumeSpec::default()).progress(), None);
    }
}
