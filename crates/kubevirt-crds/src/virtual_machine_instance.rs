//! VirtualMachineInstance
//!
//! A running VM. Created directly (ephemeral VMs), by a VirtualMachine, or by
//! a VirtualMachineInstanceReplicaSet.

use crate::condition::ResourceCondition;
use crate::state::{CreationState, CreationStatus};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "kubevirt.io",
    version = "v1",
    kind = "VirtualMachineInstance",
    plural = "virtualmachineinstances",
    shortname = "vmi",
    namespaced,
    status = "VirtualMachineInstanceStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineInstanceSpec {
    /// Domain specification (CPU, memory, devices)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<serde_json::Value>,

    /// Volumes backing the domain disks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<serde_json::Value>>,

    /// Networks backing the domain interfaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<serde_json::Value>>,

    /// Node selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,

    /// Grace period before the VMI is killed on deletion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_grace_period_seconds: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineInstanceStatus {
    /// Raw phase as reported by KubeVirt (may be empty right after creation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    /// Node the VMI is scheduled on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,

    /// Reason for the current phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Observed conditions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ResourceCondition>,
}

/// Lifecycle phase of a VirtualMachineInstance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VirtualMachineInstancePhase {
    /// No phase assigned yet
    #[default]
    Unset,
    /// Accepted, waiting for scheduling
    Pending,
    /// Being scheduled
    Scheduling,
    /// Scheduled on a node, not running yet
    Scheduled,
    /// Running
    Running,
    /// Terminated successfully
    Succeeded,
    /// Terminated with failure
    Failed,
    /// State could not be obtained
    Unknown,
    /// A phase this provider does not know about
    Other(String),
}

impl VirtualMachineInstancePhase {
    /// Decode a raw phase string.
    #[must_use]
    pub fn parse(phase: &str) -> Self {
        match phase {
            "" => Self::Unset,
            "Pending" => Self::Pending,
            "Scheduling" => Self::Scheduling,
            "Scheduled" => Self::Scheduled,
            "Running" => Self::Running,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            "Unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    /// The phase as KubeVirt spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unset => "",
            Self::Pending => "Pending",
            Self::Scheduling => "Scheduling",
            Self::Scheduled => "Scheduled",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
            Self::Other(phase) => phase,
        }
    }
}

impl fmt::Display for VirtualMachineInstancePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl VirtualMachineInstance {
    /// Decoded phase; [`VirtualMachineInstancePhase::Unset`] without a status.
    #[must_use]
    pub fn phase(&self) -> VirtualMachineInstancePhase {
        self.status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .map(VirtualMachineInstancePhase::parse)
            .unwrap_or_default()
    }
}

impl CreationStatus for VirtualMachineInstance {
    fn creation_state(&self) -> CreationState {
        match self.phase() {
            VirtualMachineInstancePhase::Running | VirtualMachineInstancePhase::Succeeded => {
                CreationState::Succeeded
            }
            VirtualMachineInstancePhase::Failed => CreationState::Failed,
            VirtualMachineInstancePhase::Other(phase) => CreationState::Unrecognized(phase),
            VirtualMachineInstancePhase::Unset
            | VirtualMachineInstancePhase::Pending
            | VirtualMachineInstancePhase::Scheduling
            | VirtualMachineInstancePhase::Scheduled
            | VirtualMachineInstancePhase::Unknown => CreationState::Creating,
        }
    }
}
