//! VirtualMachineInstanceReplicaSet
//!
//! Keeps a number of identical VirtualMachineInstances running.

use crate::condition::ResourceCondition;
use crate::state::{CreationState, CreationStatus};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "kubevirt.io",
    version = "v1",
    kind = "VirtualMachineInstanceReplicaSet",
    plural = "virtualmachineinstancereplicasets",
    shortname = "vmirs",
    namespaced,
    status = "VirtualMachineInstanceReplicaSetStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineInstanceReplicaSetSpec {
    /// Desired number of instances (KubeVirt defaults this to 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Label selector for the instances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<serde_json::Value>,

    /// Instance template (metadata + spec)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<serde_json::Value>,

    /// Stop reconciling replicas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineInstanceReplicaSetStatus {
    /// Number of instances that exist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Number of instances that are ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_replicas: Option<i32>,

    /// Selector in string form, for scale subresources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<String>,

    /// Observed conditions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ResourceCondition>,
}

/// Desired vs. ready instance counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicaCounts {
    /// From the spec, defaulting to 1
    pub desired: i32,
    /// From the status, defaulting to 0
    pub ready: i32,
}

impl VirtualMachineInstanceReplicaSet {
    /// Desired and ready counts.
    #[must_use]
    pub fn replica_counts(&self) -> ReplicaCounts {
        ReplicaCounts {
            desired: self.spec.replicas.unwrap_or(1),
            ready: self
                .status
                .as_ref()
                .and_then(|s| s.ready_replicas)
                .unwrap_or(0),
        }
    }
}

impl CreationStatus for VirtualMachineInstanceReplicaSet {
    fn creation_state(&self) -> CreationState {
        let counts = self.replica_counts();
        if counts.desired == counts.ready {
            CreationState::Succeeded
        } else {
            CreationState::Creating
        }
    }
}
