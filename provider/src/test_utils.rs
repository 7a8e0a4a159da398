//! Test utilities for unit testing reconcilers
//!
//! This module provides helpers for creating test objects and a reconciler
//! backed by `MockKubeVirtClient`.

use crate::config::{ProviderConfig, Timeouts};
use crate::reconciler::Reconciler;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kubevirt_client::MockKubeVirtClient;
use kubevirt_crds::*;
use std::sync::Arc;
use std::time::Duration;

fn metadata(name: &str, namespace: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    }
}

/// Helper to create a test VirtualMachine with the given readiness flags
pub fn create_test_virtual_machine(name: &str, namespace: &str, created: bool, ready: bool) -> VirtualMachine {
    VirtualMachine {
        metadata: metadata(name, namespace),
        spec: VirtualMachineSpec {
            running: Some(true),
            template: Some(serde_json::json!({
                "spec": {"domain": {"devices": {}, "resources": {"requests": {"memory": "64M"}}}}
            })),
            ..Default::default()
        },
        status: Some(VirtualMachineStatus {
            created,
            ready,
            ..Default::default()
        }),
    }
}

/// Helper to create a test VirtualMachineInstance in the given phase
pub fn create_test_virtual_machine_instance(name: &str, namespace: &str, phase: &str) -> VirtualMachineInstance {
    VirtualMachineInstance {
        metadata: metadata(name, namespace),
        spec: VirtualMachineInstanceSpec::default(),
        status: Some(VirtualMachineInstanceStatus {
            phase: Some(phase.to_string()),
            ..Default::default()
        }),
    }
}

/// Helper to create a test replica set with desired/ready counts
pub fn create_test_replica_set(
    name: &str,
    namespace: &str,
    desired: Option<i32>,
    ready: Option<i32>,
) -> VirtualMachineInstanceReplicaSet {
    VirtualMachineInstanceReplicaSet {
        metadata: metadata(name, namespace),
        spec: VirtualMachineInstanceReplicaSetSpec {
            replicas: desired,
            ..Default::default()
        },
        status: Some(VirtualMachineInstanceReplicaSetStatus {
            ready_replicas: ready,
            ..Default::default()
        }),
    }
}

/// Helper to create a test DataVolume in the given phase
pub fn create_test_data_volume(name: &str, namespace: &str, phase: &str) -> DataVolume {
    DataVolume {
        metadata: metadata(name, namespace),
        spec: DataVolumeSpec {
            source: Some(serde_json::json!({"http": {"url": "https://example.com/disk.img"}})),
            ..Default::default()
        },
        status: Some(DataVolumeStatus {
            phase: Some(phase.to_string()),
            ..Default::default()
        }),
    }
}

/// Configuration with a 2s poll interval and short, distinct budgets
pub fn test_config() -> ProviderConfig {
    ProviderConfig {
        namespace: "default".to_string(),
        wait: true,
        poll_interval: Duration::from_secs(2),
        timeouts: Timeouts {
            virtual_machine_create: Duration::from_secs(60),
            virtual_machine_instance_create: Duration::from_secs(60),
            replica_set_create: Duration::from_secs(60),
            data_volume_create: Duration::from_secs(10),
            delete: Duration::from_secs(10),
        },
    }
}

/// Helper to create a reconciler sharing state with `mock`
pub fn create_test_reconciler(mock: &MockKubeVirtClient, config: ProviderConfig) -> Reconciler {
    Reconciler::new(Arc::new(mock.clone()), config)
}
