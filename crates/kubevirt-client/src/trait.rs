//! KubeVirtClient trait for mocking
//!
//! This trait abstracts the cluster client so that reconcilers can be tested
//! against `MockKubeVirtClient`. Mutations return as soon as the API server
//! accepts the write; reads are single point-in-time snapshots.

use crate::error::ClientError;
use kubevirt_crds::{DataVolume, VirtualMachine, VirtualMachineInstance, VirtualMachineInstanceReplicaSet};

/// Trait for KubeVirt API client operations
///
/// `get_*` methods return `Ok(None)` when the object does not exist.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait KubeVirtClientTrait: Send + Sync {
    // VirtualMachine
    async fn create_virtual_machine(&self, vm: &VirtualMachine) -> Result<VirtualMachine, ClientError>;
    async fn get_virtual_machine(&self, namespace: &str, name: &str) -> Result<Option<VirtualMachine>, ClientError>;
    async fn update_virtual_machine(&self, namespace: &str, name: &str, patch: &serde_json::Value) -> Result<VirtualMachine, ClientError>;
    async fn delete_virtual_machine(&self, namespace: &str, name: &str) -> Result<(), ClientError>;

    // VirtualMachineInstance
    async fn create_virtual_machine_instance(&self, vmi: &VirtualMachineInstance) -> Result<VirtualMachineInstance, ClientError>;
    async fn get_virtual_machine_instance(&self, namespace: &str, name: &str) -> Result<Option<VirtualMachineInstance>, ClientError>;
    async fn update_virtual_machine_instance(&self, namespace: &str, name: &str, patch: &serde_json::Value) -> Result<VirtualMachineInstance, ClientError>;
    async fn delete_virtual_machine_instance(&self, namespace: &str, name: &str) -> Result<(), ClientError>;

    // VirtualMachineInstanceReplicaSet
    async fn create_replica_set(&self, rs: &VirtualMachineInstanceReplicaSet) -> Result<VirtualMachineInstanceReplicaSet, ClientError>;
    async fn get_replica_set(&self, namespace: &str, name: &str) -> Result<Option<VirtualMachineInstanceReplicaSet>, ClientError>;
    async fn update_replica_set(&self, namespace: &str, name: &str, patch: &serde_json::Value) -> Result<VirtualMachineInstanceReplicaSet, ClientError>;
    async fn delete_replica_set(&self, namespace: &str, name: &str) -> Result<(), ClientError>;

    // DataVolume
    async fn create_data_volume(&self, dv: &DataVolume) -> Result<DataVolume, ClientError>;
    async fn get_data_volume(&self, namespace: &str, name: &str) -> Result<Option<DataVolume>, ClientError>;
    async fn update_data_volume(&self, namespace: &str, name: &str, patch: &serde_json::Value) -> Result<DataVolume, ClientError>;
    async fn delete_data_volume(&self, namespace: &str, name: &str) -> Result<(), ClientError>;
}
