//! Mock KubeVirtClient for unit testing
//!
//! This module provides a mock implementation of `KubeVirtClientTrait` that
//! can be used in unit tests without a running cluster.
//!
//! Besides storing objects in memory, the mock can replay a scripted sequence
//! of reads for a given object (to simulate an object converging through
//! its phases) and counts every read and write so tests can assert that a
//! wait never mutated anything.

mod store;

pub use store::MockRead;

use crate::error::ClientError;
use crate::kubevirt_trait::KubeVirtClientTrait;
use kubevirt_crds::{DataVolume, VirtualMachine, VirtualMachineInstance, VirtualMachineInstanceReplicaSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use store::MockStore;

/// Mock KubeVirtClient for testing
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MockKubeVirtClient {
    virtual_machines: Arc<MockStore<VirtualMachine>>,
    virtual_machine_instances: Arc<MockStore<VirtualMachineInstance>>,
    replica_sets: Arc<MockStore<VirtualMachineInstanceReplicaSet>>,
    data_volumes: Arc<MockStore<DataVolume>>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    fail_next_write: Arc<Mutex<Option<String>>>,
}

impl MockKubeVirtClient {
    /// Create a new, empty mock client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get_*` calls so far
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of create/update/delete calls so far
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make the next create/update/delete fail with this message
    pub fn fail_next_write(&self, message: impl Into<String>) {
        *self.fail_next_write.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    /// Add a VirtualMachine to the mock store (for test setup, not counted)
    pub fn add_virtual_machine(&self, vm: VirtualMachine) {
        self.virtual_machines.seed(vm);
    }

    /// Add a VirtualMachineInstance to the mock store (for test setup, not counted)
    pub fn add_virtual_machine_instance(&self, vmi: VirtualMachineInstance) {
        self.virtual_machine_instances.seed(vmi);
    }

    /// Add a replica set to the mock store (for test setup, not counted)
    pub fn add_replica_set(&self, rs: VirtualMachineInstanceReplicaSet) {
        self.replica_sets.seed(rs);
    }

    /// Add a DataVolume to the mock store (for test setup, not counted)
    pub fn add_data_volume(&self, dv: DataVolume) {
        self.data_volumes.seed(dv);
    }

    /// Queue scripted reads for a VirtualMachine
    pub fn script_virtual_machine(&self, namespace: &str, name: &str, reads: Vec<MockRead<VirtualMachine>>) {
        self.virtual_machines.script(namespace, name, reads);
    }

    /// Queue scripted reads for a VirtualMachineInstance
    pub fn script_virtual_machine_instance(&self, namespace: &str, name: &str, reads: Vec<MockRead<VirtualMachineInstance>>) {
        self.virtual_machine_instances.script(namespace, name, reads);
    }

    /// Queue scripted reads for a replica set
    pub fn script_replica_set(&self, namespace: &str, name: &str, reads: Vec<MockRead<VirtualMachineInstanceReplicaSet>>) {
        self.replica_sets.script(namespace, name, reads);
    }

    /// Queue scripted reads for a DataVolume
    pub fn script_data_volume(&self, namespace: &str, name: &str, reads: Vec<MockRead<DataVolume>>) {
        self.data_volumes.script(namespace, name, reads);
    }

    /// Whether a VirtualMachine is stored (ignores scripted reads)
    #[must_use]
    pub fn has_virtual_machine(&self, namespace: &str, name: &str) -> bool {
        self.virtual_machines.contains(namespace, name)
    }

    /// Whether a DataVolume is stored (ignores scripted reads)
    #[must_use]
    pub fn has_data_volume(&self, namespace: &str, name: &str) -> bool {
        self.data_volumes.contains(namespace, name)
    }

    fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }

    fn record_write(&self) -> Result<(), ClientError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        match self.fail_next_write.lock().unwrap_or_else(PoisonError::into_inner).take() {
            Some(message) => Err(ClientError::Api(message)),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl KubeVirtClientTrait for MockKubeVirtClient {
    async fn create_virtual_machine(&self, vm: &VirtualMachine) -> Result<VirtualMachine, ClientError> {
        self.record_write()?;
        self.virtual_machines.create(vm)
    }

    async fn get_virtual_machine(&self, namespace: &str, name: &str) -> Result<Option<VirtualMachine>, ClientError> {
        self.record_read();
        self.virtual_machines.get(namespace, name)
    }

    async fn update_virtual_machine(&self, namespace: &str, name: &str, patch: &serde_json::Value) -> Result<VirtualMachine, ClientError> {
        self.record_write()?;
        self.virtual_machines.patch(namespace, name, patch)
    }

    async fn delete_virtual_machine(&self, namespace: &str, name: &str) -> Result<(), ClientError> {
        self.record_write()?;
        self.virtual_machines.delete(namespace, name)
    }

    async fn create_virtual_machine_instance(&self, vmi: &VirtualMachineInstance) -> Result<VirtualMachineInstance, ClientError> {
        self.record_write()?;
        self.virtual_machine_instances.create(vmi)
    }

    async fn get_virtual_machine_instance(&self, namespace: &str, name: &str) -> Result<Option<VirtualMachineInstance>, ClientError> {
        self.record_read();
        self.virtual_machine_instances.get(namespace, name)
    }

    async fn update_virtual_machine_instance(&self, namespace: &str, name: &str, patch: &serde_json::Value) -> Result<VirtualMachineInstance, ClientError> {
        self.record_write()?;
        self.virtual_machine_instances.patch(namespace, name, patch)
    }

    async fn delete_virtual_machine_instance(&self, namespace: &str, name: &str) -> Result<(), ClientError> {
        self.record_write()?;
        self.virtual_machine_instances.delete(namespace, name)
    }

    async fn create_replica_set(&self, rs: &VirtualMachineInstanceReplicaSet) -> Result<VirtualMachineInstanceReplicaSet, ClientError> {
        self.record_write()?;
        self.replica_sets.create(rs)
    }

    async fn get_replica_set(&self, namespace: &str, name: &str) -> Result<Option<VirtualMachineInstanceReplicaSet>, ClientError> {
        self.record_read();
        self.replica_sets.get(namespace, name)
    }

    async fn update_replica_set(&self, namespace: &str, name: &str, patch: &serde_json::Value) -> Result<VirtualMachineInstanceReplicaSet, ClientError> {
        self.record_write()?;
        self.replica_sets.patch(namespace, name, patch)
    }

    async fn delete_replica_set(&self, namespace: &str, name: &str) -> Result<(), ClientError> {
        self.record_write()?;
        self.replica_sets.delete(namespace, name)
    }

    async fn create_data_volume(&self, dv: &DataVolume) -> Result<DataVolume, ClientError> {
        self.record_write()?;
        self.data_volumes.create(dv)
    }

    async fn get_data_volume(&self, namespace: &str, name: &str) -> Result<Option<DataVolume>, ClientError> {
        self.record_read();
        self.data_volumes.get(namespace, name)
    }

    async fn update_data_volume(&self, namespace: &str, name: &str, patch: &serde_json::Value) -> Result<DataVolume, ClientError> {
        self.record_write()?;
        self.data_volumes.patch(namespace, name, patch)
    }

    async fn delete_data_volume(&self, namespace: &str, name: &str) -> Result<(), ClientError> {
        self.record_write()?;
        self.data_volumes.delete(namespace, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubevirt_crds::{DataVolumeSpec, DataVolumeStatus};

    fn data_volume(name: &str, phase: &str) -> DataVolume {
        let mut dv = DataVolume::new(name, DataVolumeSpec::default());
        dv.metadata.namespace = Some("default".to_string());
        dv.status = Some(DataVolumeStatus {
            phase: Some(phase.to_string()),
            ..Default::default()
        });
        dv
    }

    #[tokio::test]
    async fn test_scripted_reads_take_precedence_then_fall_back_to_store() {
        let mock = MockKubeVirtClient::new();
        mock.add_data_volume(data_volume("dv1", "Succeeded"));
        mock.script_data_volume(
            "default",
            "dv1",
            vec![MockRead::NotFound, MockRead::Object(data_volume("dv1", "ImportInProgress"))],
        );

        assert!(mock.get_data_volume("default", "dv1").await.unwrap().is_none());
        let second = mock.get_data_volume("default", "dv1").await.unwrap().unwrap();
        assert_eq!(second.status.unwrap().phase.as_deref(), Some("ImportInProgress"));
        let third = mock.get_data_volume("default", "dv1").await.unwrap().unwrap();
        assert_eq!(third.status.unwrap().phase.as_deref(), Some("Succeeded"));
        assert_eq!(mock.read_count(), 3);
        assert_eq!(mock.write_count(), 0);
    }

    #[tokio::test]
    async fn test_create_patch_delete_are_counted() {
        let mock = MockKubeVirtClient::new();
        let dv = data_volume("dv1", "Pending");

        mock.create_data_volume(&dv).await.unwrap();
        assert!(mock.create_data_volume(&dv).await.is_err(), "duplicate create must fail");

        let patched = mock
            .update_data_volume("default", "dv1", &serde_json::json!({"metadata": {"labels": {"app": "db"}}}))
            .await
            .unwrap();
        assert_eq!(patched.metadata.labels.unwrap().get("app").map(String::as_str), Some("db"));

        mock.delete_data_volume("default", "dv1").await.unwrap();
        assert!(!mock.has_data_volume("default", "dv1"));
        assert!(mock.delete_data_volume("default", "dv1").await.is_err());
        assert_eq!(mock.write_count(), 5);
    }

    #[tokio::test]
    async fn test_scripted_error_and_injected_write_failure() {
        let mock = MockKubeVirtClient::new();
        mock.script_data_volume("default", "dv1", vec![MockRead::Error("connection reset".to_string())]);
        let err = mock.get_data_volume("default", "dv1").await.unwrap_err();
        assert!(matches!(err, ClientError::Api(ref m) if m == "connection reset"));

        mock.fail_next_write("quota exceeded");
        assert!(mock.create_data_volume(&data_volume("dv1", "")).await.is_err());
        assert!(mock.create_data_volume(&data_volume("dv1", "")).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_requires_namespace() {
        let mock = MockKubeVirtClient::new();
        let dv = DataVolume::new("dv1", DataVolumeSpec::default());
        let err = mock.create_data_volume(&dv).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }
}
