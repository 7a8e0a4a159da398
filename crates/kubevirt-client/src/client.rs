//! KubeVirt API client
//!
//! Implements [`KubeVirtClientTrait`] on top of `kube::Api`. Every kind goes
//! through the same four generic helpers; only the Rust type differs.

use crate::error::ClientError;
use crate::kubevirt_trait::KubeVirtClientTrait;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, DeleteParams, Patch, PatchParams, PostParams};
use kube::{Client, Resource, ResourceExt};
use kubevirt_crds::{DataVolume, VirtualMachine, VirtualMachineInstance, VirtualMachineInstanceReplicaSet};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::debug;

/// KubeVirt API client
#[derive(Clone)]
pub struct KubeVirtClient {
    client: Client,
}

impl KubeVirtClient {
    /// Wrap an existing Kubernetes client
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the local kubeconfig or the in-cluster environment
    pub async fn try_default() -> Result<Self, ClientError> {
        let client = Client::try_default().await?;
        Ok(Self::new(client))
    }

    fn api<K>(&self, namespace: &str) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), namespace)
    }

    async fn create_resource<K>(&self, obj: &K) -> Result<K, ClientError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Serialize + Debug,
        K::DynamicType: Default,
    {
        let namespace = obj.namespace().ok_or_else(|| {
            ClientError::InvalidRequest(format!("{} {} has no namespace", K::kind(&K::DynamicType::default()), obj.name_any()))
        })?;
        debug!("Creating {} {}/{}", K::kind(&K::DynamicType::default()), namespace, obj.name_any());
        let created = self.api::<K>(&namespace).create(&PostParams::default(), obj).await?;
        Ok(created)
    }

    async fn get_resource<K>(&self, namespace: &str, name: &str) -> Result<Option<K>, ClientError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        debug!("Reading {} {}/{}", K::kind(&K::DynamicType::default()), namespace, name);
        Ok(self.api::<K>(namespace).get_opt(name).await?)
    }

    async fn patch_resource<K>(&self, namespace: &str, name: &str, patch: &serde_json::Value) -> Result<K, ClientError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        debug!("Patching {} {}/{}", K::kind(&K::DynamicType::default()), namespace, name);
        let patched = self
            .api::<K>(namespace)
            .patch(name, &PatchParams::default(), &Patch::Merge(patch))
            .await?;
        Ok(patched)
    }

    async fn delete_resource<K>(&self, namespace: &str, name: &str) -> Result<(), ClientError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        debug!("Deleting {} {}/{}", K::kind(&K::DynamicType::default()), namespace, name);
        self.api::<K>(namespace).delete(name, &DeleteParams::default()).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl KubeVirtClientTrait for KubeVirtClient {
    async fn create_virtual_machine(&self, vm: &VirtualMachine) -> Result<VirtualMachine, ClientError> {
        self.create_resource(vm).await
    }

    async fn get_virtual_machine(&self, namespace: &str, name: &str) -> Result<Option<VirtualMachine>, ClientError> {
        self.get_resource(namespace, name).await
    }

    async fn update_virtual_machine(&self, namespace: &str, name: &str, patch: &serde_json::Value) -> Result<VirtualMachine, ClientError> {
        self.patch_resource(namespace, name, patch).await
    }

    async fn delete_virtual_machine(&self, namespace: &str, name: &str) -> Result<(), ClientError> {
        self.delete_resource::<VirtualMachine>(namespace, name).await
    }

    async fn create_virtual_machine_instance(&self, vmi: &VirtualMachineInstance) -> Result<VirtualMachineInstance, ClientError> {
        self.create_resource(vmi).await
    }

    async fn get_virtual_machine_instance(&self, namespace: &str, name: &str) -> Result<Option<VirtualMachineInstance>, ClientError> {
        self.get_resource(namespace, name).await
    }

    async fn update_virtual_machine_instance(&self, namespace: &str, name: &str, patch: &serde_json::Value) -> Result<VirtualMachineInstance, ClientError> {
        self.patch_resource(namespace, name, patch).await
    }

    async fn delete_virtual_machine_instance(&self, namespace: &str, name: &str) -> Result<(), ClientError> {
        self.delete_resource::<VirtualMachineInstance>(namespace, name).await
    }

    async fn create_replica_set(&self, rs: &VirtualMachineInstanceReplicaSet) -> Result<VirtualMachineInstanceReplicaSet, ClientError> {
        self.create_resource(rs).await
    }

    async fn get_replica_set(&self, namespace: &str, name: &str) -> Result<Option<VirtualMachineInstanceReplicaSet>, ClientError> {
        self.get_resource(namespace, name).await
    }

    async fn update_replica_set(&self, namespace: &str, name: &str, patch: &serde_json::Value) -> Result<VirtualMachineInstanceReplicaSet, ClientError> {
        self.patch_resource(namespace, name, patch).await
    }

    async fn delete_replica_set(&self, namespace: &str, name: &str) -> Result<(), ClientError> {
        self.delete_resource::<VirtualMachineInstanceReplicaSet>(namespace, name).await
    }

    async fn create_data_volume(&self, dv: &DataVolume) -> Result<DataVolume, ClientError> {
        self.create_resource(dv).await
    }

    async fn get_data_volume(&self, namespace: &str, name: &str) -> Result<Option<DataVolume>, ClientError> {
        self.get_resource(namespace, name).await
    }

    async fn update_data_volume(&self, namespace: &str, name: &str, patch: &serde_json::Value) -> Result<DataVolume, ClientError> {
        self.patch_resource(namespace, name, patch).await
    }

    async fn delete_data_volume(&self, namespace: &str, name: &str) -> Result<(), ClientError> {
        self.delete_resource::<DataVolume>(namespace, name).await
    }
}
