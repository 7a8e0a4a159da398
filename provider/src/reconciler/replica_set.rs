//! VirtualMachineInstanceReplicaSet reconciler

use super::{Reconciler, not_found};
use crate::error::ProviderError;
use crate::identity::ResourceId;
use crate::kind::ResourceKind;
use kubevirt_crds::VirtualMachineInstanceReplicaSet;
use std::time::Duration;
use tracing::{debug, info};

const KIND: ResourceKind = ResourceKind::VirtualMachineInstanceReplicaSet;

impl Reconciler {
    /// Create a replica set and, unless waiting is disabled, wait until all
    /// desired replicas are ready.
    pub async fn create_replica_set(
        &self,
        rs: &VirtualMachineInstanceReplicaSet,
    ) -> Result<(ResourceId, VirtualMachineInstanceReplicaSet), ProviderError> {
        let (id, rs) = self.prepare(rs)?;
        info!("Creating virtual machine instance replica set {}", id);
        let created = self.client.create_replica_set(&rs).await?;
        info!("Submitted new virtual machine instance replica set {}", id);

        if !self.config.wait {
            return Ok((id, created));
        }

        let rs = self
            .await_replica_set_created(&id, self.config.timeouts.create(KIND))
            .await?;
        Ok((id, rs))
    }

    /// Read a replica set; a missing object is an error.
    pub async fn read_replica_set(&self, id: &ResourceId) -> Result<VirtualMachineInstanceReplicaSet, ProviderError> {
        debug!("Reading virtual machine instance replica set {}", id);
        self.client
            .get_replica_set(&id.namespace, &id.name)
            .await?
            .ok_or_else(|| not_found(KIND, id))
    }

    /// Apply a merge patch (e.g. a new replica count) and read the object back.
    ///
    /// Scaling is not waited on.
    pub async fn update_replica_set(
        &self,
        id: &ResourceId,
        patch: &serde_json::Value,
    ) -> Result<VirtualMachineInstanceReplicaSet, ProviderError> {
        info!("Updating virtual machine instance replica set {}", id);
        self.client
            .update_replica_set(&id.namespace, &id.name, patch)
            .await?;
        self.read_replica_set(id).await
    }

    /// Delete a replica set, waiting for it to disappear unless waiting is disabled.
    pub async fn delete_replica_set(&self, id: &ResourceId) -> Result<(), ProviderError> {
        info!("Deleting virtual machine instance replica set {}", id);
        self.client
            .delete_replica_set(&id.namespace, &id.name)
            .await?;

        if self.config.wait {
            self.await_replica_set_deleted(id, self.config.timeouts.delete)
                .await?;
            info!("virtual machine instance replica set {} deleted", id);
        }
        Ok(())
    }

    /// Whether the replica set exists.
    pub async fn replica_set_exists(&self, id: &ResourceId) -> Result<bool, ProviderError> {
        Ok(self
            .client
            .get_replica_set(&id.namespace, &id.name)
            .await?
            .is_some())
    }

    /// Wait until the ready replica count equals the desired count.
    pub async fn await_replica_set_created(
        &self,
        id: &ResourceId,
        timeout: Duration,
    ) -> Result<VirtualMachineInstanceReplicaSet, ProviderError> {
        info!("virtual machine instance replica set {} is being created", id);
        let rs = self
            .wait_until_created(KIND, id, timeout, || {
                self.client.get_replica_set(&id.namespace, &id.name)
            })
            .await?;
        let counts = rs.replica_counts();
        info!(
            "virtual machine instance replica set {} was created ({}/{} ready)",
            id, counts.ready, counts.desired
        );
        Ok(rs)
    }

    /// Wait until the replica set no longer exists.
    pub async fn await_replica_set_deleted(&self, id: &ResourceId, timeout: Duration) -> Result<(), ProviderError> {
        self.wait_until_deleted(KIND, id, timeout, || {
            self.client.get_replica_set(&id.namespace, &id.name)
        })
        .await
    }
}
