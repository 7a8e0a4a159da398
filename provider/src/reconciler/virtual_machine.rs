//! VirtualMachine reconciler

use super::{Reconciler, not_found};
use crate::error::ProviderError;
use crate::identity::ResourceId;
use crate::kind::ResourceKind;
use kubevirt_crds::VirtualMachine;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

const KIND: ResourceKind = ResourceKind::VirtualMachine;

impl Reconciler {
    /// Create a VirtualMachine and, unless waiting is disabled, wait until
    /// it reports both `created` and `ready`.
    pub async fn create_virtual_machine(&self, vm: &VirtualMachine) -> Result<(ResourceId, VirtualMachine), ProviderError> {
        let (id, vm) = self.prepare(vm)?;
        info!("Creating virtual machine {}", id);
        let created = self.client.create_virtual_machine(&vm).await?;
        info!("Submitted new virtual machine {}", id);

        if !self.config.wait {
            return Ok((id, created));
        }

        let vm = self
            .await_virtual_machine_created(&id, self.config.timeouts.create(KIND))
            .await?;
        Ok((id, vm))
    }

    /// Read a VirtualMachine; a missing object is an error.
    pub async fn read_virtual_machine(&self, id: &ResourceId) -> Result<VirtualMachine, ProviderError> {
        debug!("Reading virtual machine {}", id);
        self.client
            .get_virtual_machine(&id.namespace, &id.name)
            .await?
            .ok_or_else(|| not_found(KIND, id))
    }

    /// Apply a merge patch and read the object back.
    ///
    /// The change is not waited on: the returned object is whatever the API
    /// reports right after accepting the patch.
    pub async fn update_virtual_machine(&self, id: &ResourceId, patch: &serde_json::Value) -> Result<VirtualMachine, ProviderError> {
        info!("Updating virtual machine {}", id);
        self.client
            .update_virtual_machine(&id.namespace, &id.name, patch)
            .await?;
        info!("Submitted updated virtual machine {}", id);
        self.read_virtual_machine(id).await
    }

    /// Delete a VirtualMachine.
    ///
    /// When waiting, first waits for its instance (same name) to go away,
    /// then for the VirtualMachine itself. Both waits share the delete budget.
    pub async fn delete_virtual_machine(&self, id: &ResourceId) -> Result<(), ProviderError> {
        info!("Deleting virtual machine {}", id);
        self.client
            .delete_virtual_machine(&id.namespace, &id.name)
            .await?;

        if !self.config.wait {
            return Ok(());
        }

        let budget = self.config.timeouts.delete;
        let started = Instant::now();
        self.await_virtual_machine_instance_deleted(id, budget).await?;
        self.await_virtual_machine_deleted(id, budget.saturating_sub(started.elapsed()))
            .await?;
        info!("virtual machine {} deleted", id);
        Ok(())
    }

    /// Whether the VirtualMachine exists.
    pub async fn virtual_machine_exists(&self, id: &ResourceId) -> Result<bool, ProviderError> {
        Ok(self
            .client
            .get_virtual_machine(&id.namespace, &id.name)
            .await?
            .is_some())
    }

    /// Wait until the VirtualMachine's instance is created and ready.
    pub async fn await_virtual_machine_created(&self, id: &ResourceId, timeout: Duration) -> Result<VirtualMachine, ProviderError> {
        info!("virtual machine {} is being created", id);
        let vm = self
            .wait_until_created(KIND, id, timeout, || {
                self.client.get_virtual_machine(&id.namespace, &id.name)
            })
            .await?;
        info!("virtual machine {} was created", id);
        Ok(vm)
    }

    /// Wait until the VirtualMachine no longer exists.
    pub async fn await_virtual_machine_deleted(&self, id: &ResourceId, timeout: Duration) -> Result<(), ProviderError> {
        info!("Waiting for virtual machine {} to be removed", id);
        self.wait_until_deleted(KIND, id, timeout, || {
            self.client.get_virtual_machine(&id.namespace, &id.name)
        })
        .await
    }
}
