//! VirtualMachineInstance reconciler

use super::{Reconciler, not_found, wait_failed};
use crate::error::{ProviderError, WaitOperation};
use crate::identity::ResourceId;
use crate::kind::ResourceKind;
use condition_waiter::{Probe, wait_for_condition};
use kubevirt_client::ClientError;
use kubevirt_crds::{VirtualMachineInstance, VirtualMachineInstancePhase};
use std::time::Duration;
use tracing::{debug, info};

const KIND: ResourceKind = ResourceKind::VirtualMachineInstance;

/// Pause before the first probe of a "running" wait
const START_DELAY: Duration = Duration::from_secs(5);

/// Consecutive not-found reads tolerated by a "running" wait
const START_NOT_FOUND_CHECKS: u32 = 3;

impl Reconciler {
    /// Create a VirtualMachineInstance and, unless waiting is disabled, wait
    /// until it is `Running` (or has already `Succeeded`).
    pub async fn create_virtual_machine_instance(
        &self,
        vmi: &VirtualMachineInstance,
    ) -> Result<(ResourceId, VirtualMachineInstance), ProviderError> {
        let (id, vmi) = self.prepare(vmi)?;
        info!("Creating virtual machine instance {}", id);
        let created = self.client.create_virtual_machine_instance(&vmi).await?;
        info!("Submitted new virtual machine instance {}", id);

        if !self.config.wait {
            return Ok((id, created));
        }

        let vmi = self
            .await_virtual_machine_instance_created(&id, self.config.timeouts.create(KIND))
            .await?;
        Ok((id, vmi))
    }

    /// Read a VirtualMachineInstance; a missing object is an error.
    pub async fn read_virtual_machine_instance(&self, id: &ResourceId) -> Result<VirtualMachineInstance, ProviderError> {
        debug!("Reading virtual machine instance {}", id);
        self.client
            .get_virtual_machine_instance(&id.namespace, &id.name)
            .await?
            .ok_or_else(|| not_found(KIND, id))
    }

    /// Apply a merge patch and read the object back, without waiting.
    pub async fn update_virtual_machine_instance(
        &self,
        id: &ResourceId,
        patch: &serde_json::Value,
    ) -> Result<VirtualMachineInstance, ProviderError> {
        info!("Updating virtual machine instance {}", id);
        self.client
            .update_virtual_machine_instance(&id.namespace, &id.name, patch)
            .await?;
        self.read_virtual_machine_instance(id).await
    }

    /// Delete a VirtualMachineInstance, waiting for it to disappear unless
    /// waiting is disabled.
    pub async fn delete_virtual_machine_instance(&self, id: &ResourceId) -> Result<(), ProviderError> {
        info!("Deleting virtual machine instance {}", id);
        self.client
            .delete_virtual_machine_instance(&id.namespace, &id.name)
            .await?;

        if !self.config.wait {
            return Ok(());
        }

        self.await_virtual_machine_instance_deleted(id, self.config.timeouts.delete)
            .await?;
        info!("virtual machine instance {} deleted", id);
        Ok(())
    }

    /// Whether the VirtualMachineInstance exists.
    pub async fn virtual_machine_instance_exists(&self, id: &ResourceId) -> Result<bool, ProviderError> {
        Ok(self
            .client
            .get_virtual_machine_instance(&id.namespace, &id.name)
            .await?
            .is_some())
    }

    /// Wait until the instance is `Running` or `Succeeded`; `Failed` and
    /// unknown phases end the wait immediately.
    pub async fn await_virtual_machine_instance_created(
        &self,
        id: &ResourceId,
        timeout: Duration,
    ) -> Result<VirtualMachineInstance, ProviderError> {
        info!("virtual machine instance {} is being created", id);
        let vmi = self
            .wait_until_created(KIND, id, timeout, || {
                self.client.get_virtual_machine_instance(&id.namespace, &id.name)
            })
            .await?;
        info!("virtual machine instance {} was created", id);
        Ok(vmi)
    }

    /// Wait until the instance no longer exists.
    pub async fn await_virtual_machine_instance_deleted(&self, id: &ResourceId, timeout: Duration) -> Result<(), ProviderError> {
        info!("Waiting for virtual machine instance {} to be removed", id);
        self.wait_until_deleted(KIND, id, timeout, || {
            self.client.get_virtual_machine_instance(&id.namespace, &id.name)
        })
        .await
    }

    /// Wait for an instance that was just started to report `Running`.
    ///
    /// Probing begins after a short delay, and the instance may be missing
    /// for at most three consecutive reads before the wait gives up. Any
    /// phase other than `Pending`, `Scheduling`, `Scheduled` or unset fails
    /// the wait.
    pub async fn await_virtual_machine_instance_running(
        &self,
        id: &ResourceId,
        timeout: Duration,
    ) -> Result<VirtualMachineInstance, ProviderError> {
        info!("Waiting for virtual machine instance {} to start", id);
        let config = self
            .wait_config(timeout)
            .pending([
                VirtualMachineInstancePhase::Pending.as_str(),
                VirtualMachineInstancePhase::Scheduling.as_str(),
                VirtualMachineInstancePhase::Scheduled.as_str(),
                VirtualMachineInstancePhase::Unset.as_str(),
            ])
            .target([VirtualMachineInstancePhase::Running.as_str()])
            .delay(START_DELAY)
            .not_found_checks(START_NOT_FOUND_CHECKS);

        let resolved = wait_for_condition(config, || async move {
            Ok::<_, ClientError>(
                match self.client.get_virtual_machine_instance(&id.namespace, &id.name).await? {
                    Some(vmi) => {
                        let phase = vmi.phase();
                        debug!("virtual machine instance {} is in phase '{}'", id, phase);
                        Probe::found(phase.as_str(), vmi)
                    }
                    None => Probe::NotFound,
                },
            )
        })
        .await
        .map_err(|source| wait_failed(KIND, id, WaitOperation::Start, source))?;

        let vmi = resolved.into_value().ok_or_else(|| not_found(KIND, id))?;
        info!("virtual machine instance {} is running", id);
        Ok(vmi)
    }
}
