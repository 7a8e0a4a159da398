//! DataVolume reconciler

use super::{Reconciler, not_found};
use crate::error::ProviderError;
use crate::identity::ResourceId;
use crate::kind::ResourceKind;
use kubevirt_client::ClientError;
use kubevirt_crds::DataVolume;
use std::time::Duration;
use tracing::{debug, info};

const KIND: ResourceKind = ResourceKind::DataVolume;

impl Reconciler {
    /// Create a DataVolume and, unless waiting is disabled, wait until CDI
    /// reports `Succeeded`.
    pub async fn create_data_volume(&self, dv: &DataVolume) -> Result<(ResourceId, DataVolume), ProviderError> {
        let (id, dv) = self.prepare(dv)?;
        info!("Creating data volume {}", id);
        let created = self.client.create_data_volume(&dv).await?;
        info!("Submitted new data volume {}", id);

        if !self.config.wait {
            return Ok((id, created));
        }

        let dv = self
            .await_data_volume_created(&id, self.config.timeouts.create(KIND))
            .await?;
        Ok((id, dv))
    }

    /// Read a DataVolume; a missing object is an error.
    pub async fn read_data_volume(&self, id: &ResourceId) -> Result<DataVolume, ProviderError> {
        debug!("Reading data volume {}", id);
        self.client
            .get_data_volume(&id.namespace, &id.name)
            .await?
            .ok_or_else(|| not_found(KIND, id))
    }

    /// Apply a merge patch and read the object back, without waiting.
    pub async fn update_data_volume(&self, id: &ResourceId, patch: &serde_json::Value) -> Result<DataVolume, ProviderError> {
        info!("Updating data volume {}", id);
        self.client
            .update_data_volume(&id.namespace, &id.name, patch)
            .await?;
        info!("Submitted updated data volume {}", id);
        self.read_data_volume(id).await
    }

    /// Delete a DataVolume, waiting for it to disappear unless waiting is disabled.
    pub async fn delete_data_volume(&self, id: &ResourceId) -> Result<(), ProviderError> {
        info!("Deleting data volume {}", id);
        self.client
            .delete_data_volume(&id.namespace, &id.name)
            .await?;

        if !self.config.wait {
            return Ok(());
        }

        self.await_data_volume_deleted(id, self.config.timeouts.delete)
            .await?;
        info!("data volume {} deleted", id);
        Ok(())
    }

    /// Whether the DataVolume exists.
    pub async fn data_volume_exists(&self, id: &ResourceId) -> Result<bool, ProviderError> {
        Ok(self
            .client
            .get_data_volume(&id.namespace, &id.name)
            .await?
            .is_some())
    }

    /// Wait until population finishes. `Failed` and phases CDI did not
    /// document end the wait immediately.
    pub async fn await_data_volume_created(&self, id: &ResourceId, timeout: Duration) -> Result<DataVolume, ProviderError> {
        info!("data volume {} is being created", id);
        let dv = self
            .wait_until_created(KIND, id, timeout, || async move {
                let dv = self.client.get_data_volume(&id.namespace, &id.name).await?;
                if let Some(progress) = dv.as_ref().and_then(DataVolume::progress) {
                    debug!("data volume {} progress: {}", id, progress);
                }
                Ok::<_, ClientError>(dv)
            })
            .await?;
        info!("data volume {} was created", id);
        Ok(dv)
    }

    /// Wait until the DataVolume no longer exists.
    pub async fn await_data_volume_deleted(&self, id: &ResourceId, timeout: Duration) -> Result<(), ProviderError> {
        info!("Waiting for data volume {} to be removed", id);
        self.wait_until_deleted(KIND, id, timeout, || {
            self.client.get_data_volume(&id.namespace, &id.name)
        })
        .await
    }
}
