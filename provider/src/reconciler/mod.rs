//! Lifecycle reconciliation for KubeVirt resources.
//!
//! One submodule per kind, each adding create/read/update/delete operations
//! and the kind-specific waits to [`Reconciler`]:
//! - `virtual_machine`: VirtualMachine
//! - `virtual_machine_instance`: VirtualMachineInstance
//! - `replica_set`: VirtualMachineInstanceReplicaSet
//! - `data_volume`: DataVolume (CDI)
//!
//! Every wait goes through the same two helpers below. A creation wait reads
//! the object, reduces its status to a [`CreationState`] label and polls until
//! it is `Succeeded`. A deletion wait polls until the object is gone. Waits
//! only ever read; a timed-out create leaves the object in place and a
//! timed-out delete is not re-issued.

pub mod data_volume;
pub mod replica_set;
pub mod virtual_machine;
pub mod virtual_machine_instance;

#[cfg(test)]
mod virtual_machine_instance_test;

use crate::config::ProviderConfig;
use crate::error::{ProviderError, WaitOperation};
use crate::identity::ResourceId;
use crate::kind::ResourceKind;
use condition_waiter::{PollInterval, Probe, WaitConfig, WaitError, wait_for_condition};
use kube::Resource;
use kubevirt_client::{ClientError, KubeVirtClientTrait};
use kubevirt_crds::{CreationState, CreationStatus};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Label reported for an object that still exists while waiting for its deletion.
pub(crate) const DELETING: &str = "Deleting";

/// Reconciles KubeVirt resources against the cluster.
pub struct Reconciler {
    pub(crate) client: Arc<dyn KubeVirtClientTrait>,
    pub(crate) config: ProviderConfig,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Create a reconciler over an injected client.
    pub fn new(client: Arc<dyn KubeVirtClientTrait>, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Base wait configuration: the given budget and the configured poll interval.
    pub(crate) fn wait_config(&self, timeout: Duration) -> WaitConfig {
        WaitConfig::new(timeout).poll_interval(PollInterval::Fixed(self.config.poll_interval))
    }

    /// Fill in the default namespace and compute the object's id.
    pub(crate) fn prepare<K>(&self, obj: &K) -> Result<(ResourceId, K), ProviderError>
    where
        K: Resource + Clone,
    {
        let id = ResourceId::of(obj, &self.config.namespace)?;
        let mut obj = obj.clone();
        obj.meta_mut().namespace = Some(id.namespace.clone());
        Ok((id, obj))
    }

    /// Poll `read` until the object's creation state is `Succeeded`.
    ///
    /// Not-found is treated as still being created until the timeout.
    pub(crate) async fn wait_until_created<K, F, Fut>(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        timeout: Duration,
        mut read: F,
    ) -> Result<K, ProviderError>
    where
        K: CreationStatus,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<K>, ClientError>>,
    {
        let config = self
            .wait_config(timeout)
            .pending([CreationState::CREATING, ""])
            .target([CreationState::SUCCEEDED]);

        let resolved = wait_for_condition(config, || {
            let fut = read();
            async move {
                Ok::<_, ClientError>(match fut.await? {
                    Some(obj) => {
                        let state = obj.creation_state();
                        debug!("{} {} is {}", kind, id, state);
                        Probe::found(state.label(), obj)
                    }
                    None => Probe::NotFound,
                })
            }
        })
        .await
        .map_err(|source| wait_failed(kind, id, WaitOperation::Create, source))?;

        resolved.into_value().ok_or_else(|| ProviderError::NotFound {
            kind,
            id: id.clone(),
        })
    }

    /// Poll `read` until the object no longer exists.
    pub(crate) async fn wait_until_deleted<K, F, Fut>(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        timeout: Duration,
        mut read: F,
    ) -> Result<(), ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<K>, ClientError>>,
    {
        let config = self.wait_config(timeout).pending([DELETING]);

        wait_for_condition(config, || {
            let fut = read();
            async move {
                Ok::<_, ClientError>(match fut.await? {
                    Some(_) => {
                        debug!("{} {} is still present", kind, id);
                        Probe::found(DELETING, ())
                    }
                    None => Probe::NotFound,
                })
            }
        })
        .await
        .map_err(|source| wait_failed(kind, id, WaitOperation::Delete, source))?;

        Ok(())
    }
}

pub(crate) fn wait_failed(
    kind: ResourceKind,
    id: &ResourceId,
    operation: WaitOperation,
    source: WaitError<ClientError>,
) -> ProviderError {
    ProviderError::Wait {
        kind,
        id: id.clone(),
        operation,
        source,
    }
}

pub(crate) fn not_found(kind: ResourceKind, id: &ResourceId) -> ProviderError {
    ProviderError::NotFound { kind, id: id.clone() }
}
