//! KubeVirt Provider
//!
//! Lifecycle reconciliation for KubeVirt and CDI resources:
//! - VirtualMachine: waits until the VM's instance is created and ready
//! - VirtualMachineInstance: waits until the instance is running
//! - VirtualMachineInstanceReplicaSet: waits until all replicas are ready
//! - DataVolume: waits until the import, clone or upload has finished
//!
//! After every accepted create or delete, the [`Reconciler`] polls the
//! object's status through `condition-waiter` until it settles, fails or
//! runs out of time. Updates are applied without waiting.

pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod kind;
pub mod manifest;
pub mod reconciler;

#[cfg(test)]
mod test_utils;

pub use config::{ProviderConfig, Timeouts};
pub use error::{ProviderError, WaitOperation};
pub use identity::ResourceId;
pub use kind::ResourceKind;
pub use manifest::Manifest;
pub use reconciler::Reconciler;
