//! KubeVirt resource definitions
//!
//! Typed views of the KubeVirt (`kubevirt.io/v1`) and CDI
//! (`cdi.kubevirt.io/v1beta1`) resources managed by the provider.
//!
//! Specs are kept mostly opaque: the provider never interprets the VM
//! template or the disk source, it only forwards them. Statuses are typed,
//! and every kind implements [`CreationStatus`] so that its status can be
//! reduced to a single lifecycle label when waiting for it to become ready.

pub mod condition;
pub mod data_volume;
pub mod replica_set;
pub mod state;
pub mod virtual_machine;
pub mod virtual_machine_instance;

pub use condition::*;
pub use data_volume::*;
pub use replica_set::*;
pub use state::*;
pub use virtual_machine::*;
pub use virtual_machine_instance::*;
