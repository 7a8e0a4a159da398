//! Resource kinds managed by the provider.

use crate::error::ProviderError;
use std::fmt;
use std::str::FromStr;

/// The four kinds the provider knows how to reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `kubevirt.io/v1` VirtualMachine
    VirtualMachine,
    /// `kubevirt.io/v1` VirtualMachineInstance
    VirtualMachineInstance,
    /// `kubevirt.io/v1` VirtualMachineInstanceReplicaSet
    VirtualMachineInstanceReplicaSet,
    /// `cdi.kubevirt.io/v1beta1` DataVolume
    DataVolume,
}

impl ResourceKind {
    /// API kind name, as found in a manifest's `kind` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VirtualMachine => "VirtualMachine",
            Self::VirtualMachineInstance => "VirtualMachineInstance",
            Self::VirtualMachineInstanceReplicaSet => "VirtualMachineInstanceReplicaSet",
            Self::DataVolume => "DataVolume",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ProviderError;

    /// Accepts the API kind name (any case) or the usual short names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "virtualmachine" | "vm" => Ok(Self::VirtualMachine),
            "virtualmachineinstance" | "vmi" => Ok(Self::VirtualMachineInstance),
            "virtualmachineinstancereplicaset" | "vmirs" => Ok(Self::VirtualMachineInstanceReplicaSet),
            "datavolume" | "dv" => Ok(Self::DataVolume),
            _ => Err(ProviderError::Manifest(format!("unsupported kind '{s}'"))),
        }
    }
}
