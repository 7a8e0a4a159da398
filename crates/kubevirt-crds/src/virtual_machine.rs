//! VirtualMachine
//!
//! A stateful VM: KubeVirt keeps a VirtualMachineInstance with the same name
//! running (or not) according to `running` / `runStrategy`.

use crate::condition::ResourceCondition;
use crate::state::{CreationState, CreationStatus};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "kubevirt.io",
    version = "v1",
    kind = "VirtualMachine",
    plural = "virtualmachines",
    shortname = "vm",
    namespaced,
    status = "VirtualMachineStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineSpec {
    /// Whether the VM should be running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,

    /// Run strategy (Always, RerunOnFailure, Manual, Halted); exclusive with `running`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_strategy: Option<String>,

    /// VirtualMachineInstance template (metadata + spec)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<serde_json::Value>,

    /// DataVolumes created and owned by this VM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_volume_templates: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineStatus {
    /// The VMI for this VM has been created
    #[serde(default)]
    pub created: bool,

    /// The VMI for this VM is ready
    #[serde(default)]
    pub ready: bool,

    /// Human-readable summary (e.g. "Starting", "Running", "Stopped")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printable_status: Option<String>,

    /// Observed conditions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ResourceCondition>,
}

/// The two booleans a VirtualMachine reports about its instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualMachineReadiness {
    /// Instance created
    pub created: bool,
    /// Instance ready
    pub ready: bool,
}

impl VirtualMachine {
    /// Created/ready flags; both false when no status has been reported.
    #[must_use]
    pub fn readiness(&self) -> VirtualMachineReadiness {
        self.status
            .as_ref()
            .map(|s| VirtualMachineReadiness {
                created: s.created,
                ready: s.ready,
            })
            .unwrap_or_default()
    }
}

impl CreationStatus for VirtualMachine {
    fn creation_state(&self) -> CreationState {
        match self.readiness() {
            VirtualMachineReadiness {
                created: true,
                ready: true,
            } => CreationState::Succeeded,
            _ => CreationState::Creating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vm_with(created: bool, ready: bool) -> VirtualMachine {
        let mut vm = VirtualMachine::new("vm", VirtualMachineSpec::default());
        vm.status = Some(VirtualMachineStatus {
            created,
            ready,
            ..Default::default()
        });
        vm
    }

    #[test]
    fn test_no_status_is_creating() {
        let vm = VirtualMachine::new("vm", VirtualMachineSpec::default());
        assert_eq!(vm.readiness(), VirtualMachineReadiness::default());
        assert_eq!(vm.creation_state(), CreationState::Creating);
    }

    #[test]
    fn test_created_and_ready_required() {
        assert_eq!(vm_with(false, false).creation_state(), CreationState::Creating);
        assert_eq!(vm_with(true, false).creation_state(), CreationState::Creating);
        assert_eq!(vm_with(false, true).creation_state(), CreationState::Creating);
        assert_eq!(vm_with(true, true).creation_state(), CreationState::Succeeded);
    }

    #[test]
    fn test_status_decodes_from_yaml() {
        let vm: VirtualMachine = serde_yaml::from_str(
            r"
apiVersion: kubevirt.io/v1
kind: VirtualMachine
metadata:
  name: testvm
  namespace: default
spec:
  running: true
status:
  created: true
  ready: true
  printableStatus: Running
",
        )
        .unwrap();

        assert_eq!(vm.spec.running, Some(true));
        assert_eq!(vm.creation_state(), CreationState::Succeeded);
        assert_eq!(
            vm.status.and_then(|s| s.printable_status).as_deref(),
            Some("Running")
        );
    }
}
