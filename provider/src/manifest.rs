//! YAML manifests for the `create` command.

use crate::error::ProviderError;
use crate::kind::ResourceKind;
use kube::Resource;
use kubevirt_crds::{DataVolume, VirtualMachine, VirtualMachineInstance, VirtualMachineInstanceReplicaSet};
use serde::de::DeserializeOwned;

/// A single object decoded from a manifest, dispatched on its `kind`.
#[derive(Debug, Clone)]
pub enum Manifest {
    /// VirtualMachine
    VirtualMachine(VirtualMachine),
    /// VirtualMachineInstance
    VirtualMachineInstance(VirtualMachineInstance),
    /// VirtualMachineInstanceReplicaSet
    VirtualMachineInstanceReplicaSet(VirtualMachineInstanceReplicaSet),
    /// DataVolume
    DataVolume(DataVolume),
}

impl Manifest {
    /// Parse one YAML document.
    ///
    /// The `kind` must name a supported kind exactly; `apiVersion`, when
    /// present, must match that kind's group and version.
    pub fn parse(yaml: &str) -> Result<Self, ProviderError> {
        let doc: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let kind = doc
            .get("kind")
            .and_then(serde_yaml::Value::as_str)
            .ok_or_else(|| ProviderError::Manifest("missing 'kind'".to_string()))?;

        match kind {
            "VirtualMachine" => decode(doc).map(Self::VirtualMachine),
            "VirtualMachineInstance" => decode(doc).map(Self::VirtualMachineInstance),
            "VirtualMachineInstanceReplicaSet" => decode(doc).map(Self::VirtualMachineInstanceReplicaSet),
            "DataVolume" => decode(doc).map(Self::DataVolume),
            other => Err(ProviderError::Manifest(format!("unsupported kind '{other}'"))),
        }
    }

    /// Kind of the decoded object.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::VirtualMachine(_) => ResourceKind::VirtualMachine,
            Self::VirtualMachineInstance(_) => ResourceKind::VirtualMachineInstance,
            Self::VirtualMachineInstanceReplicaSet(_) => ResourceKind::VirtualMachineInstanceReplicaSet,
            Self::DataVolume(_) => ResourceKind::DataVolume,
        }
    }
}

fn decode<K>(doc: serde_yaml::Value) -> Result<K, ProviderError>
where
    K: Resource<DynamicType = ()> + DeserializeOwned,
{
    let expected = K::api_version(&());
    if let Some(api_version) = doc.get("apiVersion").and_then(serde_yaml::Value::as_str) {
        if api_version != expected {
            return Err(ProviderError::Manifest(format!(
                "{} must use apiVersion {expected}, got {api_version}",
                K::kind(&())
            )));
        }
    }
    Ok(serde_yaml::from_value(doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::ResourceExt;

    #[test]
    fn test_parse_data_volume() {
        let manifest = Manifest::parse(
            r#"
apiVersion: cdi.kubevirt.io/v1beta1
kind: DataVolume
metadata:
  name: alpine
  namespace: images
spec:
  source:
    http:
      url: "https://example.com/alpine.qcow2"
  storage:
    resources:
      requests:
        storage: 1Gi
"#,
        )
        .unwrap();

        assert_eq!(manifest.kind(), ResourceKind::DataVolume);
        let Manifest::DataVolume(dv) = manifest else {
            panic!("expected a DataVolume");
        };
        assert_eq!(dv.name_any(), "alpine");
        assert_eq!(dv.namespace().as_deref(), Some("images"));
        assert!(dv.spec.source.is_some());
    }

    #[test]
    fn test_parse_virtual_machine_without_api_version() {
        let manifest = Manifest::parse(
            "
kind: VirtualMachine
metadata:
  name: testvm
spec:
  running: false
",
        )
        .unwrap();
        assert_eq!(manifest.kind(), ResourceKind::VirtualMachine);
    }

    #[test]
    fn test_rejects_missing_or_unknown_kind() {
        assert!(matches!(Manifest::parse("metadata: {name: x}"), Err(ProviderError::Manifest(_))));
        assert!(matches!(Manifest::parse("kind: Pod\nmetadata: {name: x}"), Err(ProviderError::Manifest(_))));
    }

    #[test]
    fn test_rejects_wrong_api_version() {
        let err = Manifest::parse("apiVersion: cdi.kubevirt.io/v1alpha1\nkind: DataVolume\nmetadata: {name: x}\nspec: {}")
            .unwrap_err();
        assert!(err.to_string().contains("cdi.kubevirt.io/v1beta1"), "{err}");
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(Manifest::parse("kind: [unclosed"), Err(ProviderError::Yaml(_))));
    }
}
