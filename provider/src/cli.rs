//! Command-line harness around [`Reconciler`].

use crate::error::ProviderError;
use crate::identity::ResourceId;
use crate::kind::ResourceKind;
use crate::manifest::Manifest;
use crate::reconciler::Reconciler;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Create, read and delete KubeVirt resources, waiting for them to settle
#[derive(Parser, Debug)]
#[command(name = "kubevirt-provider", version, about, long_about = None)]
pub struct Cli {
    /// Return as soon as the API accepts a change
    #[arg(long, global = true)]
    pub no_wait: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the object described by a YAML manifest
    Create {
        /// Path to the manifest
        manifest: PathBuf,
    },
    /// Print an object as YAML
    Read {
        /// vm, vmi, vmirs, dv or the full kind name
        kind: ResourceKind,
        /// namespace/name
        id: ResourceId,
    },
    /// Delete an object
    Delete {
        /// vm, vmi, vmirs, dv or the full kind name
        kind: ResourceKind,
        /// namespace/name
        id: ResourceId,
    },
    /// Wait for a VirtualMachineInstance to report Running
    WaitRunning {
        /// namespace/name
        id: ResourceId,
        /// Overall budget in seconds
        #[arg(long, default_value_t = 300)]
        timeout_secs: u64,
    },
}

impl Command {
    /// Run the command, writing results to `out`.
    pub async fn execute<W: Write>(self, reconciler: &Reconciler, out: &mut W) -> Result<(), ProviderError> {
        match self {
            Self::Create { manifest } => {
                let yaml = tokio::fs::read_to_string(&manifest).await?;
                create(Manifest::parse(&yaml)?, reconciler, out).await
            }
            Self::Read { kind, id } => match kind {
                ResourceKind::VirtualMachine => print(out, &reconciler.read_virtual_machine(&id).await?),
                ResourceKind::VirtualMachineInstance => {
                    print(out, &reconciler.read_virtual_machine_instance(&id).await?)
                }
                ResourceKind::VirtualMachineInstanceReplicaSet => print(out, &reconciler.read_replica_set(&id).await?),
                ResourceKind::DataVolume => print(out, &reconciler.read_data_volume(&id).await?),
            },
            Self::Delete { kind, id } => {
                match kind {
                    ResourceKind::VirtualMachine => reconciler.delete_virtual_machine(&id).await?,
                    ResourceKind::VirtualMachineInstance => reconciler.delete_virtual_machine_instance(&id).await?,
                    ResourceKind::VirtualMachineInstanceReplicaSet => reconciler.delete_replica_set(&id).await?,
                    ResourceKind::DataVolume => reconciler.delete_data_volume(&id).await?,
                }
                line(out, &format!("deleted {kind} {id}"))
            }
            Self::WaitRunning { id, timeout_secs } => {
                let vmi = reconciler
                    .await_virtual_machine_instance_running(&id, Duration::from_secs(timeout_secs))
                    .await?;
                print(out, &vmi)
            }
        }
    }
}

/// Create the object held by `manifest` and print its id and final state.
pub async fn create<W: Write>(manifest: Manifest, reconciler: &Reconciler, out: &mut W) -> Result<(), ProviderError> {
    let kind = manifest.kind();
    match manifest {
        Manifest::VirtualMachine(vm) => {
            let (id, vm) = reconciler.create_virtual_machine(&vm).await?;
            line(out, &format!("created {kind} {id}"))?;
            print(out, &vm)
        }
        Manifest::VirtualMachineInstance(vmi) => {
            let (id, vmi) = reconciler.create_virtual_machine_instance(&vmi).await?;
            line(out, &format!("created {kind} {id}"))?;
            print(out, &vmi)
        }
        Manifest::VirtualMachineInstanceReplicaSet(rs) => {
            let (id, rs) = reconciler.create_replica_set(&rs).await?;
            line(out, &format!("created {kind} {id}"))?;
            print(out, &rs)
        }
        Manifest::DataVolume(dv) => {
            let (id, dv) = reconciler.create_data_volume(&dv).await?;
            line(out, &format!("created {kind} {id}"))?;
            print(out, &dv)
        }
    }
}

fn print<W: Write, T: Serialize>(out: &mut W, obj: &T) -> Result<(), ProviderError> {
    let yaml = serde_yaml::to_string(obj)?;
    out.write_all(yaml.as_bytes())?;
    Ok(())
}

fn line<W: Write>(out: &mut W, text: &str) -> Result<(), ProviderError> {
    writeln!(out, "{text}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use kubevirt_client::MockKubeVirtClient;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["kubevirt-provider", "--no-wait", "delete", "dv", "images/alpine"]).unwrap();
        assert!(cli.no_wait);
        match cli.command {
            Command::Delete { kind, id } => {
                assert_eq!(kind, ResourceKind::DataVolume);
                assert_eq!(id, ResourceId::new("images", "alpine"));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["kubevirt-provider", "wait-running", "default/testvmi"]).unwrap();
        assert!(matches!(cli.command, Command::WaitRunning { timeout_secs: 300, .. }));
    }

    #[test]
    fn test_rejects_malformed_id() {
        assert!(Cli::try_parse_from(["kubevirt-provider", "read", "vm", "testvm"]).is_err());
        assert!(Cli::try_parse_from(["kubevirt-provider", "read", "pod", "default/testvm"]).is_err());
    }

    #[tokio::test]
    async fn test_read_prints_yaml() {
        let mock = MockKubeVirtClient::new();
        mock.add_data_volume(create_test_data_volume("disk", "default", "Succeeded"));
        let reconciler = create_test_reconciler(&mock, test_config());
        let mut out = Vec::new();

        Command::Read {
            kind: ResourceKind::DataVolume,
            id: ResourceId::new("default", "disk"),
        }
        .execute(&reconciler, &mut out)
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("kind: DataVolume"), "{text}");
        assert!(text.contains("phase: Succeeded"), "{text}");
    }

    #[tokio::test]
    async fn test_create_from_manifest_without_wait() {
        let mock = MockKubeVirtClient::new();
        let mut config = test_config();
        config.wait = false;
        let reconciler = create_test_reconciler(&mock, config);
        let manifest = Manifest::parse("kind: VirtualMachine\nmetadata:\n  name: testvm\nspec:\n  running: true\n").unwrap();
        let mut out = Vec::new();

        create(manifest, &reconciler, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("created VirtualMachine default/testvm\n"), "{text}");
        assert!(mock.has_virtual_machine("default", "testvm"));
    }
}
