//! Provider configuration.
//!
//! Loaded from environment variables; every value has a default.
//!
//! | Variable | Default |
//! |---|---|
//! | `KUBEVIRT_NAMESPACE` | `default` |
//! | `KUBEVIRT_WAIT` | `true` |
//! | `KUBEVIRT_POLL_INTERVAL_SECS` | `2` |
//! | `KUBEVIRT_VM_CREATE_TIMEOUT_SECS` | `1200` |
//! | `KUBEVIRT_VMI_CREATE_TIMEOUT_SECS` | `2400` |
//! | `KUBEVIRT_VMIRS_CREATE_TIMEOUT_SECS` | `2400` |
//! | `KUBEVIRT_DV_CREATE_TIMEOUT_SECS` | `300` |
//! | `KUBEVIRT_DELETE_TIMEOUT_SECS` | `300` |

use crate::error::ProviderError;
use crate::kind::ResourceKind;
use std::env;
use std::time::Duration;

/// Per-kind wait budgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeouts {
    /// VirtualMachine create
    pub virtual_machine_create: Duration,
    /// VirtualMachineInstance create
    pub virtual_machine_instance_create: Duration,
    /// VirtualMachineInstanceReplicaSet create
    pub replica_set_create: Duration,
    /// DataVolume create
    pub data_volume_create: Duration,
    /// Any delete
    pub delete: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            virtual_machine_create: Duration::from_secs(20 * 60),
            virtual_machine_instance_create: Duration::from_secs(40 * 60),
            replica_set_create: Duration::from_secs(40 * 60),
            data_volume_create: Duration::from_secs(5 * 60),
            delete: Duration::from_secs(5 * 60),
        }
    }
}

impl Timeouts {
    /// Create budget for a kind.
    #[must_use]
    pub fn create(&self, kind: ResourceKind) -> Duration {
        match kind {
            ResourceKind::VirtualMachine => self.virtual_machine_create,
            ResourceKind::VirtualMachineInstance => self.virtual_machine_instance_create,
            ResourceKind::VirtualMachineInstanceReplicaSet => self.replica_set_create,
            ResourceKind::DataVolume => self.data_volume_create,
        }
    }
}

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Namespace for objects that do not set one
    pub namespace: String,
    /// Wait for creates and deletes to settle
    pub wait: bool,
    /// Pause between two status reads
    pub poll_interval: Duration,
    /// Wait budgets
    pub timeouts: Timeouts,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            wait: true,
            poll_interval: Duration::from_secs(2),
            timeouts: Timeouts::default(),
        }
    }
}

impl ProviderConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let secs = |key: &str, default: Duration| -> Result<Duration, ProviderError> {
            lookup(key).map_or(Ok(default), |raw| parse_secs(key, &raw))
        };

        let namespace = lookup("KUBEVIRT_NAMESPACE")
            .map(|ns| ns.trim().to_string())
            .unwrap_or(defaults.namespace);
        if namespace.is_empty() {
            return Err(ProviderError::InvalidConfig("KUBEVIRT_NAMESPACE must not be empty".to_string()));
        }

        let wait = match lookup("KUBEVIRT_WAIT") {
            Some(raw) => parse_bool("KUBEVIRT_WAIT", &raw)?,
            None => defaults.wait,
        };

        let poll_interval = secs("KUBEVIRT_POLL_INTERVAL_SECS", defaults.poll_interval)?;
        if poll_interval.is_zero() {
            return Err(ProviderError::InvalidConfig(
                "KUBEVIRT_POLL_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        let t = defaults.timeouts;
        let timeouts = Timeouts {
            virtual_machine_create: secs("KUBEVIRT_VM_CREATE_TIMEOUT_SECS", t.virtual_machine_create)?,
            virtual_machine_instance_create: secs("KUBEVIRT_VMI_CREATE_TIMEOUT_SECS", t.virtual_machine_instance_create)?,
            replica_set_create: secs("KUBEVIRT_VMIRS_CREATE_TIMEOUT_SECS", t.replica_set_create)?,
            data_volume_create: secs("KUBEVIRT_DV_CREATE_TIMEOUT_SECS", t.data_volume_create)?,
            delete: secs("KUBEVIRT_DELETE_TIMEOUT_SECS", t.delete)?,
        };

        Ok(Self {
            namespace,
            wait,
            poll_interval,
            timeouts,
        })
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration, ProviderError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ProviderError::InvalidConfig(format!("{key}={raw:?} is not a number of seconds: {e}")))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ProviderError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ProviderError::InvalidConfig(format!("{key}={raw:?} is not a boolean"))),
    }
}
