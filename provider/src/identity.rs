//! `namespace/name` resource ids.

use crate::error::ProviderError;
use kube::Resource;
use std::fmt;
use std::str::FromStr;

/// Identity of a namespaced object, rendered as `namespace/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    /// Namespace
    pub namespace: String,
    /// Name
    pub name: String,
}

impl ResourceId {
    /// Build an id from its parts.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Id of an object; objects without a namespace get `default_namespace`.
    pub fn of<K: Resource>(obj: &K, default_namespace: &str) -> Result<Self, ProviderError> {
        let meta = obj.meta();
        let name = meta
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ProviderError::InvalidId("object has no metadata.name".to_string()))?;
        let namespace = meta
            .namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .unwrap_or(default_namespace);
        Ok(Self::new(namespace, name))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl FromStr for ResourceId {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((namespace, name)) if !namespace.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(namespace, name))
            }
            _ => Err(ProviderError::InvalidId(format!(
                "unexpected format of ID ({s}), expected namespace/name"
            ))),
        }
    }
}
