//! In-memory object store for one kind

use crate::error::ClientError;
use kube::{Resource, ResourceExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A scripted response for one `get_*` call.
#[derive(Debug, Clone)]
pub enum MockRead<K> {
    /// Return this object
    Object(K),
    /// Return `Ok(None)`
    NotFound,
    /// Return `Err(ClientError::Api(..))` with this message
    Error(String),
}

type Key = (String, String);

fn key(namespace: &str, name: &str) -> Key {
    (namespace.to_string(), name.to_string())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Objects of one kind keyed by namespace/name, plus per-object scripted reads.
///
/// Scripted reads take precedence over stored objects until they run out.
#[derive(Debug)]
pub(crate) struct MockStore<K> {
    objects: Mutex<HashMap<Key, K>>,
    scripted: Mutex<HashMap<Key, VecDeque<MockRead<K>>>>,
}

impl<K> Default for MockStore<K> {
    fn default() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            scripted: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> MockStore<K>
where
    K: Resource + Clone + Serialize + DeserializeOwned,
{
    pub(crate) fn seed(&self, obj: K) {
        let namespace = obj.namespace().unwrap_or_default();
        lock(&self.objects).insert(key(&namespace, &obj.name_any()), obj);
    }

    pub(crate) fn script(&self, namespace: &str, name: &str, reads: Vec<MockRead<K>>) {
        lock(&self.scripted)
            .entry(key(namespace, name))
            .or_default()
            .extend(reads);
    }

    pub(crate) fn contains(&self, namespace: &str, name: &str) -> bool {
        lock(&self.objects).contains_key(&key(namespace, name))
    }

    pub(crate) fn get(&self, namespace: &str, name: &str) -> Result<Option<K>, ClientError> {
        let k = key(namespace, name);
        let next = lock(&self.scripted).get_mut(&k).and_then(VecDeque::pop_front);
        match next {
            Some(MockRead::Object(obj)) => Ok(Some(obj)),
            Some(MockRead::NotFound) => Ok(None),
            Some(MockRead::Error(msg)) => Err(ClientError::Api(msg)),
            None => Ok(lock(&self.objects).get(&k).cloned()),
        }
    }

    pub(crate) fn create(&self, obj: &K) -> Result<K, ClientError> {
        let namespace = obj
            .namespace()
            .ok_or_else(|| ClientError::InvalidRequest(format!("{} has no namespace", obj.name_any())))?;
        let k = key(&namespace, &obj.name_any());
        let mut objects = lock(&self.objects);
        if objects.contains_key(&k) {
            return Err(ClientError::Api(format!("{}/{} already exists", k.0, k.1)));
        }
        objects.insert(k, obj.clone());
        Ok(obj.clone())
    }

    pub(crate) fn patch(&self, namespace: &str, name: &str, patch: &serde_json::Value) -> Result<K, ClientError> {
        let k = key(namespace, name);
        let mut objects = lock(&self.objects);
        let current = objects
            .get(&k)
            .ok_or_else(|| ClientError::Api(format!("{namespace}/{name} not found")))?;
        let mut doc = serde_json::to_value(current)?;
        merge_patch(&mut doc, patch);
        let patched: K = serde_json::from_value(doc)?;
        objects.insert(k, patched.clone());
        Ok(patched)
    }

    pub(crate) fn delete(&self, namespace: &str, name: &str) -> Result<(), ClientError> {
        lock(&self.objects)
            .remove(&key(namespace, name))
            .map(|_| ())
            .ok_or_else(|| ClientError::Api(format!("{namespace}/{name} not found")))
    }
}

/// RFC 7386 JSON merge patch.
pub(crate) fn merge_patch(target: &mut serde_json::Value, patch: &serde_json::Value) {
    let serde_json::Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = serde_json::Value::Object(serde_json::Map::new());
    }
    if let serde_json::Value::Object(target_map) = target {
        for (field, value) in patch_map {
            if value.is_null() {
                target_map.remove(field);
            } else {
                merge_patch(target_map.entry(field.clone()).or_insert(serde_json::Value::Null), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_patch_replaces_adds_and_removes() {
        let mut doc = json!({"a": 1, "b": {"c": 2, "d": 3}, "e": [1, 2]});
        merge_patch(&mut doc, &json!({"a": 5, "b": {"c": null, "f": 4}, "e": [3]}));
        assert_eq!(doc, json!({"a": 5, "b": {"d": 3, "f": 4}, "e": [3]}));
    }

    #[test]
    fn test_merge_patch_non_object_replaces() {
        let mut doc = json!({"a": 1});
        merge_patch(&mut doc, &json!("x"));
        assert_eq!(doc, json!("x"));
    }
}
