//! In-process object store
//!
//! `MemoryBlobStore` keeps every container in a map guarded by a lock. It
//! behaves like a strongly consistent provider: a `put` is visible to the next
//! `get` from any thread.

use crate::{
    compute_etag, AccessLevel, Blob, BlobStore, GetOptions, PutOptions, StoreError, StoreResult,
};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone)]
struct StoredBlob {
    blob: Blob,
    access: AccessLevel,
}

/// Thread-safe in-memory store
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    containers: RwLock<HashMap<String, HashMap<String, StoredBlob>>>,
}

impl MemoryBlobStore {
    /// Creates an empty store with no containers
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given containers already present
    pub fn with_containers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        for name in names {
            store.create_container(name);
        }
        store
    }

    /// Creates a container; returns false if it already existed
    pub fn create_container(&self, name: impl Into<String>) -> bool {
        let mut containers = self.containers.write();
        let name = name.into();
        if containers.contains_key(&name) {
            return false;
        }
        containers.insert(name, HashMap::new());
        true
    }

    /// Returns true if the container exists
    pub fn container_exists(&self, name: &str) -> bool {
        self.containers.read().contains_key(name)
    }

    /// Lists the keys of a container in sorted order
    pub fn list(&self, container: &str) -> StoreResult<Vec<String>> {
        let containers = self.containers.read();
        let objects = containers
            .get(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;
        let keys: BTreeSet<&String> = objects.keys().collect();
        Ok(keys.into_iter().cloned().collect())
    }
}

fn not_found(container: &str, key: &str) -> StoreError {
    StoreError::NotFound {
        container: container.to_string(),
        key: key.to_string(),
    }
}

fn precondition_failed(container: &str, key: &str) -> StoreError {
    StoreError::PreconditionFailed {
        container: container.to_string(),
        key: key.to_string(),
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, container: &str, key: &str, options: &GetOptions) -> StoreResult<Option<Blob>> {
        let containers = self.containers.read();
        let objects = containers
            .get(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;
        let stored = match objects.get(key) {
            Some(stored) => stored,
            None => return Ok(None),
        };

        if let Some(expected) = &options.if_match {
            if stored.blob.metadata.etag.as_ref() != Some(expected) {
                return Err(precondition_failed(container, key));
            }
        }

        let mut blob = stored.blob.clone();
        if let Some(range) = &options.range {
            let len = blob.payload.len() as u64;
            let start = range.start.min(len) as usize;
            let end = range.end.min(len).max(range.start.min(len)) as usize;
            blob.payload = blob.payload[start..end].to_vec();
        }
        Ok(Some(blob))
    }

    fn put(&self, container: &str, mut blob: Blob, options: &PutOptions) -> StoreResult<String> {
        let mut containers = self.containers.write();
        let objects = containers
            .get_mut(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;

        let previous = objects.get(&blob.key);
        if let Some(expected) = &options.if_match {
            let current = previous.and_then(|stored| stored.blob.metadata.etag.as_ref());
            if current != Some(expected) {
                return Err(precondition_failed(container, &blob.key));
            }
        }

        let access = previous.map(|stored| stored.access).unwrap_or_default();
        let etag = compute_etag(&blob.payload);
        blob.metadata.etag = Some(etag.clone());
        blob.metadata.content_length = blob.payload.len() as u64;

        tracing::debug!(
            container,
            key = %blob.key,
            bytes = blob.payload.len(),
            multipart = options.multipart,
            "stored blob"
        );
        objects.insert(blob.key.clone(), StoredBlob { blob, access });
        Ok(etag)
    }

    fn exists(&self, container: &str, key: &str) -> StoreResult<bool> {
        let containers = self.containers.read();
        Ok(containers
            .get(container)
            .map(|objects| objects.contains_key(key))
            .unwrap_or(false))
    }

    fn remove(&self, container: &str, key: &str) -> StoreResult<()> {
        let mut containers = self.containers.write();
        if let Some(objects) = containers.get_mut(container) {
            objects.remove(key);
        }
        Ok(())
    }

    fn set_access(&self, container: &str, key: &str, level: AccessLevel) -> StoreResult<()> {
        let mut containers = self.containers.write();
        let stored = containers
            .get_mut(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?
            .get_mut(key)
            .ok_or_else(|| not_found(container, key))?;
        stored.access = level;
        Ok(())
    }

    fn get_access(&self, container: &str, key: &str) -> StoreResult<AccessLevel> {
        let containers = self.containers.read();
        containers
            .get(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?
            .get(key)
            .map(|stored| stored.access)
            .ok_or_else(|| not_found(container, key))
    }
}
