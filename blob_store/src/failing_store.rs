//! # Failing Blob Store
//!
//! A BlobStore wrapper that can simulate provider failures for testing
//! cleanup and retry paths without a real network.

use crate::{AccessLevel, Blob, BlobStore, GetOptions, PutOptions, StoreError, StoreResult};
use parking_lot::Mutex;

/// Policy for when failures should occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Never fail (passthrough)
    Never,
    /// Fail every put after N successful puts
    AfterPuts(usize),
    /// Fail every get
    OnGet,
    /// Fail puts and gets on specific keys
    OnKeys(Vec<String>),
}

#[derive(Debug)]
struct Counters {
    policy: FailurePolicy,
    put_count: usize,
}

/// Wrapper around a BlobStore that can simulate failures
#[derive(Debug)]
pub struct FailingBlobStore<S: BlobStore> {
    inner: S,
    state: Mutex<Counters>,
}

impl<S: BlobStore> FailingBlobStore<S> {
    /// Create a new failing store with the given policy
    pub fn new(inner: S, policy: FailurePolicy) -> Self {
        Self {
            inner,
            state: Mutex::new(Counters {
                policy,
                put_count: 0,
            }),
        }
    }

    /// Get the underlying store (for inspection)
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Get the number of successful puts so far
    pub fn put_count(&self) -> usize {
        self.state.lock().put_count
    }

    /// Reset the failure policy
    pub fn set_policy(&self, policy: FailurePolicy) {
        let mut state = self.state.lock();
        state.policy = policy;
        state.put_count = 0;
    }

    fn key_fails(policy: &FailurePolicy, key: &str) -> bool {
        matches!(policy, FailurePolicy::OnKeys(keys) if keys.iter().any(|k| k == key))
    }
}

impl<S: BlobStore> BlobStore for FailingBlobStore<S> {
    fn get(&self, container: &str, key: &str, options: &GetOptions) -> StoreResult<Option<Blob>> {
        {
            let state = self.state.lock();
            if state.policy == FailurePolicy::OnGet || Self::key_fails(&state.policy, key) {
                return Err(StoreError::Injected(format!("get {}/{}", container, key)));
            }
        }
        self.inner.get(container, key, options)
    }

    fn put(&self, container: &str, blob: Blob, options: &PutOptions) -> StoreResult<String> {
        let mut state = self.state.lock();
        let fail = match &state.policy {
            FailurePolicy::AfterPuts(n) => state.put_count >= *n,
            policy => Self::key_fails(policy, &blob.key),
        };
        if fail {
            return Err(StoreError::Injected(format!("put {}/{}", container, blob.key)));
        }

        let etag = self.inner.put(container, blob, options)?;
        state.put_count += 1;
        Ok(etag)
    }

    fn exists(&self, container: &str, key: &str) -> StoreResult<bool> {
        self.inner.exists(container, key)
    }

    fn remove(&self, container: &str, key: &str) -> StoreResult<()> {
        self.inner.remove(container, key)
    }

    fn set_access(&self, container: &str, key: &str, level: AccessLevel) -> StoreResult<()> {
        self.inner.set_access(container, key, level)
    }

    fn get_access(&self, container: &str, key: &str) -> StoreResult<AccessLevel> {
        self.inner.get_access(container, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBlobStore;

    fn failing(policy: FailurePolicy) -> FailingBlobStore<MemoryBlobStore> {
        FailingBlobStore::new(MemoryBlobStore::with_containers(["c"]), policy)
    }

    #[test]
    fn test_failing_store_never() {
        let store = failing(FailurePolicy::Never);
        assert!(store.put("c", Blob::new("a", Vec::new()), &PutOptions::new()).is_ok());
        assert!(store.get("c", "a", &GetOptions::new()).unwrap().is_some());
        assert_eq!(store.put_count(), 1);
    }

    #[test]
    fn test_failing_store_after_puts() {
        let store = failing(FailurePolicy::AfterPuts(2));
        assert!(store.put("c", Blob::new("a", Vec::new()), &PutOptions::new()).is_ok());
        assert!(store.put("c", Blob::new("b", Vec::new()), &PutOptions::new()).is_ok());
        let result = store.put("c", Blob::new("d", Vec::new()), &PutOptions::new());
        assert!(matches!(result, Err(StoreError::Injected(_))));
        assert!(!store.inner().exists("c", "d").unwrap());
    }

    #[test]
    fn test_failing_store_on_get() {
        let store = failing(FailurePolicy::Never);
        store.put("c", Blob::new("a", Vec::new()), &PutOptions::new()).unwrap();
        store.set_policy(FailurePolicy::OnGet);
        assert!(store.get("c", "a", &GetOptions::new()).is_err());
        assert!(store.exists("c", "a").unwrap());
    }

    #[test]
    fn test_failing_store_on_keys() {
        let store = failing(FailurePolicy::OnKeys(vec!["bad".to_string()]));
        assert!(store.put("c", Blob::new("good", Vec::new()), &PutOptions::new()).is_ok());
        assert!(store.put("c", Blob::new("bad", Vec::new()), &PutOptions::new()).is_err());
        assert!(store.get("c", "bad", &GetOptions::new()).is_err());
    }

    #[test]
    fn test_set_policy_resets_counter() {
        let store = failing(FailurePolicy::AfterPuts(1));
        store.put("c", Blob::new("a", Vec::new()), &PutOptions::new()).unwrap();
        store.set_policy(FailurePolicy::AfterPuts(1));
        assert_eq!(store.put_count(), 0);
        assert!(store.put("c", Blob::new("b", Vec::new()), &PutOptions::new()).is_ok());
    }
}
