//! The store handle trait

use crate::{AccessLevel, Blob, GetOptions, PutOptions};
use thiserror::Error;

/// Errors returned by a store handle
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The container does not exist
    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    /// The object does not exist
    #[error("Object not found: {container}/{key}")]
    NotFound { container: String, key: String },

    /// A conditional request did not match the stored ETag
    #[error("Precondition failed for {container}/{key}")]
    PreconditionFailed { container: String, key: String },

    /// The path could not be mapped onto a container and key
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Provider or transport failure
    #[error("Store I/O error: {0}")]
    Io(String),

    /// Failure produced by a failure-injecting wrapper
    #[error("Injected failure: {0}")]
    Injected(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A handle to a container + key addressed object store
///
/// Every call is synchronous and fully blocking. Timeouts and cancellation are
/// the business of whoever wraps the handle.
pub trait BlobStore: Send + Sync {
    /// Fetches an object, or `None` if it does not exist
    fn get(&self, container: &str, key: &str, options: &GetOptions) -> StoreResult<Option<Blob>>;

    /// Stores a whole object, replacing any previous one; returns its ETag
    fn put(&self, container: &str, blob: Blob, options: &PutOptions) -> StoreResult<String>;

    /// Returns true if the object exists
    fn exists(&self, container: &str, key: &str) -> StoreResult<bool>;

    /// Removes an object; removing a missing object is not an error
    fn remove(&self, container: &str, key: &str) -> StoreResult<()>;

    /// Sets the access level of an existing object
    fn set_access(&self, container: &str, key: &str, level: AccessLevel) -> StoreResult<()>;

    /// Returns the access level of an existing object
    fn get_access(&self, container: &str, key: &str) -> StoreResult<AccessLevel>;
}

impl<S: BlobStore + ?Sized> BlobStore for std::sync::Arc<S> {
    fn get(&self, container: &str, key: &str, options: &GetOptions) -> StoreResult<Option<Blob>> {
        (**self).get(container, key, options)
    }

    fn put(&self, container: &str, blob: Blob, options: &PutOptions) -> StoreResult<String> {
        (**self).put(container, blob, options)
    }

    fn exists(&self, container: &str, key: &str) -> StoreResult<bool> {
        (**self).exists(container, key)
    }

    fn remove(&self, container: &str, key: &str) -> StoreResult<()> {
        (**self).remove(container, key)
    }

    fn set_access(&self, container: &str, key: &str, level: AccessLevel) -> StoreResult<()> {
        (**self).set_access(container, key, level)
    }

    fn get_access(&self, container: &str, key: &str) -> StoreResult<AccessLevel> {
        (**self).get_access(container, key)
    }
}
