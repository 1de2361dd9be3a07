//! Path resolution logic
//!
//! Callers address objects with opaque paths. A `PathResolver` maps such a
//! path onto the `(container, key)` pair the store understands.

use crate::{StoreError, StoreResult};
use core::fmt;
use serde::{Deserialize, Serialize};

/// A resolved object address
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlobPath {
    container: String,
    key: String,
}

impl BlobPath {
    /// Creates a path from an already-split container and key
    pub fn new(container: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            key: key.into(),
        }
    }

    /// Returns the container name
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Returns the object key
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for BlobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container, self.key)
    }
}

/// Maps opaque paths onto container + key
pub trait PathResolver: Send + Sync {
    /// Resolves a path
    fn resolve(&self, path: &str) -> StoreResult<BlobPath>;
}

/// Resolver for `container/key/with/slashes` style paths
///
/// The first component is the container; the remaining components, joined
/// with `/`, form the key.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlashPathResolver;

impl SlashPathResolver {
    /// Splits a path into components
    ///
    /// # Examples
    ///
    /// ```
    /// use blob_store::SlashPathResolver;
    ///
    /// let components = SlashPathResolver::split_path("bucket/docs/todo.txt").unwrap();
    /// assert_eq!(components, vec!["bucket", "docs", "todo.txt"]);
    /// ```
    pub fn split_path(path: &str) -> StoreResult<Vec<&str>> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Err(StoreError::InvalidPath("Empty path".to_string()));
        }

        let components: Vec<&str> = path.split('/').collect();
        for component in &components {
            if component.is_empty() {
                return Err(StoreError::InvalidPath(
                    "Path contains empty component".to_string(),
                ));
            }
            if *component == "." || *component == ".." {
                return Err(StoreError::InvalidPath(
                    "Relative path components (. or ..) are not supported".to_string(),
                ));
            }
        }

        Ok(components)
    }
}

impl PathResolver for SlashPathResolver {
    fn resolve(&self, path: &str) -> StoreResult<BlobPath> {
        let components = Self::split_path(path)?;
        if components.len() < 2 {
            return Err(StoreError::InvalidPath(format!(
                "{} names a container, not an object",
                path
            )));
        }
        Ok(BlobPath::new(components[0], components[1..].join("/")))
    }
}
