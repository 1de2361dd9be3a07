//! Remote object description

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Content type used when nothing more specific is known
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Computes the ETag the built-in stores assign to a payload
///
/// The ETag is the lowercase hex SHA-256 of the payload bytes.
pub fn compute_etag(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Transport metadata attached to a blob
///
/// None of these fields are interpreted by the store; they travel with the
/// object and are handed back on `get`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobMetadata {
    /// MIME type of the payload
    pub content_type: Option<String>,
    /// Encoding applied to the payload (e.g. `gzip`, or a charset)
    pub content_encoding: Option<String>,
    /// Natural language of the payload
    pub content_language: Option<String>,
    /// Presentation hint (e.g. `attachment; filename=...`)
    pub content_disposition: Option<String>,
    /// Free-form user metadata
    pub user_metadata: BTreeMap<String, String>,
    /// Length of the full payload, set by the store
    pub content_length: u64,
    /// Entity tag, set by the store
    pub etag: Option<String>,
}

/// A whole remote object: key, payload and metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Object key inside its container
    pub key: String,
    /// Object bytes
    pub payload: Vec<u8>,
    /// Transport metadata
    pub metadata: BlobMetadata,
}

impl Blob {
    /// Creates a blob with no metadata beyond its length
    pub fn new(key: impl Into<String>, payload: Vec<u8>) -> Self {
        let content_length = payload.len() as u64;
        Self {
            key: key.into(),
            payload,
            metadata: BlobMetadata {
                content_length,
                ..BlobMetadata::default()
            },
        }
    }

    /// Sets the content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.metadata.content_type = Some(content_type.into());
        self
    }

    /// Sets the content encoding
    pub fn with_content_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.metadata.content_encoding = Some(encoding.into());
        self
    }

    /// Sets the content language
    pub fn with_content_language(mut self, language: impl Into<String>) -> Self {
        self.metadata.content_language = Some(language.into());
        self
    }

    /// Sets the content disposition
    pub fn with_content_disposition(mut self, disposition: impl Into<String>) -> Self {
        self.metadata.content_disposition = Some(disposition.into());
        self
    }

    /// Adds one user metadata pair
    pub fn with_user_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.user_metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the payload length
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Returns true if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
