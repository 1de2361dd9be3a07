//! Facade errors

use acl::AclError;
use blob_channel::{AttributeError, ChannelError};
use blob_store::StoreError;
use thiserror::Error;

/// Errors raised by the file-system facade
#[derive(Debug, Error)]
pub enum FsError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("ACL error: {0}")]
    Acl(#[from] AclError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Failed to serialize settings
    #[error("Failed to serialize settings: {0}")]
    SerializationFailed(String),

    /// Failed to deserialize settings
    #[error("Failed to deserialize settings: {0}")]
    DeserializationFailed(String),

    /// Unsupported settings version
    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AttributeError> for FsError {
    fn from(err: AttributeError) -> Self {
        FsError::Channel(err.into())
    }
}

/// Result type for facade operations
pub type FsResult<T> = Result<T, FsError>;
