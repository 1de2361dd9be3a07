//! Channel errors

use blob_store::{BlobPath, StoreError};
use thiserror::Error;

/// Errors raised by a blob channel
#[derive(Debug, Error)]
pub enum ChannelError {
    /// `CreateNew` was requested but the object exists
    #[error("Object already exists: {0}")]
    AlreadyExists(BlobPath),

    /// Missing create flag, unknown mode combination or bad attributes
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Upload or download through the store handle failed
    #[error("Synchronization failed: {0}")]
    SyncFailure(#[from] StoreError),

    /// The operation has no meaning on an object store, or the channel was
    /// not opened for it
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The channel has been closed
    #[error("Channel is closed")]
    Closed,

    /// Local mirror I/O failed
    #[error("Local mirror I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors raised while building an attribute registry
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttributeError {
    #[error("Invalid attributes: {0}")]
    InvalidAttributes(String),
}

impl From<AttributeError> for ChannelError {
    fn from(err: AttributeError) -> Self {
        ChannelError::InvalidArgument(err.to_string())
    }
}

impl From<ChannelError> for std::io::Error {
    fn from(err: ChannelError) -> Self {
        use std::io::ErrorKind;

        match err {
            ChannelError::Io(io) => io,
            ChannelError::AlreadyExists(_) => std::io::Error::new(ErrorKind::AlreadyExists, err),
            ChannelError::InvalidArgument(_) => std::io::Error::new(ErrorKind::InvalidInput, err),
            ChannelError::UnsupportedOperation(_) => {
                std::io::Error::new(ErrorKind::Unsupported, err)
            }
            other => std::io::Error::new(ErrorKind::Other, other),
        }
    }
}
