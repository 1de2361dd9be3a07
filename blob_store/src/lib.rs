//! # Blob Store
//!
//! This crate defines the object-store collaborator consumed by the blob
//! channel and ACL layers.
//!
//! ## Philosophy
//!
//! **The store is a container + key addressed bag of whole objects.**
//!
//! There is no random access, no partial write and no POSIX permission model.
//! A handle can:
//! - `get` a whole object (optionally a byte range)
//! - `put` a whole object
//! - answer `exists`
//! - read and set a coarse access level (public-read or private)
//!
//! ## Contents
//!
//! - **BlobStore**: the handle trait every provider implements
//! - **Blob / BlobMetadata**: the remote object description
//! - **MemoryBlobStore**: an in-process store for tests and embedding
//! - **FailingBlobStore**: a wrapper that injects failures on demand
//! - **PathResolver**: turns an opaque path into `(container, key)`

pub mod blob;
pub mod failing_store;
pub mod memory;
pub mod options;
pub mod path;
pub mod store;

pub use blob::{compute_etag, Blob, BlobMetadata, DEFAULT_CONTENT_TYPE};
pub use failing_store::{FailingBlobStore, FailurePolicy};
pub use memory::MemoryBlobStore;
pub use options::{AccessLevel, GetOptions, PutOptions};
pub use path::{BlobPath, PathResolver, SlashPathResolver};
pub use store::{BlobStore, StoreError, StoreResult};
