//! # Blob File System
//!
//! File-system style facade over an object store.
//!
//! ## Philosophy
//!
//! **Paths are a view, not a hierarchy.** A path is resolved to a container and
//! a key once, at the edge. Everything below works on `BlobPath`s.
//!
//! ## Core Concepts
//!
//! - `BlobFileSystem`: resolves paths, opens channels, answers access checks
//! - `StoreAclView`: ACL view backed by the store's public/private switch
//! - `FsSettings`: versioned JSON settings (channel configuration + ACL owner)

pub mod error;
pub mod filesystem;
pub mod settings;
pub mod store_acl_view;

pub use error::{FsError, FsResult};
pub use filesystem::BlobFileSystem;
pub use settings::FsSettings;
pub use store_acl_view::StoreAclView;
