//! # Blob Channel
//!
//! This crate serves random-access file semantics on top of an object store
//! that only understands whole-object get and put.
//!
//! ## Design
//!
//! - **Local mirror**: every open channel owns a private temporary file. The
//!   remote object is downloaded into it at open time (unless the open starts
//!   fresh) and every read, write, seek, truncate, transfer and map is served
//!   from it.
//! - **Sync protocol**: on `force`, on `close`, and after every mutation when
//!   opened with `Sync`/`Dsync`, the mirror is uploaded as a whole object.
//! - **Transport hooks**: `ChannelTransport` intercepts payload construction,
//!   upload and fetch so callers can audit or transform without touching the
//!   channel.
//! - **Attribute registry**: open-time options and metadata (content type,
//!   put options, access level, ...) keyed by `(kind, value type)`.
//!
//! ## Lifecycle
//!
//! `Opening -> Active -> Closed`. The mirror is deleted on every exit path,
//! including a failed open and a failed final upload.

pub mod attributes;
pub mod channel;
pub mod config;
pub mod error;
pub mod mirror;
pub mod open_options;
pub mod transport;

pub use attributes::{AttributeKind, AttributeLookupMap, AttributeValue, FileAttribute, ValueType};
pub use channel::{BlobChannel, ChannelContext, MapMode, MappedRegion, SyncCounter};
pub use config::ChannelConfig;
pub use error::{AttributeError, ChannelError, ChannelResult};
pub use mirror::LocalMirror;
pub use open_options::{OpenMode, OpenOptions};
pub use transport::{build_blob, ChannelTransport, DefaultChannelTransport, SyncContext};
