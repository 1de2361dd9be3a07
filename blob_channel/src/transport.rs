//! Channel transport hooks
//!
//! The channel never talks to the store directly when synchronizing. It asks a
//! `ChannelTransport` to build the payload, describe the remote object, store
//! it and run the hooks around the upload. Every method has a default, so an
//! auditing or transforming transport overrides only what it needs.

use crate::{AttributeKind, AttributeLookupMap, ChannelConfig, ChannelResult, OpenOptions};
use blob_store::{Blob, BlobPath, BlobStore, GetOptions, PutOptions};
use std::path::Path;

/// Read-only view of a channel handed to transport hooks
#[derive(Debug, Clone, Copy)]
pub struct SyncContext<'a> {
    pub path: &'a BlobPath,
    pub options: &'a OpenOptions,
    pub attributes: &'a AttributeLookupMap,
    pub config: &'a ChannelConfig,
    /// Synchronizations completed before this one
    pub completed_syncs: u64,
}

/// Interception points around payload construction, upload and fetch
pub trait ChannelTransport: Send + Sync {
    /// Runs before anything is read from the mirror
    fn pre_sync(&self, _ctx: &SyncContext<'_>, _write_metadata: bool) -> ChannelResult<()> {
        Ok(())
    }

    /// Reads the mirror into an upload payload
    fn create_payload(&self, mirror: &Path) -> ChannelResult<Vec<u8>> {
        Ok(std::fs::read(mirror)?)
    }

    /// Describes the remote object to upload
    fn build_blob(&self, ctx: &SyncContext<'_>, payload: Vec<u8>, write_metadata: bool) -> Blob {
        build_blob(ctx, payload, write_metadata)
    }

    /// Uploads the object, returning its ETag
    fn store(
        &self,
        store: &dyn BlobStore,
        container: &str,
        blob: Blob,
        options: &PutOptions,
        _write_metadata: bool,
    ) -> ChannelResult<String> {
        Ok(store.put(container, blob, options)?)
    }

    /// Runs after a successful upload
    ///
    /// Applies the access-level attribute, if there is one.
    fn post_sync(
        &self,
        store: &dyn BlobStore,
        ctx: &SyncContext<'_>,
        _write_metadata: bool,
    ) -> ChannelResult<()> {
        if let Some(level) = ctx.attributes.access_level() {
            store.set_access(ctx.path.container(), ctx.path.key(), level)?;
        }
        Ok(())
    }

    /// Downloads the remote object at open time
    fn fetch(
        &self,
        store: &dyn BlobStore,
        path: &BlobPath,
        options: &GetOptions,
    ) -> ChannelResult<Option<Blob>> {
        Ok(store.get(path.container(), path.key(), options)?)
    }
}

/// Transport that performs the plain store calls
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultChannelTransport;

impl ChannelTransport for DefaultChannelTransport {}

/// Extracts the `charset` parameter of a content type
fn charset_of(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

/// Default remote object description
///
/// The content type is always set, from the attribute or the configured
/// default. With `write_metadata`, disposition, encoding (falling back to the
/// content type's charset), language and user metadata follow when present.
pub fn build_blob(ctx: &SyncContext<'_>, payload: Vec<u8>, write_metadata: bool) -> Blob {
    let attributes = ctx.attributes;
    let content_type = attributes
        .text(AttributeKind::ContentType)
        .unwrap_or(&ctx.config.default_content_type);
    let mut blob = Blob::new(ctx.path.key(), payload).with_content_type(content_type);

    if !write_metadata {
        return blob;
    }

    if let Some(disposition) = attributes.text(AttributeKind::ContentDisposition) {
        blob = blob.with_content_disposition(disposition);
    }
    let encoding = attributes
        .text(AttributeKind::ContentEncoding)
        .or_else(|| charset_of(content_type));
    if let Some(encoding) = encoding {
        blob = blob.with_content_encoding(encoding);
    }
    if let Some(language) = attributes.text(AttributeKind::ContentLanguage) {
        blob = blob.with_content_language(language);
    }
    if let Some(metadata) = attributes.user_metadata() {
        blob.metadata.user_metadata.extend(metadata.clone());
    }
    blob
}
