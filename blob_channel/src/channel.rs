//! The blob-backed channel

use crate::{
    AttributeLookupMap, ChannelConfig, ChannelError, ChannelResult, ChannelTransport,
    DefaultChannelTransport, LocalMirror, OpenMode, OpenOptions, SyncContext,
};
use blob_store::{BlobPath, BlobStore, StoreError};
use memmap2::{Mmap, MmapMut, MmapOptions};
use parking_lot::Mutex;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Everything a channel needs besides the path and open request
///
/// Contexts are cheap to clone and are passed explicitly to every open.
#[derive(Clone)]
pub struct ChannelContext {
    pub store: Arc<dyn BlobStore>,
    pub transport: Arc<dyn ChannelTransport>,
    pub config: ChannelConfig,
}

impl ChannelContext {
    /// Uses the default transport and configuration
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            transport: Arc::new(DefaultChannelTransport),
            config: ChannelConfig::default(),
        }
    }

    /// Replaces the transport
    pub fn with_transport(mut self, transport: Arc<dyn ChannelTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Replaces the channel configuration
    pub fn with_config(mut self, config: ChannelConfig) -> Self {
        self.config = config;
        self
    }
}

/// Shared handle on a channel's completed-synchronization count
///
/// Safe to read from any thread while the channel is in use.
#[derive(Debug, Clone, Default)]
pub struct SyncCounter(Arc<AtomicU64>);

impl SyncCounter {
    /// Returns the number of completed synchronizations
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn increment(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// How a region of the mirror is mapped into memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMode {
    ReadOnly,
    ReadWrite,
}

/// A memory-mapped region of the mirror
///
/// Changes made through a read-write mapping land in the mirror and are
/// uploaded by the next synchronization.
#[derive(Debug)]
pub enum MappedRegion {
    ReadOnly(Mmap),
    ReadWrite(MmapMut),
}

impl MappedRegion {
    /// Read access to the mapped bytes
    pub fn as_slice(&self) -> &[u8] {
        match self {
            MappedRegion::ReadOnly(map) => &map[..],
            MappedRegion::ReadWrite(map) => &map[..],
        }
    }

    /// Mutable access; `None` for read-only mappings
    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        match self {
            MappedRegion::ReadOnly(_) => None,
            MappedRegion::ReadWrite(map) => Some(&mut map[..]),
        }
    }

    /// Flushes a read-write mapping to the mirror
    pub fn flush(&self) -> io::Result<()> {
        match self {
            MappedRegion::ReadOnly(_) => Ok(()),
            MappedRegion::ReadWrite(map) => map.flush(),
        }
    }
}

/// Random-access channel over one remote object
///
/// A channel is a single-writer handle: it is `Send` but must not be used
/// from several threads at once.
pub struct BlobChannel {
    context: ChannelContext,
    path: BlobPath,
    options: OpenOptions,
    attributes: AttributeLookupMap,
    mirror: Option<LocalMirror>,
    syncs: SyncCounter,
    /// ETag of the last upload, for conditional puts
    last_etag: Mutex<Option<String>>,
}

impl BlobChannel {
    /// Opens a channel, resolving the open request against the remote object
    ///
    /// - exists + `CreateNew` fails with `AlreadyExists`
    /// - missing without `Create`/`CreateNew` fails with `InvalidArgument`
    /// - exists without `TruncateExisting` downloads the object into the mirror
    /// - otherwise the mirror starts empty
    /// - `Append` positions the channel at the end
    pub fn open(
        context: ChannelContext,
        path: BlobPath,
        options: OpenOptions,
        attributes: AttributeLookupMap,
    ) -> ChannelResult<Self> {
        let options = options.validated()?;
        let ranged = attributes
            .get_options()
            .map_or(false, |get_options| get_options.range.is_some());
        if ranged && options.is_writable() {
            return Err(ChannelError::InvalidArgument(format!(
                "ranged download of {} cannot be opened for writing",
                path
            )));
        }
        let store = context.store.as_ref();
        let exists = store.exists(path.container(), path.key())?;

        if exists && options.contains(OpenMode::CreateNew) {
            return Err(ChannelError::AlreadyExists(path));
        }
        if !exists && !options.may_create() {
            return Err(ChannelError::InvalidArgument(format!(
                "{} does not exist and neither CREATE nor CREATE_NEW was given",
                path
            )));
        }

        // From here on the mirror is removed if anything fails.
        let mut mirror = LocalMirror::create(&context.config)?;

        if exists && !options.contains(OpenMode::TruncateExisting) {
            let get_options = attributes.get_options().cloned().unwrap_or_default();
            let blob = context
                .transport
                .fetch(store, &path, &get_options)?
                .ok_or_else(|| StoreError::NotFound {
                    container: path.container().to_string(),
                    key: path.key().to_string(),
                })?;
            mirror.fill(&blob.payload)?;
            tracing::debug!(%path, bytes = blob.payload.len(), "downloaded object into mirror");
        }

        if options.contains(OpenMode::Append) {
            mirror.file_mut().seek(SeekFrom::End(0))?;
        }

        tracing::debug!(%path, %options, "opened blob channel");
        Ok(Self {
            context,
            path,
            options,
            attributes,
            mirror: Some(mirror),
            syncs: SyncCounter::default(),
            last_etag: Mutex::new(None),
        })
    }

    /// The remote object this channel mirrors
    pub fn path(&self) -> &BlobPath {
        &self.path
    }

    /// The validated open flags
    pub fn options(&self) -> &OpenOptions {
        &self.options
    }

    /// The open-time attributes
    pub fn attributes(&self) -> &AttributeLookupMap {
        &self.attributes
    }

    /// True until the channel is closed
    pub fn is_open(&self) -> bool {
        self.mirror.is_some()
    }

    /// Location of the local mirror while the channel is open
    pub fn mirror_path(&self) -> Option<&Path> {
        self.mirror.as_ref().map(LocalMirror::path)
    }

    /// Number of completed synchronizations
    pub fn sync_count(&self) -> u64 {
        self.syncs.get()
    }

    /// A handle on the synchronization counter for other threads
    pub fn sync_counter(&self) -> SyncCounter {
        self.syncs.clone()
    }

    fn mirror(&self) -> ChannelResult<&LocalMirror> {
        self.mirror.as_ref().ok_or(ChannelError::Closed)
    }

    fn mirror_mut(&mut self) -> ChannelResult<&mut LocalMirror> {
        self.mirror.as_mut().ok_or(ChannelError::Closed)
    }

    fn require_readable(&self) -> ChannelResult<()> {
        self.mirror()?;
        if self.options.is_readable() {
            Ok(())
        } else {
            Err(ChannelError::UnsupportedOperation(
                "channel not opened for reading".to_string(),
            ))
        }
    }

    fn require_writable(&self) -> ChannelResult<()> {
        self.mirror()?;
        if self.options.is_writable() {
            Ok(())
        } else {
            Err(ChannelError::UnsupportedOperation(
                "channel not opened for writing".to_string(),
            ))
        }
    }

    fn after_mutation(&self) -> ChannelResult<()> {
        match self.options.immediate_sync() {
            Some(write_metadata) => self.sync(write_metadata),
            None => Ok(()),
        }
    }

    /// Current position
    pub fn position(&mut self) -> ChannelResult<u64> {
        Ok(self.mirror_mut()?.file_mut().stream_position()?)
    }

    /// Moves the position; positions past the end are allowed
    pub fn set_position(&mut self, position: u64) -> ChannelResult<()> {
        self.mirror_mut()?.file_mut().seek(SeekFrom::Start(position))?;
        Ok(())
    }

    /// Current size of the mirrored object
    pub fn size(&self) -> ChannelResult<u64> {
        Ok(self.mirror()?.file().metadata()?.len())
    }

    /// Reads at the current position; returns 0 at end of object
    pub fn read(&mut self, buf: &mut [u8]) -> ChannelResult<usize> {
        self.require_readable()?;
        Ok(self.mirror_mut()?.file_mut().read(buf)?)
    }

    /// Reads at `position` without moving the current position
    pub fn read_at(&mut self, buf: &mut [u8], position: u64) -> ChannelResult<usize> {
        self.require_readable()?;
        let file = self.mirror_mut()?.file_mut();
        let saved = file.stream_position()?;
        file.seek(SeekFrom::Start(position))?;
        let result = file.read(buf);
        file.seek(SeekFrom::Start(saved))?;
        Ok(result?)
    }

    /// Writes at the current position, or at the end in append mode
    pub fn write(&mut self, buf: &[u8]) -> ChannelResult<usize> {
        self.require_writable()?;
        let append = self.options.contains(OpenMode::Append);
        let file = self.mirror_mut()?.file_mut();
        if append {
            file.seek(SeekFrom::End(0))?;
        }
        file.write_all(buf)?;
        self.after_mutation()?;
        Ok(buf.len())
    }

    /// Writes at `position` without moving the current position
    pub fn write_at(&mut self, buf: &[u8], position: u64) -> ChannelResult<usize> {
        self.require_writable()?;
        let file = self.mirror_mut()?.file_mut();
        let saved = file.stream_position()?;
        file.seek(SeekFrom::Start(position))?;
        let result = file.write_all(buf);
        file.seek(SeekFrom::Start(saved))?;
        result?;
        self.after_mutation()?;
        Ok(buf.len())
    }

    /// Truncates to `size`; growing is a no-op
    ///
    /// A position beyond the new size is pulled back to it.
    pub fn truncate(&mut self, size: u64) -> ChannelResult<()> {
        self.require_writable()?;
        let file = self.mirror_mut()?.file_mut();
        if size < file.metadata()?.len() {
            file.set_len(size)?;
        }
        if file.stream_position()? > size {
            file.seek(SeekFrom::Start(size))?;
        }
        self.after_mutation()
    }

    /// Copies up to `count` bytes starting at `position` into `target`
    ///
    /// The current position does not move.
    pub fn transfer_to(
        &mut self,
        position: u64,
        count: u64,
        target: &mut dyn Write,
    ) -> ChannelResult<u64> {
        self.require_readable()?;
        let file = self.mirror_mut()?.file_mut();
        let saved = file.stream_position()?;
        file.seek(SeekFrom::Start(position))?;
        let copied = io::copy(&mut Read::by_ref(file).take(count), target);
        file.seek(SeekFrom::Start(saved))?;
        let copied = copied?;
        self.after_mutation()?;
        Ok(copied)
    }

    /// Copies up to `count` bytes from `source` into the mirror at `position`
    ///
    /// The current position does not move.
    pub fn transfer_from(
        &mut self,
        source: &mut dyn Read,
        position: u64,
        count: u64,
    ) -> ChannelResult<u64> {
        self.require_writable()?;
        let file = self.mirror_mut()?.file_mut();
        let saved = file.stream_position()?;
        file.seek(SeekFrom::Start(position))?;
        let copied = io::copy(&mut source.take(count), file);
        file.seek(SeekFrom::Start(saved))?;
        let copied = copied?;
        self.after_mutation()?;
        Ok(copied)
    }

    /// Maps `size` bytes of the mirror starting at `position`
    ///
    /// A read-write mapping past the end grows the mirror to fit.
    pub fn map(
        &mut self,
        mode: MapMode,
        position: u64,
        size: usize,
    ) -> ChannelResult<MappedRegion> {
        self.require_readable()?;
        if mode == MapMode::ReadWrite {
            self.require_writable()?;
        }
        let file = self.mirror_mut()?.file_mut();
        let end = position.checked_add(size as u64).ok_or_else(|| {
            ChannelError::InvalidArgument(format!(
                "mapping of {} bytes at {} overflows",
                size, position
            ))
        })?;

        let mut map_options = MmapOptions::new();
        map_options.offset(position).len(size);
        let region = match mode {
            MapMode::ReadOnly => {
                if end > file.metadata()?.len() {
                    return Err(ChannelError::InvalidArgument(format!(
                        "read-only mapping [{}, {}) extends past end of object",
                        position, end
                    )));
                }
                // SAFETY: the mirror is private to this channel and is not
                // truncated while a caller holds the mapping through `&mut self`.
                MappedRegion::ReadOnly(unsafe { map_options.map(&*file)? })
            }
            MapMode::ReadWrite => {
                if end > file.metadata()?.len() {
                    file.set_len(end)?;
                }
                // SAFETY: as above; the file is opened read-write.
                MappedRegion::ReadWrite(unsafe { map_options.map_mut(&*file)? })
            }
        };
        Ok(region)
    }

    /// Uploads the mirror now, whatever the immediate-sync mode
    pub fn force(&self, write_metadata: bool) -> ChannelResult<()> {
        self.mirror()?;
        self.sync(write_metadata)
    }

    /// Cross-process locks do not exist on object stores
    pub fn lock(&self) -> ChannelResult<()> {
        Err(ChannelError::UnsupportedOperation(
            "object stores provide no lock primitive".to_string(),
        ))
    }

    /// Cross-process locks do not exist on object stores
    pub fn try_lock(&self) -> ChannelResult<bool> {
        Err(ChannelError::UnsupportedOperation(
            "object stores provide no lock primitive".to_string(),
        ))
    }

    fn sync_permitted(&self) -> bool {
        self.options.is_writable() || self.options.immediate_sync().is_some()
    }

    fn sync(&self, write_metadata: bool) -> ChannelResult<()> {
        let mirror = self.mirror()?;
        self.sync_from(mirror.path(), write_metadata)
    }

    /// The synchronization protocol
    ///
    /// pre-hook, payload, object description, upload, post-hook. The counter
    /// only moves when every step succeeded.
    fn sync_from(&self, mirror: &Path, write_metadata: bool) -> ChannelResult<()> {
        if !self.sync_permitted() {
            return Ok(());
        }

        let ctx = SyncContext {
            path: &self.path,
            options: &self.options,
            attributes: &self.attributes,
            config: &self.context.config,
            completed_syncs: self.syncs.get(),
        };
        let transport = self.context.transport.as_ref();
        let store = self.context.store.as_ref();

        transport.pre_sync(&ctx, write_metadata)?;
        let payload = transport.create_payload(mirror)?;
        let bytes = payload.len();
        let blob = transport.build_blob(&ctx, payload, write_metadata);
        let mut put_options = self.attributes.put_options().cloned().unwrap_or_default();
        // Conditional puts chain on our own previous upload.
        if put_options.if_match.is_some() {
            if let Some(etag) = self.last_etag.lock().clone() {
                put_options.if_match = Some(etag);
            }
        }
        let etag = transport.store(
            store,
            self.path.container(),
            blob,
            &put_options,
            write_metadata,
        )?;
        *self.last_etag.lock() = Some(etag.clone());
        transport.post_sync(store, &ctx, write_metadata)?;

        let count = self.syncs.increment();
        tracing::debug!(
            path = %self.path,
            bytes,
            %etag,
            write_metadata,
            syncs = count,
            "synchronized mirror to store"
        );
        Ok(())
    }

    /// Closes the channel
    ///
    /// The mirror handle is flushed and closed, one final synchronization
    /// with metadata runs (or, with `DeleteOnClose`, the remote object is
    /// removed instead), and the mirror file is deleted whatever happened.
    /// Closing twice is a no-op.
    pub fn close(&mut self) -> ChannelResult<()> {
        let mirror = match self.mirror.take() {
            Some(mirror) => mirror,
            None => return Ok(()),
        };

        let released = mirror.release();
        let outcome = match &released {
            Ok(_) if self.options.contains(OpenMode::DeleteOnClose) => self
                .context
                .store
                .remove(self.path.container(), self.path.key())
                .map_err(ChannelError::from),
            Ok(path) => self.sync_from(path, true),
            Err(_) => Ok(()),
        };

        let released = released?;
        let mirror_path = released.to_path_buf();
        if let Err(err) = released.close() {
            tracing::warn!(
                path = %self.path,
                mirror = %mirror_path.display(),
                error = %err,
                "failed to delete local mirror"
            );
        }

        if let Err(err) = &outcome {
            tracing::warn!(path = %self.path, error = %err, "final synchronization failed");
        }
        outcome
    }
}

impl Drop for BlobChannel {
    fn drop(&mut self) {
        if self.is_open() {
            if let Err(err) = self.close() {
                tracing::warn!(path = %self.path, error = %err, "error closing dropped channel");
            }
        }
    }
}

impl Read for BlobChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(BlobChannel::read(self, buf)?)
    }
}

impl Write for BlobChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(BlobChannel::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for BlobChannel {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let file = self.mirror_mut()?.file_mut();
        file.seek(pos)
    }
}
