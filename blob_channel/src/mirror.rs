//! Local mirror files
//!
//! A `LocalMirror` is a private temporary file owned by exactly one channel.
//! Deletion is tied to ownership: dropping the mirror at any point, including
//! halfway through a failed open, removes the file.

use crate::ChannelConfig;
use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;
use tempfile::{Builder, TempPath};

/// The temporary file standing in for remote content while a channel is open
#[derive(Debug)]
pub struct LocalMirror {
    file: File,
    path: TempPath,
}

impl LocalMirror {
    /// Creates an empty mirror as configured
    pub fn create(config: &ChannelConfig) -> io::Result<Self> {
        let mut builder = Builder::new();
        builder.prefix(&config.mirror_prefix);
        let temp = match &config.mirror_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        let (file, path) = temp.into_parts();
        tracing::debug!(path = %path.display(), "created local mirror");
        Ok(Self { file, path })
    }

    /// Replaces the mirror contents and rewinds
    pub fn fill(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(bytes)?;
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Location of the mirror file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The open mirror handle
    pub fn file(&self) -> &File {
        &self.file
    }

    /// The open mirror handle, mutably
    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    /// Flushes and closes the handle, keeping the file on disk
    ///
    /// The returned path still deletes the file when dropped or closed.
    pub fn release(mut self) -> io::Result<TempPath> {
        let flushed = self.file.flush().and_then(|_| self.file.sync_all());
        let Self { file, path } = self;
        drop(file);
        flushed.map(|_| path)
    }
}
