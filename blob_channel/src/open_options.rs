//! Open-mode sets

use crate::{ChannelError, ChannelResult};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One open flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenMode {
    Read,
    Write,
    Append,
    TruncateExisting,
    Create,
    CreateNew,
    DeleteOnClose,
    /// Accepted and ignored; object stores have no sparse representation
    Sparse,
    /// Upload data and metadata after every mutation
    Sync,
    /// Upload data after every mutation
    Dsync,
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpenMode::Read => "READ",
            OpenMode::Write => "WRITE",
            OpenMode::Append => "APPEND",
            OpenMode::TruncateExisting => "TRUNCATE_EXISTING",
            OpenMode::Create => "CREATE",
            OpenMode::CreateNew => "CREATE_NEW",
            OpenMode::DeleteOnClose => "DELETE_ON_CLOSE",
            OpenMode::Sparse => "SPARSE",
            OpenMode::Sync => "SYNC",
            OpenMode::Dsync => "DSYNC",
        };
        write!(f, "{}", name)
    }
}

/// The set of flags for one open
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOptions {
    modes: BTreeSet<OpenMode>,
}

impl OpenOptions {
    /// An empty set; validation turns it into a read-only open
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from flags
    pub fn from_modes<I>(modes: I) -> Self
    where
        I: IntoIterator<Item = OpenMode>,
    {
        Self {
            modes: modes.into_iter().collect(),
        }
    }

    /// Adds a flag
    pub fn with(mut self, mode: OpenMode) -> Self {
        self.modes.insert(mode);
        self
    }

    /// True if `mode` was requested
    pub fn contains(&self, mode: OpenMode) -> bool {
        self.modes.contains(&mode)
    }

    /// Iterates the requested flags in order
    pub fn modes(&self) -> impl Iterator<Item = OpenMode> + '_ {
        self.modes.iter().copied()
    }

    /// True if reads are permitted
    pub fn is_readable(&self) -> bool {
        self.contains(OpenMode::Read)
    }

    /// True if writes are permitted
    pub fn is_writable(&self) -> bool {
        self.contains(OpenMode::Write) || self.contains(OpenMode::Append)
    }

    /// True if the object may be created by this open
    pub fn may_create(&self) -> bool {
        self.contains(OpenMode::Create) || self.contains(OpenMode::CreateNew)
    }

    /// Upload policy after each mutation
    ///
    /// `Some(true)` uploads data and metadata (`Sync`), `Some(false)` uploads
    /// data only (`Dsync`), `None` waits for `force` or `close`.
    pub fn immediate_sync(&self) -> Option<bool> {
        if self.contains(OpenMode::Sync) {
            Some(true)
        } else if self.contains(OpenMode::Dsync) {
            Some(false)
        } else {
            None
        }
    }

    /// Rejects meaningless combinations and fills in the implied read flag
    pub fn validated(mut self) -> ChannelResult<Self> {
        if self.contains(OpenMode::Append) {
            if self.contains(OpenMode::Read) {
                return Err(ChannelError::InvalidArgument(
                    "APPEND + READ not allowed".to_string(),
                ));
            }
            if self.contains(OpenMode::TruncateExisting) {
                return Err(ChannelError::InvalidArgument(
                    "APPEND + TRUNCATE_EXISTING not allowed".to_string(),
                ));
            }
        }
        if !self.is_readable() && !self.is_writable() {
            self.modes.insert(OpenMode::Read);
        }
        Ok(self)
    }
}

impl fmt::Display for OpenOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.modes.iter().map(|m| m.to_string()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

impl<const N: usize> From<[OpenMode; N]> for OpenOptions {
    fn from(modes: [OpenMode; N]) -> Self {
        Self::from_modes(modes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_defaults_to_read() {
        let options = OpenOptions::new().validated().unwrap();
        assert!(options.is_readable());
        assert!(!options.is_writable());
    }

    #[test]
    fn test_append_combinations_rejected() {
        let read_append = OpenOptions::from([OpenMode::Append, OpenMode::Read]).validated();
        assert!(matches!(read_append, Err(ChannelError::InvalidArgument(_))));

        let truncate_append =
            OpenOptions::from([OpenMode::Append, OpenMode::TruncateExisting]).validated();
        assert!(matches!(truncate_append, Err(ChannelError::InvalidArgument(_))));
    }

    #[test]
    fn test_append_is_writable() {
        let options = OpenOptions::from([OpenMode::Append]).validated().unwrap();
        assert!(options.is_writable());
        assert!(!options.is_readable());
    }

    #[test]
    fn test_immediate_sync_precedence() {
        assert_eq!(OpenOptions::from([OpenMode::Dsync]).immediate_sync(), Some(false));
        assert_eq!(
            OpenOptions::from([OpenMode::Dsync, OpenMode::Sync]).immediate_sync(),
            Some(true)
        );
        assert_eq!(OpenOptions::from([OpenMode::Write]).immediate_sync(), None);
    }

    #[test]
    fn test_display() {
        let options = OpenOptions::from([OpenMode::CreateNew, OpenMode::Write]);
        assert_eq!(options.to_string(), "[WRITE, CREATE_NEW]");
    }
}
