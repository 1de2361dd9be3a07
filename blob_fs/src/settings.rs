//! Settings persistence
//!
//! Settings are stored as pretty-printed JSON carrying a format version.
//! Loading rejects any version other than the current one.

use crate::{FsError, FsResult};
use acl::Principal;
use blob_channel::ChannelConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for one file-system facade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsSettings {
    /// Version of the settings format (for future migrations)
    pub version: u32,
    /// Configuration handed to every channel
    #[serde(default)]
    pub channel: ChannelConfig,
    /// Owner of the ACLs synthesized by store-backed views
    pub owner: Principal,
}

impl FsSettings {
    /// Current version of the settings format
    pub const CURRENT_VERSION: u32 = 1;

    /// Current-version settings with default channel configuration
    pub fn new(owner: Principal) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            channel: ChannelConfig::default(),
            owner,
        }
    }

    /// Replaces the channel configuration
    pub fn with_channel(mut self, channel: ChannelConfig) -> Self {
        self.channel = channel;
        self
    }

    /// Serializes to JSON bytes
    pub fn to_json(&self) -> FsResult<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| FsError::SerializationFailed(e.to_string()))
    }

    /// Deserializes from JSON bytes
    pub fn from_json(bytes: &[u8]) -> FsResult<Self> {
        let settings: FsSettings = serde_json::from_slice(bytes)
            .map_err(|e| FsError::DeserializationFailed(e.to_string()))?;

        if settings.version != Self::CURRENT_VERSION {
            return Err(FsError::UnsupportedVersion(settings.version));
        }

        Ok(settings)
    }

    /// Loads settings from a file
    pub fn load(path: &Path) -> FsResult<Self> {
        let bytes = fs::read(path)?;
        let settings = Self::from_json(&bytes)?;
        tracing::debug!(path = %path.display(), owner = %settings.owner, "loaded settings");
        Ok(settings)
    }

    /// Saves settings to a file
    pub fn save(&self, path: &Path) -> FsResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl Default for FsSettings {
    fn default() -> Self {
        Self::new(Principal::user("root"))
    }
}
