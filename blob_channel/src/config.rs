//! Channel configuration

use blob_store::DEFAULT_CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Knobs shared by every channel opened from one context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Directory holding local mirrors; `None` uses the system temp dir
    #[serde(default)]
    pub mirror_dir: Option<PathBuf>,
    /// File-name prefix for local mirrors
    #[serde(default = "default_mirror_prefix")]
    pub mirror_prefix: String,
    /// Content type uploaded when no content-type attribute is given
    #[serde(default = "default_content_type")]
    pub default_content_type: String,
}

fn default_mirror_prefix() -> String {
    "blob-mirror-".to_string()
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

impl ChannelConfig {
    /// Keeps mirrors in `dir`
    pub fn with_mirror_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mirror_dir = Some(dir.into());
        self
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            mirror_dir: None,
            mirror_prefix: default_mirror_prefix(),
            default_content_type: default_content_type(),
        }
    }
}
