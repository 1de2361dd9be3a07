//! Request options and access levels

use core::fmt;
use core::ops::Range;
use serde::{Deserialize, Serialize};

/// Coarse, store-native access level of a single object
///
/// Object stores generally offer nothing finer than "anyone may read" versus
/// "only the account may read".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Readable by anonymous requesters
    PublicRead,
    /// Readable only by the owning account
    Private,
}

impl Default for AccessLevel {
    fn default() -> Self {
        AccessLevel::Private
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessLevel::PublicRead => write!(f, "public-read"),
            AccessLevel::Private => write!(f, "private"),
        }
    }
}

/// Options for fetching an object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetOptions {
    /// Byte range to fetch (end exclusive); `None` fetches everything
    pub range: Option<Range<u64>>,
    /// Only succeed if the stored ETag matches
    pub if_match: Option<String>,
}

impl GetOptions {
    /// Creates options that fetch the whole object unconditionally
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the fetch to a byte range
    pub fn with_range(mut self, range: Range<u64>) -> Self {
        self.range = Some(range);
        self
    }

    /// Requires the stored ETag to match
    pub fn with_if_match(mut self, etag: impl Into<String>) -> Self {
        self.if_match = Some(etag.into());
        self
    }
}

/// Options for storing an object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutOptions {
    /// Hint that the provider should use a multipart upload
    pub multipart: bool,
    /// Only overwrite if the stored ETag matches
    pub if_match: Option<String>,
}

impl PutOptions {
    /// Creates default put options
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a multipart upload
    pub fn multipart(mut self) -> Self {
        self.multipart = true;
        self
    }

    /// Requires the stored ETag to match before overwriting
    pub fn with_if_match(mut self, etag: impl Into<String>) -> Self {
        self.if_match = Some(etag.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_default_is_private() {
        assert_eq!(AccessLevel::default(), AccessLevel::Private);
    }

    #[test]
    fn test_access_level_display() {
        assert_eq!(AccessLevel::PublicRead.to_string(), "public-read");
        assert_eq!(AccessLevel::Private.to_string(), "private");
    }

    #[test]
    fn test_access_level_serde_names() {
        let json = serde_json::to_string(&AccessLevel::PublicRead).unwrap();
        assert_eq!(json, "\"public_read\"");
    }

    #[test]
    fn test_get_options_builder() {
        let options = GetOptions::new().with_range(2..5).with_if_match("abc");
        assert_eq!(options.range, Some(2..5));
        assert_eq!(options.if_match.as_deref(), Some("abc"));
    }
}
