//! Attribute lookup registry
//!
//! Open-time options and metadata arrive as a list of `FileAttribute`s. The
//! registry keys them by `(AttributeKind, ValueType)` so that one kind may
//! carry several differently typed values side by side, such as a
//! `Permissions` attribute holding an ACL list next to one holding POSIX bits.

use crate::error::AttributeError;
use acl::AclEntry;
use blob_store::{AccessLevel, GetOptions, PutOptions};
use std::collections::{BTreeMap, HashMap};

/// What an attribute describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKind {
    ContentType,
    ContentEncoding,
    ContentLanguage,
    ContentDisposition,
    UserMetadata,
    GetOptions,
    PutOptions,
    AccessLevel,
    Permissions,
}

/// The type of an attribute's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    Text,
    Metadata,
    GetOptions,
    PutOptions,
    AccessLevel,
    AclEntries,
    PosixBits,
}

/// A typed attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Metadata(BTreeMap<String, String>),
    GetOptions(GetOptions),
    PutOptions(PutOptions),
    AccessLevel(AccessLevel),
    AclEntries(Vec<AclEntry>),
    PosixBits(u32),
}

impl AttributeValue {
    /// Returns the type tag of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            AttributeValue::Text(_) => ValueType::Text,
            AttributeValue::Metadata(_) => ValueType::Metadata,
            AttributeValue::GetOptions(_) => ValueType::GetOptions,
            AttributeValue::PutOptions(_) => ValueType::PutOptions,
            AttributeValue::AccessLevel(_) => ValueType::AccessLevel,
            AttributeValue::AclEntries(_) => ValueType::AclEntries,
            AttributeValue::PosixBits(_) => ValueType::PosixBits,
        }
    }
}

/// One `(kind, value)` attribute
///
/// The value is optional so that callers can hand over attributes exactly as
/// they received them; the registry refuses absent values.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAttribute {
    pub kind: AttributeKind,
    pub value: Option<AttributeValue>,
}

impl FileAttribute {
    /// Creates an attribute carrying `value`
    pub fn new(kind: AttributeKind, value: AttributeValue) -> Self {
        Self {
            kind,
            value: Some(value),
        }
    }

    /// Content type, optionally with a `charset` parameter
    pub fn content_type(content_type: impl Into<String>) -> Self {
        Self::new(AttributeKind::ContentType, AttributeValue::Text(content_type.into()))
    }

    /// Content encoding
    pub fn content_encoding(encoding: impl Into<String>) -> Self {
        Self::new(AttributeKind::ContentEncoding, AttributeValue::Text(encoding.into()))
    }

    /// Content language
    pub fn content_language(language: impl Into<String>) -> Self {
        Self::new(AttributeKind::ContentLanguage, AttributeValue::Text(language.into()))
    }

    /// Content disposition
    pub fn content_disposition(disposition: impl Into<String>) -> Self {
        Self::new(
            AttributeKind::ContentDisposition,
            AttributeValue::Text(disposition.into()),
        )
    }

    /// User metadata attached to the uploaded object
    pub fn user_metadata(metadata: BTreeMap<String, String>) -> Self {
        Self::new(AttributeKind::UserMetadata, AttributeValue::Metadata(metadata))
    }

    /// Options for the open-time download
    pub fn get_options(options: GetOptions) -> Self {
        Self::new(AttributeKind::GetOptions, AttributeValue::GetOptions(options))
    }

    /// Options for every upload
    pub fn put_options(options: PutOptions) -> Self {
        Self::new(AttributeKind::PutOptions, AttributeValue::PutOptions(options))
    }

    /// Access level applied after every upload
    pub fn access_level(level: AccessLevel) -> Self {
        Self::new(AttributeKind::AccessLevel, AttributeValue::AccessLevel(level))
    }

    /// Returns the `(kind, value type)` key, or `None` if the value is absent
    pub fn key(&self) -> Option<(AttributeKind, ValueType)> {
        self.value.as_ref().map(|v| (self.kind, v.value_type()))
    }
}

/// Immutable `(kind, value type)` keyed registry
///
/// Construction order is remembered so that `get_first` and `get_all` are
/// deterministic. When two attributes share a key the later one wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeLookupMap {
    entries: HashMap<(AttributeKind, ValueType), FileAttribute>,
    order: Vec<(AttributeKind, ValueType)>,
}

impl AttributeLookupMap {
    /// Builds a registry, failing if any attribute has no value
    pub fn new<I>(attributes: I) -> Result<Self, AttributeError>
    where
        I: IntoIterator<Item = FileAttribute>,
    {
        let mut map = Self::default();
        for attribute in attributes {
            let key = attribute.key().ok_or_else(|| {
                AttributeError::InvalidAttributes(format!(
                    "attribute {:?} has no value",
                    attribute.kind
                ))
            })?;
            if map.entries.insert(key, attribute).is_none() {
                map.order.push(key);
            }
        }
        Ok(map)
    }

    /// An empty registry
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no attribute was given
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first attribute of `kind`, whatever its value type
    pub fn get_first(&self, kind: AttributeKind) -> Option<&FileAttribute> {
        self.order
            .iter()
            .find(|(k, _)| *k == kind)
            .and_then(|key| self.entries.get(key))
    }

    /// Returns every attribute of `kind`, whatever its value type
    pub fn get_all(&self, kind: AttributeKind) -> Vec<&FileAttribute> {
        self.order
            .iter()
            .filter(|(k, _)| *k == kind)
            .filter_map(|key| self.entries.get(key))
            .collect()
    }

    /// Returns the attribute matching both kind and value type
    pub fn get_exact(&self, kind: AttributeKind, value_type: ValueType) -> Option<&FileAttribute> {
        self.entries.get(&(kind, value_type))
    }

    fn value(&self, kind: AttributeKind, value_type: ValueType) -> Option<&AttributeValue> {
        self.get_exact(kind, value_type)
            .and_then(|attribute| attribute.value.as_ref())
    }

    /// Returns a text-valued attribute
    pub fn text(&self, kind: AttributeKind) -> Option<&str> {
        match self.value(kind, ValueType::Text) {
            Some(AttributeValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns the user-metadata attribute
    pub fn user_metadata(&self) -> Option<&BTreeMap<String, String>> {
        match self.value(AttributeKind::UserMetadata, ValueType::Metadata) {
            Some(AttributeValue::Metadata(metadata)) => Some(metadata),
            _ => None,
        }
    }

    /// Returns the get-options attribute
    pub fn get_options(&self) -> Option<&GetOptions> {
        match self.value(AttributeKind::GetOptions, ValueType::GetOptions) {
            Some(AttributeValue::GetOptions(options)) => Some(options),
            _ => None,
        }
    }

    /// Returns the put-options attribute
    pub fn put_options(&self) -> Option<&PutOptions> {
        match self.value(AttributeKind::PutOptions, ValueType::PutOptions) {
            Some(AttributeValue::PutOptions(options)) => Some(options),
            _ => None,
        }
    }

    /// Returns the access-level attribute
    pub fn access_level(&self) -> Option<AccessLevel> {
        match self.value(AttributeKind::AccessLevel, ValueType::AccessLevel) {
            Some(AttributeValue::AccessLevel(level)) => Some(*level),
            _ => None,
        }
    }
}
