//! Principals and principal kinds

use blob_store::AccessLevel;
use core::fmt;
use serde::{Deserialize, Serialize};

/// An identity against which permissions are evaluated
///
/// Equality is by variant plus id. The two anonymous variants are singletons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Principal {
    /// A named user
    User(String),
    /// A named group
    Group(String),
    /// Matches any requester, known or not
    AnonymousUser,
    /// Matches the implicit group every requester belongs to
    AnonymousGroup,
    /// Mirrors the store-native public/private switch of an object
    AccessLevel(AccessLevel),
}

impl Principal {
    /// Creates a user principal
    pub fn user(id: impl Into<String>) -> Self {
        Principal::User(id.into())
    }

    /// Creates a group principal
    pub fn group(id: impl Into<String>) -> Self {
        Principal::Group(id.into())
    }

    /// Returns the kind of this principal
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::User(_) => PrincipalKind::User,
            Principal::Group(_) => PrincipalKind::Group,
            Principal::AnonymousUser => PrincipalKind::AnonymousUser,
            Principal::AnonymousGroup => PrincipalKind::AnonymousGroup,
            Principal::AccessLevel(_) => PrincipalKind::AccessLevel,
        }
    }

    /// Returns the principal's name
    pub fn name(&self) -> String {
        match self {
            Principal::User(id) | Principal::Group(id) => id.clone(),
            Principal::AnonymousUser => "anonymous-user".to_string(),
            Principal::AnonymousGroup => "anonymous-group".to_string(),
            Principal::AccessLevel(level) => level.to_string(),
        }
    }

    /// Returns true for group-like principals
    pub fn is_group(&self) -> bool {
        matches!(self, Principal::Group(_) | Principal::AnonymousGroup)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Principal::User(id) => write!(f, "user:{}", id),
            Principal::Group(id) => write!(f, "group:{}", id),
            Principal::AnonymousUser => write!(f, "anonymous-user"),
            Principal::AnonymousGroup => write!(f, "anonymous-group"),
            Principal::AccessLevel(level) => write!(f, "access-level:{}", level),
        }
    }
}

/// Kind of principal, used to filter entry sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalKind {
    User,
    Group,
    AnonymousUser,
    AnonymousGroup,
    AccessLevel,
}

impl PrincipalKind {
    /// Returns true if a filter on this kind admits principals of `other`
    ///
    /// | Filter | Admits |
    /// |---|---|
    /// | `User` | `User`, `AnonymousUser` |
    /// | `Group` | `Group`, `AnonymousGroup` |
    /// | anything else | exactly itself |
    ///
    /// A `User` filter never admits a group and a `Group` filter never admits
    /// a user.
    pub fn admits(self, other: PrincipalKind) -> bool {
        match self {
            PrincipalKind::User => {
                matches!(other, PrincipalKind::User | PrincipalKind::AnonymousUser)
            }
            PrincipalKind::Group => {
                matches!(other, PrincipalKind::Group | PrincipalKind::AnonymousGroup)
            }
            exact => exact == other,
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalKind::User => write!(f, "User"),
            PrincipalKind::Group => write!(f, "Group"),
            PrincipalKind::AnonymousUser => write!(f, "AnonymousUser"),
            PrincipalKind::AnonymousGroup => write!(f, "AnonymousGroup"),
            PrincipalKind::AccessLevel => write!(f, "AccessLevel"),
        }
    }
}
