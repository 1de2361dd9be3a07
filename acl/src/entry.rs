//! ACL entries

use crate::{AclEntryFlag, AclPermission, PermissionSet, Principal};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Verdict attached to an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AclDecision {
    Allow,
    Deny,
}

impl AclDecision {
    /// Returns the opposite decision
    pub fn opposite(self) -> Self {
        match self {
            AclDecision::Allow => AclDecision::Deny,
            AclDecision::Deny => AclDecision::Allow,
        }
    }
}

impl fmt::Display for AclDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AclDecision::Allow => write!(f, "ALLOW"),
            AclDecision::Deny => write!(f, "DENY"),
        }
    }
}

/// One `(principal, decision, permissions)` rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AclEntry {
    pub principal: Principal,
    pub decision: AclDecision,
    pub permissions: PermissionSet,
    #[serde(default)]
    pub flags: BTreeSet<AclEntryFlag>,
}

impl AclEntry {
    /// Creates an entry
    pub fn new<I>(principal: Principal, decision: AclDecision, permissions: I) -> Self
    where
        I: IntoIterator<Item = AclPermission>,
    {
        Self {
            principal,
            decision,
            permissions: permissions.into_iter().collect(),
            flags: BTreeSet::new(),
        }
    }

    /// Creates an allow entry
    pub fn allow<I>(principal: Principal, permissions: I) -> Self
    where
        I: IntoIterator<Item = AclPermission>,
    {
        Self::new(principal, AclDecision::Allow, permissions)
    }

    /// Creates a deny entry
    pub fn deny<I>(principal: Principal, permissions: I) -> Self
    where
        I: IntoIterator<Item = AclPermission>,
    {
        Self::new(principal, AclDecision::Deny, permissions)
    }

    /// Adds inheritance flags
    pub fn with_flags<I>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = AclEntryFlag>,
    {
        self.flags.extend(flags);
        self
    }

    /// Returns true if both entries share at least one permission
    pub fn overlaps(&self, other: &AclEntry) -> bool {
        !self.permissions.is_disjoint(&other.permissions)
    }

    /// Returns true if both entries name the same principal and decision and
    /// share at least one permission
    pub fn overlaps_same_rule(&self, other: &AclEntry) -> bool {
        self.principal == other.principal
            && self.decision == other.decision
            && self.overlaps(other)
    }
}

impl fmt::Display for AclEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let permissions: Vec<String> = self.permissions.iter().map(|p| p.to_string()).collect();
        write!(
            f,
            "{} {} [{}]",
            self.principal,
            self.decision,
            permissions.join(", ")
        )
    }
}
