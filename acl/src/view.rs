//! ACL persistence collaborator

use crate::{AclEntry, AclEntrySet, AclResult, Principal};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What kind of object an ACL guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AclObjectKind {
    File,
    Directory,
    Container,
}

/// An ACL as read from an attribute view
#[derive(Debug, Clone, PartialEq)]
pub struct AclFileAttributes {
    pub entries: AclEntrySet,
    pub kind: AclObjectKind,
}

impl AclFileAttributes {
    /// Bundles an entry set with its object kind
    pub fn new(entries: AclEntrySet, kind: AclObjectKind) -> Self {
        Self { entries, kind }
    }

    /// Returns the owners
    pub fn owners(&self) -> &BTreeSet<Principal> {
        self.entries.owners()
    }
}

/// Reads and persists the ACL of one object
pub trait AclAttributeView {
    /// Reads the current ACL
    fn read_acl(&self) -> AclResult<AclFileAttributes>;

    /// Persists an entry set, returning the entries that could not be applied
    fn write_acl(&self, entries: &AclEntrySet) -> AclResult<Vec<AclEntry>>;
}

/// View that stores the entry set verbatim
#[derive(Debug)]
pub struct MemoryAclView {
    attributes: Mutex<AclFileAttributes>,
}

impl MemoryAclView {
    /// Creates a view holding `entries`
    pub fn new(entries: AclEntrySet, kind: AclObjectKind) -> Self {
        Self {
            attributes: Mutex::new(AclFileAttributes::new(entries, kind)),
        }
    }

    /// Creates a view of an empty file ACL owned by `owner`
    pub fn owned_by(owner: Principal) -> Self {
        Self::new(AclEntrySet::new(owner), AclObjectKind::File)
    }
}

impl AclAttributeView for MemoryAclView {
    fn read_acl(&self) -> AclResult<AclFileAttributes> {
        Ok(self.attributes.lock().clone())
    }

    fn write_acl(&self, entries: &AclEntrySet) -> AclResult<Vec<AclEntry>> {
        self.attributes.lock().entries = entries.clone();
        Ok(Vec::new())
    }
}

impl<V: AclAttributeView + ?Sized> AclAttributeView for &V {
    fn read_acl(&self) -> AclResult<AclFileAttributes> {
        (**self).read_acl()
    }

    fn write_acl(&self, entries: &AclEntrySet) -> AclResult<Vec<AclEntry>> {
        (**self).write_acl(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AclPermission;

    #[test]
    fn test_memory_view_round_trip() {
        let owner = Principal::user("owner");
        let view = MemoryAclView::owned_by(owner.clone());

        let mut attrs = view.read_acl().unwrap();
        assert!(attrs.entries.is_empty());
        assert_eq!(attrs.kind, AclObjectKind::File);
        assert!(attrs.owners().contains(&owner));

        attrs
            .entries
            .insert(&owner, AclEntry::allow(owner.clone(), [AclPermission::ReadData]), false)
            .unwrap();
        let unset = view.write_acl(&attrs.entries).unwrap();
        assert!(unset.is_empty());
        assert_eq!(view.read_acl().unwrap().entries.size(), 1);
    }
}
