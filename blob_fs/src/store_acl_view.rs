//! ACL view backed by a store's access level
//!
//! Object stores know exactly one permission switch per object: public-read or
//! private. The view presents that switch as an ACL and maps an edited ACL back
//! onto it. Owners implicitly hold every permission. Entries the switch cannot
//! express are reported back as unset.

use acl::{
    AclAttributeView, AclDecision, AclEntry, AclEntrySet, AclError, AclFileAttributes,
    AclObjectKind, AclPermission, AclResult, Principal,
};
use blob_store::{AccessLevel, BlobPath, BlobStore};
use std::sync::Arc;

/// ACL view of one stored object
#[derive(Clone)]
pub struct StoreAclView {
    store: Arc<dyn BlobStore>,
    path: BlobPath,
    owner: Principal,
}

impl StoreAclView {
    /// Creates a view of the object at `path`, owned by `owner`
    pub fn new(store: Arc<dyn BlobStore>, path: BlobPath, owner: Principal) -> Self {
        Self { store, path, owner }
    }

    /// The object this view describes
    pub fn path(&self) -> &BlobPath {
        &self.path
    }

    fn access_level(&self) -> AclResult<AccessLevel> {
        self.store
            .get_access(self.path.container(), self.path.key())
            .map_err(|e| AclError::View(e.to_string()))
    }

    fn is_read_only(entry: &AclEntry) -> bool {
        entry.permissions.len() == 1 && entry.permissions.contains(&AclPermission::ReadData)
    }

    /// True if the access level can express `entry`
    fn representable(entries: &AclEntrySet, entry: &AclEntry) -> bool {
        match (&entry.principal, entry.decision) {
            (principal, AclDecision::Allow) if entries.is_owner(principal) => true,
            (Principal::AccessLevel(_), AclDecision::Allow) => Self::is_read_only(entry),
            (Principal::AnonymousUser, _) => Self::is_read_only(entry),
            _ => false,
        }
    }
}

impl AclAttributeView for StoreAclView {
    fn read_acl(&self) -> AclResult<AclFileAttributes> {
        let level = self.access_level()?;
        let mut entries = AclEntrySet::new(self.owner.clone());
        entries.insert(
            &self.owner,
            AclEntry::allow(self.owner.clone(), AclPermission::ALL),
            false,
        )?;
        entries.insert(
            &self.owner,
            AclEntry::allow(Principal::AccessLevel(level), [AclPermission::ReadData]),
            false,
        )?;
        if level == AccessLevel::PublicRead {
            entries.insert(
                &self.owner,
                AclEntry::allow(Principal::AnonymousUser, [AclPermission::ReadData]),
                false,
            )?;
        }
        Ok(AclFileAttributes::new(entries, AclObjectKind::File))
    }

    fn write_acl(&self, entries: &AclEntrySet) -> AclResult<Vec<AclEntry>> {
        let (applied, unset): (Vec<&AclEntry>, Vec<&AclEntry>) = entries
            .iter()
            .partition(|entry| Self::representable(entries, entry));

        let granted = applied.iter().any(|entry| {
            entry.decision == AclDecision::Allow
                && matches!(
                    entry.principal,
                    Principal::AnonymousUser | Principal::AccessLevel(AccessLevel::PublicRead)
                )
        });
        let refused = applied.iter().any(|entry| {
            entry.decision == AclDecision::Deny && entry.principal == Principal::AnonymousUser
        });
        let level = if granted && !refused {
            AccessLevel::PublicRead
        } else {
            AccessLevel::Private
        };

        self.store
            .set_access(self.path.container(), self.path.key(), level)
            .map_err(|e| AclError::View(e.to_string()))?;
        tracing::debug!(
            path = %self.path,
            %level,
            unset = unset.len(),
            "applied ACL as access level"
        );

        Ok(unset.into_iter().cloned().collect())
    }
}
