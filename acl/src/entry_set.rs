//! Owned, conflict-checked collection of ACL entries

use crate::{
    AclEntry, AclEntryIter, AclError, AclResult, ConflictChecker, ConflictVerdict,
    DefaultConflictChecker, Principal, PrincipalKind,
};
use core::fmt;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Owners plus entries
///
/// Entries keep insertion order and never repeat. Every mutation names the
/// acting principal, which must be an owner.
#[derive(Clone)]
pub struct AclEntrySet {
    owners: BTreeSet<Principal>,
    entries: Vec<AclEntry>,
    checker: Arc<dyn ConflictChecker>,
}

impl AclEntrySet {
    /// Creates an empty set owned by `owner`
    pub fn new(owner: Principal) -> Self {
        Self {
            owners: BTreeSet::from([owner]),
            entries: Vec::new(),
            checker: Arc::new(DefaultConflictChecker),
        }
    }

    /// Creates an empty set with several owners
    pub fn with_owners<I>(owners: I) -> AclResult<Self>
    where
        I: IntoIterator<Item = Principal>,
    {
        let owners: BTreeSet<Principal> = owners.into_iter().collect();
        if owners.is_empty() {
            return Err(AclError::NoOwners);
        }
        Ok(Self {
            owners,
            entries: Vec::new(),
            checker: Arc::new(DefaultConflictChecker),
        })
    }

    /// Replaces the conflict predicate
    pub fn with_checker(mut self, checker: Arc<dyn ConflictChecker>) -> Self {
        self.checker = checker;
        self
    }

    /// Returns the owners
    pub fn owners(&self) -> &BTreeSet<Principal> {
        &self.owners
    }

    /// Returns true if `principal` owns this set
    pub fn is_owner(&self, principal: &Principal) -> bool {
        self.owners.contains(principal)
    }

    /// Returns the number of entries
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries in insertion order
    pub fn entries(&self) -> &[AclEntry] {
        &self.entries
    }

    /// Iterates over all entries
    pub fn iter(&self) -> std::slice::Iter<'_, AclEntry> {
        self.entries.iter()
    }

    /// Iterates over entries whose principal kind passes the `kind` filter
    pub fn iter_kind(&self, kind: PrincipalKind) -> AclEntryIter<'_> {
        AclEntryIter::new(self, kind)
    }

    /// Returns true if an identical entry is present
    pub fn contains(&self, entry: &AclEntry) -> bool {
        self.entries.contains(entry)
    }

    /// Returns every entry naming `principal`
    pub fn entries_for<'a>(
        &'a self,
        principal: &'a Principal,
    ) -> impl Iterator<Item = &'a AclEntry> + 'a {
        self.entries.iter().filter(move |e| &e.principal == principal)
    }

    fn require_owner(&self, actor: &Principal) -> AclResult<()> {
        if self.is_owner(actor) {
            Ok(())
        } else {
            Err(AclError::NotOwner(actor.clone()))
        }
    }

    /// Adds an owner
    pub fn add_owner(&mut self, actor: &Principal, owner: Principal) -> AclResult<bool> {
        self.require_owner(actor)?;
        Ok(self.owners.insert(owner))
    }

    /// Removes an owner; the last owner cannot be removed
    pub fn remove_owner(&mut self, actor: &Principal, owner: &Principal) -> AclResult<bool> {
        self.require_owner(actor)?;
        if !self.owners.contains(owner) {
            return Ok(false);
        }
        if self.owners.len() == 1 {
            return Err(AclError::NoOwners);
        }
        Ok(self.owners.remove(owner))
    }

    /// Inserts an entry, checking it against every existing entry
    ///
    /// Without `force`, a conflicting entry rejects the insertion and a
    /// redundant entry that already covers every candidate permission makes
    /// it a no-op. With `force`, every conflicting or redundant entry is
    /// removed before the candidate is added.
    ///
    /// Returns true if the candidate was added.
    pub fn insert(&mut self, actor: &Principal, entry: AclEntry, force: bool) -> AclResult<bool> {
        self.require_owner(actor)?;
        if self.entries.contains(&entry) {
            return Ok(false);
        }

        let clashes: Vec<(usize, ConflictVerdict)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, existing)| (i, self.checker.verdict(existing, &entry)))
            .filter(|(_, verdict)| *verdict != ConflictVerdict::Compatible)
            .collect();

        if force {
            if !clashes.is_empty() {
                tracing::debug!(
                    principal = %entry.principal,
                    removed = clashes.len(),
                    "forced ACL insertion replaced clashing entries"
                );
            }
            let mut index = 0;
            self.entries.retain(|_| {
                let keep = !clashes.iter().any(|(i, _)| *i == index);
                index += 1;
                keep
            });
            self.entries.push(entry);
            return Ok(true);
        }

        for (i, verdict) in &clashes {
            let existing = &self.entries[*i];
            match verdict {
                ConflictVerdict::Conflicting => {
                    return Err(AclError::ConflictingAcl {
                        existing: Box::new(existing.clone()),
                        candidate: Box::new(entry),
                    });
                }
                ConflictVerdict::Redundant
                    if entry.permissions.is_subset(&existing.permissions) =>
                {
                    return Ok(false);
                }
                _ => {}
            }
        }

        self.entries.push(entry);
        Ok(true)
    }

    /// Inserts each entry in turn without force, stopping at the first error
    pub fn insert_all<I>(&mut self, actor: &Principal, entries: I) -> AclResult<usize>
    where
        I: IntoIterator<Item = AclEntry>,
    {
        let mut added = 0;
        for entry in entries {
            if self.insert(actor, entry, false)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Removes an identical entry
    pub fn remove(&mut self, actor: &Principal, entry: &AclEntry) -> AclResult<bool> {
        self.require_owner(actor)?;
        let before = self.entries.len();
        self.entries.retain(|e| e != entry);
        Ok(self.entries.len() != before)
    }

    /// Removes every entry, keeping the owners
    pub fn clear(&mut self, actor: &Principal) -> AclResult<()> {
        self.require_owner(actor)?;
        self.entries.clear();
        Ok(())
    }
}

impl PartialEq for AclEntrySet {
    fn eq(&self, other: &Self) -> bool {
        self.owners == other.owners && self.entries == other.entries
    }
}

impl fmt::Debug for AclEntrySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AclEntrySet")
            .field("owners", &self.owners)
            .field("entries", &self.entries)
            .finish()
    }
}

impl<'a> IntoIterator for &'a AclEntrySet {
    type Item = &'a AclEntry;
    type IntoIter = std::slice::Iter<'a, AclEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AclDecision, AclPermission};

    fn owner() -> Principal {
        Principal::user("owner")
    }

    fn set() -> AclEntrySet {
        AclEntrySet::new(owner())
    }

    #[test]
    fn test_insert_and_size() {
        let mut acl = set();
        let entry = AclEntry::allow(Principal::user("alice"), [AclPermission::ReadData]);
        assert!(acl.insert(&owner(), entry.clone(), false).unwrap());
        assert_eq!(acl.size(), 1);
        assert!(acl.contains(&entry));

        // identical entry is not duplicated
        assert!(!acl.insert(&owner(), entry, false).unwrap());
        assert_eq!(acl.size(), 1);
    }

    #[test]
    fn test_conflicting_insert_rejected_without_force() {
        let mut acl = set();
        acl.insert(
            &owner(),
            AclEntry::allow(Principal::user("alice"), [AclPermission::ReadData]),
            false,
        )
        .unwrap();

        let result = acl.insert(
            &owner(),
            AclEntry::deny(
                Principal::user("alice"),
                [AclPermission::ReadData, AclPermission::Execute],
            ),
            false,
        );
        assert!(matches!(result, Err(AclError::ConflictingAcl { .. })));
        assert_eq!(acl.size(), 1);
        assert_eq!(acl.entries()[0].decision, AclDecision::Allow);
    }

    #[test]
    fn test_forced_insert_replaces_conflict() {
        let mut acl = set();
        acl.insert(
            &owner(),
            AclEntry::allow(Principal::user("alice"), [AclPermission::ReadData]),
            false,
        )
        .unwrap();
        acl.insert(
            &owner(),
            AclEntry::allow(Principal::user("bob"), [AclPermission::ReadData]),
            false,
        )
        .unwrap();

        let deny = AclEntry::deny(Principal::user("alice"), [AclPermission::ReadData]);
        assert!(acl.insert(&owner(), deny.clone(), true).unwrap());
        assert_eq!(acl.size(), 2);
        assert_eq!(acl.entries()[0].principal, Principal::user("bob"));
        assert_eq!(acl.entries()[1], deny);
    }

    #[test]
    fn test_redundant_covered_insert_is_noop() {
        let mut acl = set();
        acl.insert(
            &owner(),
            AclEntry::allow(
                Principal::user("alice"),
                [AclPermission::ReadData, AclPermission::WriteData],
            ),
            false,
        )
        .unwrap();

        let added = acl
            .insert(
                &owner(),
                AclEntry::allow(Principal::user("alice"), [AclPermission::ReadData]),
                false,
            )
            .unwrap();
        assert!(!added);
        assert_eq!(acl.size(), 1);
    }

    #[test]
    fn test_redundant_partial_overlap_is_added() {
        let mut acl = set();
        acl.insert(
            &owner(),
            AclEntry::allow(Principal::user("alice"), [AclPermission::ReadData]),
            false,
        )
        .unwrap();

        let added = acl
            .insert(
                &owner(),
                AclEntry::allow(
                    Principal::user("alice"),
                    [AclPermission::ReadData, AclPermission::Execute],
                ),
                false,
            )
            .unwrap();
        assert!(added);
        assert_eq!(acl.size(), 2);
    }

    #[test]
    fn test_non_owner_cannot_mutate() {
        let mut acl = set();
        let intruder = Principal::user("mallory");
        let result = acl.insert(
            &intruder,
            AclEntry::allow(intruder.clone(), [AclPermission::WriteAcl]),
            true,
        );
        assert_eq!(result, Err(AclError::NotOwner(intruder.clone())));
        assert!(acl.is_empty());
        assert!(matches!(acl.clear(&intruder), Err(AclError::NotOwner(_))));
    }

    #[test]
    fn test_insert_all_stops_on_conflict() {
        let mut acl = set();
        let result = acl.insert_all(
            &owner(),
            vec![
                AclEntry::allow(Principal::group("staff"), [AclPermission::ReadData]),
                AclEntry::allow(Principal::AnonymousUser, [AclPermission::ReadAttributes]),
                AclEntry::deny(Principal::group("staff"), [AclPermission::ReadData]),
            ],
        );
        assert!(matches!(result, Err(AclError::ConflictingAcl { .. })));
        assert_eq!(acl.size(), 2);
    }

    #[test]
    fn test_owner_management() {
        let mut acl = set();
        assert!(AclEntrySet::with_owners(Vec::new()).is_err());

        let second = Principal::user("second");
        assert!(acl.add_owner(&owner(), second.clone()).unwrap());
        assert!(acl.is_owner(&second));

        assert!(acl.remove_owner(&second, &owner()).unwrap());
        assert_eq!(acl.owners().len(), 1);
        assert_eq!(acl.remove_owner(&second, &second), Err(AclError::NoOwners));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut acl = set();
        let entry = AclEntry::allow(Principal::user("alice"), [AclPermission::ReadData]);
        acl.insert(&owner(), entry.clone(), false).unwrap();

        assert!(acl.remove(&owner(), &entry).unwrap());
        assert!(!acl.remove(&owner(), &entry).unwrap());

        acl.insert(&owner(), entry, false).unwrap();
        acl.clear(&owner()).unwrap();
        assert!(acl.is_empty());
        assert!(acl.is_owner(&owner()));
    }

    struct RejectAll;

    impl ConflictChecker for RejectAll {
        fn verdict(&self, _existing: &AclEntry, _candidate: &AclEntry) -> ConflictVerdict {
            ConflictVerdict::Conflicting
        }
    }

    #[test]
    fn test_custom_checker() {
        let mut acl = set().with_checker(Arc::new(RejectAll));
        acl.insert(
            &owner(),
            AclEntry::allow(Principal::user("a"), [AclPermission::ReadData]),
            false,
        )
        .unwrap();
        let result = acl.insert(
            &owner(),
            AclEntry::allow(Principal::user("b"), [AclPermission::Execute]),
            false,
        );
        assert!(matches!(result, Err(AclError::ConflictingAcl { .. })));
    }
}
