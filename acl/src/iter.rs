//! Principal-filtered iteration over an entry set

use crate::{AclEntry, AclEntrySet, PrincipalKind};

/// Iterator over the entries whose principal passes a kind filter
///
/// The iterator borrows the set and never allocates. `reset` rebinds the
/// filter and rewinds, so one iterator can scan a large set repeatedly, for
/// example all user entries and then all group entries.
#[derive(Debug, Clone)]
pub struct AclEntryIter<'a> {
    entries: &'a [AclEntry],
    kind: PrincipalKind,
    position: usize,
}

impl<'a> AclEntryIter<'a> {
    /// Creates an iterator filtering `set` by `kind`
    pub fn new(set: &'a AclEntrySet, kind: PrincipalKind) -> Self {
        Self {
            entries: set.entries(),
            kind,
            position: 0,
        }
    }

    /// Rebinds the filter and restarts from the first entry
    pub fn reset(&mut self, kind: PrincipalKind) {
        self.kind = kind;
        self.position = 0;
    }

    /// Returns the current filter
    pub fn kind(&self) -> PrincipalKind {
        self.kind
    }
}

impl<'a> Iterator for AclEntryIter<'a> {
    type Item = &'a AclEntry;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.entries.get(self.position) {
            self.position += 1;
            if self.kind.admits(entry.principal.kind()) {
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.entries.len().saturating_sub(self.position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AclPermission, Principal};
    use blob_store::AccessLevel;

    fn mixed_set() -> AclEntrySet {
        let owner = Principal::user("owner");
        let mut set = AclEntrySet::new(owner.clone());
        set.insert_all(
            &owner,
            vec![
                AclEntry::allow(Principal::user("alice"), [AclPermission::ReadData]),
                AclEntry::allow(Principal::group("staff"), [AclPermission::WriteData]),
                AclEntry::allow(
                    Principal::AccessLevel(AccessLevel::PublicRead),
                    [AclPermission::ReadData],
                ),
            ],
        )
        .unwrap();
        set
    }

    #[test]
    fn test_filter_and_reset() {
        let set = mixed_set();
        let mut iter = set.iter_kind(PrincipalKind::User);

        let users: Vec<_> = iter.by_ref().collect();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].principal, Principal::user("alice"));

        iter.reset(PrincipalKind::Group);
        let groups: Vec<_> = iter.by_ref().collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].principal, Principal::group("staff"));

        iter.reset(PrincipalKind::AccessLevel);
        let levels: Vec<_> = iter.by_ref().collect();
        assert_eq!(levels.len(), 1);
        assert_eq!(
            levels[0].principal,
            Principal::AccessLevel(AccessLevel::PublicRead)
        );
    }

    #[test]
    fn test_anonymous_principals_follow_their_family() {
        let owner = Principal::user("owner");
        let mut set = AclEntrySet::new(owner.clone());
        set.insert_all(
            &owner,
            vec![
                AclEntry::allow(Principal::AnonymousUser, [AclPermission::ReadData]),
                AclEntry::allow(Principal::AnonymousGroup, [AclPermission::ReadData]),
            ],
        )
        .unwrap();

        let mut iter = set.iter_kind(PrincipalKind::User);
        assert_eq!(iter.next().unwrap().principal, Principal::AnonymousUser);
        assert!(iter.next().is_none());

        iter.reset(PrincipalKind::Group);
        assert_eq!(iter.next().unwrap().principal, Principal::AnonymousGroup);
        assert!(iter.next().is_none());

        iter.reset(PrincipalKind::AnonymousGroup);
        assert_eq!(iter.count(), 1);
    }

    #[test]
    fn test_empty_set() {
        let set = AclEntrySet::new(Principal::user("owner"));
        let mut iter = set.iter_kind(PrincipalKind::User);
        assert!(iter.next().is_none());
        assert_eq!(iter.size_hint(), (0, Some(0)));
    }
}
