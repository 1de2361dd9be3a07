//! Integration tests for ACL evaluation
//!
//! These tests drive the entry set, the filtered iterator and the evaluator
//! together the way a file attribute view does.

use acl::{
    AccessEvaluator, AclEntry, AclEntrySet, AclError, AclPermission, PermissionSet, Principal,
    PrincipalKind, Requester,
};
use blob_store::AccessLevel;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn owner() -> Principal {
    Principal::user("root")
}

#[test]
fn test_iterator_partitions_mixed_set() {
    let mut set = AclEntrySet::new(owner());
    set.insert_all(
        &owner(),
        vec![
            AclEntry::allow(Principal::user("alice"), [AclPermission::ReadData]),
            AclEntry::deny(Principal::group("interns"), [AclPermission::WriteData]),
            AclEntry::allow(
                Principal::AccessLevel(AccessLevel::Private),
                [AclPermission::ReadData],
            ),
        ],
    )
    .unwrap();

    let mut iter = set.iter_kind(PrincipalKind::User);
    let users: Vec<&AclEntry> = iter.by_ref().collect();
    assert_eq!(users, vec![&set.entries()[0]]);

    iter.reset(PrincipalKind::Group);
    let groups: Vec<&AclEntry> = iter.by_ref().collect();
    assert_eq!(groups, vec![&set.entries()[1]]);

    iter.reset(PrincipalKind::AccessLevel);
    let levels: Vec<&AclEntry> = iter.collect();
    assert_eq!(levels, vec![&set.entries()[2]]);
}

#[test]
fn test_deny_overrides_across_principal_specificity() {
    let mut set = AclEntrySet::new(owner());
    let alice = Principal::user("alice");
    let devs = Principal::group("devs");
    set.insert_all(
        &owner(),
        vec![
            AclEntry::allow(alice.clone(), AclPermission::ALL),
            AclEntry::deny(devs.clone(), [AclPermission::Delete]),
        ],
    )
    .unwrap();

    let requester = Requester::new(alice.clone()).with_groups([devs]);
    assert!(AccessEvaluator::check(
        &set,
        &requester,
        &PermissionSet::from([AclPermission::ReadData, AclPermission::WriteData])
    ));
    assert!(!AccessEvaluator::check(
        &set,
        &requester,
        &PermissionSet::from([AclPermission::Delete])
    ));

    // without declaring the group the deny does not apply
    assert!(AccessEvaluator::check(
        &set,
        &Requester::new(alice),
        &PermissionSet::from([AclPermission::Delete])
    ));
}

#[test]
fn test_conflict_then_force_changes_verdict() {
    let mut set = AclEntrySet::new(owner());
    let bob = Principal::user("bob");
    set.insert(&owner(), AclEntry::allow(bob.clone(), [AclPermission::WriteData]), false)
        .unwrap();

    let deny = AclEntry::deny(bob.clone(), [AclPermission::WriteData]);
    let err = set.insert(&owner(), deny.clone(), false).unwrap_err();
    assert!(matches!(err, AclError::ConflictingAcl { .. }));

    let write = PermissionSet::from([AclPermission::WriteData]);
    assert!(AccessEvaluator::check_access(&set, Some(&bob), None, &write));

    set.insert(&owner(), deny, true).unwrap();
    assert!(!AccessEvaluator::check_access(&set, Some(&bob), None, &write));
}

fn permission_strategy() -> impl Strategy<Value = AclPermission> {
    prop::sample::select(AclPermission::ALL.to_vec())
}

fn permission_set_strategy() -> impl Strategy<Value = PermissionSet> {
    prop::collection::btree_set(permission_strategy(), 1..5)
}

proptest! {
    /// A deny for any applicable principal refuses every overlapping request
    #[test]
    fn deny_always_wins(
        allowed in permission_set_strategy(),
        denied in permission_set_strategy(),
        requested in permission_set_strategy(),
    ) {
        let alice = Principal::user("alice");
        let staff = Principal::group("staff");
        let mut set = AclEntrySet::new(owner());
        let allow = AclEntry::allow(staff.clone(), allowed.iter().copied());
        set.insert(&owner(), allow, false).unwrap();
        set.insert(&owner(), AclEntry::deny(alice.clone(), denied.iter().copied()), false).unwrap();

        let groups = BTreeSet::from([staff]);
        let granted = AccessEvaluator::check_access(&set, Some(&alice), Some(&groups), &requested);

        let expected = requested.is_subset(&allowed) && requested.is_disjoint(&denied);
        prop_assert_eq!(granted, expected);
    }

    /// Nothing is granted by an empty entry set
    #[test]
    fn empty_set_grants_nothing(requested in permission_set_strategy()) {
        let set = AclEntrySet::new(owner());
        let stranger = Principal::user("x");
        prop_assert!(!AccessEvaluator::check_access(&set, Some(&stranger), None, &requested));
    }
}
