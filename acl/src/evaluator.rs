//! Allow/deny resolution
//!
//! Evaluation is a pure union/intersection test over the entries that apply to
//! a request. There is no "more specific principal wins" rule: a deny for any
//! applicable principal beats an allow for any other.

use crate::{AclDecision, AclEntrySet, PermissionSet, Principal};
use std::collections::BTreeSet;

/// Who is asking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requester {
    /// The requesting principal, if known
    pub principal: Option<Principal>,
    /// Groups the requester belongs to, if known
    pub groups: Option<BTreeSet<Principal>>,
}

impl Requester {
    /// An unidentified requester
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A requester with no declared groups
    pub fn new(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            groups: None,
        }
    }

    /// Declares group membership
    pub fn with_groups<I>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = Principal>,
    {
        self.groups = Some(groups.into_iter().collect());
        self
    }
}

/// Permissions granted and refused to one requester
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveAccess {
    pub allowed: PermissionSet,
    pub denied: PermissionSet,
}

impl EffectiveAccess {
    /// True iff every requested permission is allowed and none is denied
    pub fn permits(&self, requested: &PermissionSet) -> bool {
        requested.is_subset(&self.allowed) && requested.is_disjoint(&self.denied)
    }
}

/// The access evaluator
pub struct AccessEvaluator;

impl AccessEvaluator {
    /// Builds the applicable principal set for a request
    ///
    /// The requester, each of its groups and both anonymous singletons. The
    /// anonymous principals apply whether or not the requester is known.
    pub fn applicable_principals(
        requester: Option<&Principal>,
        requester_groups: Option<&BTreeSet<Principal>>,
    ) -> BTreeSet<Principal> {
        let mut applicable = BTreeSet::new();
        if let Some(principal) = requester {
            applicable.insert(principal.clone());
        }
        if let Some(groups) = requester_groups {
            applicable.extend(groups.iter().cloned());
        }
        applicable.insert(Principal::AnonymousUser);
        applicable.insert(Principal::AnonymousGroup);
        applicable
    }

    /// Computes the allowed and denied unions for a request
    pub fn effective_access(
        entries: &AclEntrySet,
        requester: Option<&Principal>,
        requester_groups: Option<&BTreeSet<Principal>>,
    ) -> EffectiveAccess {
        let applicable = Self::applicable_principals(requester, requester_groups);
        let mut access = EffectiveAccess::default();
        for entry in entries.iter().filter(|e| applicable.contains(&e.principal)) {
            let target = match entry.decision {
                AclDecision::Allow => &mut access.allowed,
                AclDecision::Deny => &mut access.denied,
            };
            target.extend(entry.permissions.iter().copied());
        }
        access
    }

    /// Returns true iff the request is fully allowed and not denied
    pub fn check_access(
        entries: &AclEntrySet,
        requester: Option<&Principal>,
        requester_groups: Option<&BTreeSet<Principal>>,
        requested: &PermissionSet,
    ) -> bool {
        Self::effective_access(entries, requester, requester_groups).permits(requested)
    }

    /// `check_access` for a `Requester`
    pub fn check(entries: &AclEntrySet, requester: &Requester, requested: &PermissionSet) -> bool {
        Self::check_access(
            entries,
            requester.principal.as_ref(),
            requester.groups.as_ref(),
            requested,
        )
    }
}
