//! Conflict detection between ACL entries

use crate::AclEntry;

/// How a candidate entry relates to an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictVerdict {
    /// The entries can coexist
    Compatible,
    /// Same rule restated: same principal and decision with overlapping permissions
    Redundant,
    /// Same principal, opposite decision, overlapping permissions
    Conflicting,
}

/// Pluggable predicate deciding whether two entries clash
pub trait ConflictChecker: Send + Sync {
    /// Classifies `candidate` against `existing`
    fn verdict(&self, existing: &AclEntry, candidate: &AclEntry) -> ConflictVerdict;
}

/// Default conflict policy
///
/// Different principals or disjoint permissions never clash. Otherwise the
/// same decision is redundant and the opposite decision is a conflict.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConflictChecker;

impl ConflictChecker for DefaultConflictChecker {
    fn verdict(&self, existing: &AclEntry, candidate: &AclEntry) -> ConflictVerdict {
        if existing.principal != candidate.principal || !existing.overlaps(candidate) {
            return ConflictVerdict::Compatible;
        }
        if existing.decision == candidate.decision {
            ConflictVerdict::Redundant
        } else {
            ConflictVerdict::Conflicting
        }
    }
}
