//! ACL errors

use crate::{AclEntry, Principal};
use thiserror::Error;

/// Errors raised while mutating or persisting ACLs
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AclError {
    /// Insertion rejected because an existing entry clashes with it
    #[error("ACL entry {candidate} conflicts with existing entry {existing}")]
    ConflictingAcl {
        existing: Box<AclEntry>,
        candidate: Box<AclEntry>,
    },

    /// The acting principal does not own the entry set
    #[error("{0} is not an owner of this ACL")]
    NotOwner(Principal),

    /// An entry set must keep at least one owner
    #[error("ACL entry set must have at least one owner")]
    NoOwners,

    /// The attribute view could not read or write the ACL
    #[error("ACL attribute view error: {0}")]
    View(String),
}

/// Result type for ACL operations
pub type AclResult<T> = Result<T, AclError>;
