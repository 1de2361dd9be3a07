//! # Access Control Lists
//!
//! This crate implements the discretionary access-control model layered over
//! object stores that have no permission model of their own.
//!
//! ## Philosophy
//!
//! **No POSIX mode bits.** Access is described by an explicit list of
//! `(principal, decision, permissions)` entries and evaluated with a pure
//! union/intersection test where deny always wins.
//!
//! ## Core Concepts
//!
//! - `Principal`: user, group, the two anonymous singletons, or an access-level
//!   principal mirroring the store's public/private switch
//! - `AclEntry`: allow or deny a set of `AclPermission`s for one principal
//! - `AclEntrySet`: owners plus entries, mutated only through conflict-checked
//!   insertion by an owner
//! - `AclEntryIter`: re-bindable principal-kind filter over an entry set
//! - `AccessEvaluator`: the allow/deny resolution algorithm
//! - `AclAttributeView`: persistence collaborator for entry sets
//! - `FilePermissions`: caller-facing set/can readable/writable/executable
//!
//! ## Concurrency
//!
//! An `AclEntrySet` is a plain collection. Mutating one from several threads
//! must be serialized by the caller.

pub mod conflict;
pub mod entry;
pub mod entry_set;
pub mod error;
pub mod evaluator;
pub mod file_permissions;
pub mod iter;
pub mod permission;
pub mod principal;
pub mod view;

pub use conflict::{ConflictChecker, ConflictVerdict, DefaultConflictChecker};
pub use entry::{AclDecision, AclEntry};
pub use entry_set::AclEntrySet;
pub use error::{AclError, AclResult};
pub use evaluator::{AccessEvaluator, EffectiveAccess, Requester};
pub use file_permissions::FilePermissions;
pub use iter::AclEntryIter;
pub use permission::{AclEntryFlag, AclPermission, PermissionSet};
pub use principal::{Principal, PrincipalKind};
pub use view::{AclAttributeView, AclFileAttributes, AclObjectKind, MemoryAclView};
