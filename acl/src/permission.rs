//! Permission and entry flags

use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Permissions an ACL entry can allow or deny
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AclPermission {
    /// Read object data, or list a directory
    ReadData,
    /// Modify object data, or add a file to a directory
    WriteData,
    /// Append object data, or add a subdirectory
    AppendData,
    ReadNamedAttrs,
    WriteNamedAttrs,
    /// Execute the object
    Execute,
    DeleteChild,
    ReadAttributes,
    WriteAttributes,
    Delete,
    ReadAcl,
    WriteAcl,
    WriteOwner,
    Synchronize,
}

impl AclPermission {
    /// Directory alias of `ReadData`
    pub const LIST_DIRECTORY: AclPermission = AclPermission::ReadData;
    /// Directory alias of `WriteData`
    pub const ADD_FILE: AclPermission = AclPermission::WriteData;
    /// Directory alias of `AppendData`
    pub const ADD_SUBDIRECTORY: AclPermission = AclPermission::AppendData;

    /// Every permission
    pub const ALL: [AclPermission; 14] = [
        AclPermission::ReadData,
        AclPermission::WriteData,
        AclPermission::AppendData,
        AclPermission::ReadNamedAttrs,
        AclPermission::WriteNamedAttrs,
        AclPermission::Execute,
        AclPermission::DeleteChild,
        AclPermission::ReadAttributes,
        AclPermission::WriteAttributes,
        AclPermission::Delete,
        AclPermission::ReadAcl,
        AclPermission::WriteAcl,
        AclPermission::WriteOwner,
        AclPermission::Synchronize,
    ];
}

impl fmt::Display for AclPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AclPermission::ReadData => "READ_DATA",
            AclPermission::WriteData => "WRITE_DATA",
            AclPermission::AppendData => "APPEND_DATA",
            AclPermission::ReadNamedAttrs => "READ_NAMED_ATTRS",
            AclPermission::WriteNamedAttrs => "WRITE_NAMED_ATTRS",
            AclPermission::Execute => "EXECUTE",
            AclPermission::DeleteChild => "DELETE_CHILD",
            AclPermission::ReadAttributes => "READ_ATTRIBUTES",
            AclPermission::WriteAttributes => "WRITE_ATTRIBUTES",
            AclPermission::Delete => "DELETE",
            AclPermission::ReadAcl => "READ_ACL",
            AclPermission::WriteAcl => "WRITE_ACL",
            AclPermission::WriteOwner => "WRITE_OWNER",
            AclPermission::Synchronize => "SYNCHRONIZE",
        };
        write!(f, "{}", name)
    }
}

/// A set of permissions
pub type PermissionSet = BTreeSet<AclPermission>;

/// Inheritance flags carried on an entry
///
/// Flags are persisted with the entry but do not influence evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AclEntryFlag {
    FileInherit,
    DirectoryInherit,
    NoPropagateInherit,
    InheritOnly,
}
