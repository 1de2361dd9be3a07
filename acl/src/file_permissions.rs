//! Caller-facing permission operations
//!
//! These operations report every failure as `false`. Whether `false` meant
//! "denied", "not an owner" or "the view refused the change" is only visible
//! in the log.

use crate::{
    AccessEvaluator, AclAttributeView, AclDecision, AclEntry, AclError, AclPermission,
    PermissionSet, Principal, Requester,
};

/// Readable/writable/executable switches and checks for one object
pub struct FilePermissions<V: AclAttributeView> {
    view: V,
    requester: Requester,
}

impl<V: AclAttributeView> FilePermissions<V> {
    /// Binds a view to the requester acting on it
    pub fn new(view: V, requester: Requester) -> Self {
        Self { view, requester }
    }

    /// Returns the underlying view
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Allows or denies reading, for the requester only or for everyone
    pub fn set_readable(&self, readable: bool, owner_only: bool) -> bool {
        self.set_permission(AclPermission::ReadData, readable, owner_only)
    }

    /// Allows or denies writing, for the requester only or for everyone
    pub fn set_writable(&self, writable: bool, owner_only: bool) -> bool {
        self.set_permission(AclPermission::WriteData, writable, owner_only)
    }

    /// Allows or denies executing, for the requester only or for everyone
    pub fn set_executable(&self, executable: bool, owner_only: bool) -> bool {
        self.set_permission(AclPermission::Execute, executable, owner_only)
    }

    pub fn can_read(&self) -> bool {
        self.check(AclPermission::ReadData)
    }

    pub fn can_write(&self) -> bool {
        self.check(AclPermission::WriteData)
    }

    pub fn can_execute(&self) -> bool {
        self.check(AclPermission::Execute)
    }

    fn check(&self, permission: AclPermission) -> bool {
        let attributes = match self.view.read_acl() {
            Ok(attributes) => attributes,
            Err(err) => {
                tracing::warn!(%permission, error = %err, "could not read ACL for access check");
                return false;
            }
        };
        let requested = PermissionSet::from([permission]);
        AccessEvaluator::check(&attributes.entries, &self.requester, &requested)
    }

    fn set_permission(&self, permission: AclPermission, enabled: bool, owner_only: bool) -> bool {
        let actor = match &self.requester.principal {
            Some(actor) => actor.clone(),
            None => {
                tracing::warn!(%permission, "anonymous requester cannot change permissions");
                return false;
            }
        };

        let mut attributes = match self.view.read_acl() {
            Ok(attributes) => attributes,
            Err(err) => {
                tracing::warn!(%permission, error = %err, "could not read ACL");
                return false;
            }
        };

        let target = if owner_only {
            actor.clone()
        } else {
            Principal::AnonymousUser
        };
        let decision = if enabled {
            AclDecision::Allow
        } else {
            AclDecision::Deny
        };
        let entry = AclEntry::new(target, decision, [permission]);

        match attributes.entries.insert(&actor, entry.clone(), true) {
            Ok(_) => {}
            Err(AclError::NotOwner(principal)) => {
                tracing::warn!(%principal, %permission, "permission change refused: not an owner");
                return false;
            }
            Err(err) => {
                tracing::warn!(%permission, error = %err, "permission change refused");
                return false;
            }
        }

        match self.view.write_acl(&attributes.entries) {
            Ok(unset) => {
                if let Some(rejected) = unset.iter().find(|u| u.overlaps_same_rule(&entry)) {
                    tracing::warn!(entry = %rejected, "attribute view could not apply ACL entry");
                    return false;
                }
                true
            }
            Err(err) => {
                tracing::warn!(%permission, error = %err, "could not write ACL");
                false
            }
        }
    }
}
