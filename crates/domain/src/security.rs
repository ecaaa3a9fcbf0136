use std::str::FromStr;

use anteroom_core::AppError;
use serde::{Deserialize, Serialize};

/// Permissions enforced by application policy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows reading access requests and pending counts.
    AccessRequestRead,
    /// Allows approving or denying access requests.
    AccessApprove,
    /// Allows revoking issued grants.
    AccessRevoke,
    /// Allows managing the block list.
    AccessBlock,
    /// Allows reading issued grants.
    GrantRead,
    /// Allows reading audit log entries.
    SecurityAuditRead,
    /// Allows managing console user accounts.
    SecurityUserManage,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessRequestRead => "access.request.read",
            Self::AccessApprove => "access.approve",
            Self::AccessRevoke => "access.revoke",
            Self::AccessBlock => "access.block",
            Self::GrantRead => "access.grant.read",
            Self::SecurityAuditRead => "security.audit.read",
            Self::SecurityUserManage => "security.user.manage",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::AccessRequestRead,
            Permission::AccessApprove,
            Permission::AccessRevoke,
            Permission::AccessBlock,
            Permission::GrantRead,
            Permission::SecurityAuditRead,
            Permission::SecurityUserManage,
        ];

        ALL
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "access.request.read" => Ok(Self::AccessRequestRead),
            "access.approve" => Ok(Self::AccessApprove),
            "access.revoke" => Ok(Self::AccessRevoke),
            "access.block" => Ok(Self::AccessBlock),
            "access.grant.read" => Ok(Self::GrantRead),
            "security.audit.read" => Ok(Self::SecurityAuditRead),
            "security.user.manage" => Ok(Self::SecurityUserManage),
            _ => Err(AppError::Validation(format!(
                "unknown permission value '{value}'"
            ))),
        }
    }
}

/// Console roles, the enumerated capability table behind every policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full control over the access workflow and console users.
    Approver,
    /// Read-only visibility including the audit log.
    Auditor,
    /// Read-only visibility over requests and grants.
    Viewer,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approver => "approver",
            Self::Auditor => "auditor",
            Self::Viewer => "viewer",
        }
    }

    /// Returns the effective permissions for this role.
    #[must_use]
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Self::Approver => Permission::all(),
            Self::Auditor => &[
                Permission::AccessRequestRead,
                Permission::GrantRead,
                Permission::SecurityAuditRead,
            ],
            Self::Viewer => &[Permission::AccessRequestRead, Permission::GrantRead],
        }
    }

    /// Returns whether this role carries the given permission.
    #[must_use]
    pub fn grants(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "approver" => Ok(Self::Approver),
            "auditor" => Ok(Self::Auditor),
            "viewer" => Ok(Self::Viewer),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

/// Stable audit actions emitted by the authorization engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a visitor submits an access request.
    AccessRequestCreated,
    /// Emitted when a request is approved and a grant issued.
    AccessApproved,
    /// Emitted when a request is denied.
    AccessDenied,
    /// Emitted when a grant is explicitly revoked.
    AccessRevoked,
    /// Emitted when an expired temporary grant is lazily removed.
    AccessExpired,
    /// Emitted when an email is added to the block list.
    EmailBlocked,
    /// Emitted when an email is removed from the block list.
    EmailUnblocked,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessRequestCreated => "access.request.created",
            Self::AccessApproved => "access.approved",
            Self::AccessDenied => "access.denied",
            Self::AccessRevoked => "access.revoked",
            Self::AccessExpired => "access.expired",
            Self::EmailBlocked => "access.email.blocked",
            Self::EmailUnblocked => "access.email.unblocked",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Permission, Role};

    #[test]
    fn permission_roundtrip_storage_value() {
        for permission in Permission::all() {
            let restored = Permission::from_str(permission.as_str());
            assert!(restored.is_ok());
            assert_eq!(restored.unwrap_or(Permission::AccessRequestRead), *permission);
        }
    }

    #[test]
    fn unknown_permission_is_rejected() {
        assert!(Permission::from_str("access.unknown").is_err());
    }

    #[test]
    fn approver_holds_every_permission() {
        for permission in Permission::all() {
            assert!(Role::Approver.grants(*permission));
        }
    }

    #[test]
    fn auditor_cannot_mutate() {
        assert!(!Role::Auditor.grants(Permission::AccessApprove));
        assert!(!Role::Auditor.grants(Permission::AccessRevoke));
        assert!(!Role::Auditor.grants(Permission::AccessBlock));
        assert!(Role::Auditor.grants(Permission::SecurityAuditRead));
    }

    #[test]
    fn viewer_cannot_read_audit_log() {
        assert!(Role::Viewer.grants(Permission::AccessRequestRead));
        assert!(!Role::Viewer.grants(Permission::SecurityAuditRead));
    }

    #[test]
    fn role_roundtrip_storage_value() {
        for role in [Role::Approver, Role::Auditor, Role::Viewer] {
            let restored = Role::from_str(role.as_str());
            assert!(restored.is_ok());
            assert_eq!(restored.unwrap_or(Role::Viewer), role);
        }
    }
}
