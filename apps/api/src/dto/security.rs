use serde::{Deserialize, Serialize};
use ts_rs::TS;

use anteroom_application::{AuditLogEntry, UserRecord};
use anteroom_domain::{AccessRequest, BlockedEntry, Grant, Permission, Role};

/// API representation of an access request.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-request-response.ts"
)]
pub struct AccessRequestResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub reason: Option<String>,
    pub status: String,
    pub access_type: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: String,
}

impl From<AccessRequest> for AccessRequestResponse {
    fn from(request: AccessRequest) -> Self {
        Self {
            id: request.id.to_string(),
            name: request.name,
            email: request.email,
            reason: request.reason,
            status: request.status.as_str().to_owned(),
            access_type: request
                .access_type
                .map(|access_type| access_type.as_str().to_owned()),
            ip_address: request.ip_address,
            created_at: request.created_at.to_rfc3339(),
        }
    }
}

/// API representation of an active grant.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/grant-response.ts"
)]
pub struct GrantResponse {
    pub email: String,
    pub name: String,
    pub access_type: String,
    pub granted_at: String,
    pub expires_at: Option<String>,
    pub approved_by: String,
}

impl From<Grant> for GrantResponse {
    fn from(grant: Grant) -> Self {
        Self {
            email: grant.email,
            name: grant.name,
            access_type: grant.access_type.as_str().to_owned(),
            granted_at: grant.granted_at.to_rfc3339(),
            expires_at: grant.expires_at.map(|expires_at| expires_at.to_rfc3339()),
            approved_by: grant.approved_by,
        }
    }
}

/// API representation of a block list entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/blocked-entry-response.ts"
)]
pub struct BlockedEntryResponse {
    pub email: String,
    pub reason: Option<String>,
    pub blocked_by: String,
    pub blocked_at: String,
}

impl From<BlockedEntry> for BlockedEntryResponse {
    fn from(entry: BlockedEntry) -> Self {
        Self {
            email: entry.email,
            reason: entry.reason,
            blocked_by: entry.blocked_by,
            blocked_at: entry.blocked_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for console approvals.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/approve-access-request.ts"
)]
pub struct ApproveAccessRequest {
    pub access_type: String,
}

/// Incoming payload for block list additions.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/block-email-request.ts"
)]
pub struct BlockEmailRequest {
    pub email: String,
    pub reason: Option<String>,
}

/// Badge payload for the console navigation.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/pending-count-response.ts"
)]
pub struct PendingCountResponse {
    pub count: u64,
}

/// API representation of an audit log entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub event_id: String,
    pub subject: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub detail: Option<String>,
    pub created_at: String,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(entry: AuditLogEntry) -> Self {
        Self {
            event_id: entry.event_id,
            subject: entry.subject,
            action: entry.action,
            resource_type: entry.resource_type,
            resource_id: entry.resource_id,
            detail: entry.detail,
            created_at: entry.created_at,
        }
    }
}

/// API representation of a console user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            display_name: user.display_name,
            role: user.role.as_str().to_owned(),
            permissions: permission_values(user.role),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for console user creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-user-request.ts"
)]
pub struct CreateUserRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
    pub role: String,
}

pub(crate) fn permission_values(role: Role) -> Vec<String> {
    role.permissions()
        .iter()
        .map(Permission::as_str)
        .map(ToOwned::to_owned)
        .collect()
}
