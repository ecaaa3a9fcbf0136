use anteroom_application::AuditLogQuery;

use super::*;

#[derive(Debug, serde::Deserialize)]
pub struct AuditLogListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub action: Option<String>,
    pub subject: Option<String>,
}

/// GET /api/security/audit-log - Recent audit entries, filterable.
pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Query(query): Query<AuditLogListQuery>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    state
        .authorization_service
        .require_permission(&identity, Permission::SecurityAuditRead)?;

    let entries = state
        .audit_log_repository
        .list_recent_entries(AuditLogQuery {
            limit: query.limit.unwrap_or(50),
            offset: query.offset.unwrap_or(0),
            action: query.action,
            subject: query.subject,
        })
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
