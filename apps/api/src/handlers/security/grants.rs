use anteroom_application::RevokeOutcome;
use anteroom_core::AppError;

use super::*;

/// GET /api/access/authorized - Grants that are active right now.
pub async fn list_grants_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<GrantResponse>>> {
    state
        .authorization_service
        .require_permission(&identity, Permission::GrantRead)?;

    let grants = state
        .access_service
        .list_active_grants()
        .await?
        .into_iter()
        .map(GrantResponse::from)
        .collect();

    Ok(Json(grants))
}

/// DELETE /api/access/revoke/{email} - Remove a grant immediately.
pub async fn revoke_access_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(email): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .authorization_service
        .require_permission(&identity, Permission::AccessRevoke)?;

    let outcome = state
        .access_service
        .revoke(&email, identity.email())
        .await?;

    match outcome {
        RevokeOutcome::Revoked => Ok(StatusCode::NO_CONTENT),
        RevokeOutcome::NotFound => {
            Err(AppError::NotFound("no grant exists for this email".to_owned()).into())
        }
    }
}
