use anteroom_application::UnblockOutcome;
use anteroom_core::AppError;

use super::*;

/// GET /api/access/blocked - All block list entries.
pub async fn list_blocked_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<BlockedEntryResponse>>> {
    state
        .authorization_service
        .require_permission(&identity, Permission::AccessBlock)?;

    let entries = state
        .access_service
        .list_blocked()
        .await?
        .into_iter()
        .map(BlockedEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

/// POST /api/access/block - Add an email to the block list.
pub async fn block_email_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(payload): Json<BlockEmailRequest>,
) -> ApiResult<StatusCode> {
    state
        .authorization_service
        .require_permission(&identity, Permission::AccessBlock)?;

    state
        .access_service
        .block(&payload.email, payload.reason, identity.email())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/access/block/{email} - Remove an email from the block list.
pub async fn unblock_email_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(email): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .authorization_service
        .require_permission(&identity, Permission::AccessBlock)?;

    let outcome = state
        .access_service
        .unblock(&email, identity.email())
        .await?;

    match outcome {
        UnblockOutcome::Unblocked => Ok(StatusCode::NO_CONTENT),
        UnblockOutcome::NotFound => {
            Err(AppError::NotFound("this email is not blocked".to_owned()).into())
        }
    }
}
