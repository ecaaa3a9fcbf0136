use std::str::FromStr;

use anteroom_application::{ApproveOutcome, DenyOutcome};
use anteroom_core::AppError;
use anteroom_domain::{AccessType, RequestId};

use super::*;

/// GET /api/access/requests - All requests, newest first.
pub async fn list_access_requests_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<AccessRequestResponse>>> {
    state
        .authorization_service
        .require_permission(&identity, Permission::AccessRequestRead)?;

    let requests = state
        .access_service
        .list_requests()
        .await?
        .into_iter()
        .map(AccessRequestResponse::from)
        .collect();

    Ok(Json(requests))
}

/// GET /api/access/requests/pending-count - Badge counter for the console.
pub async fn pending_count_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<PendingCountResponse>> {
    state
        .authorization_service
        .require_permission(&identity, Permission::AccessRequestRead)?;

    let count = state.access_service.pending_count().await?;

    Ok(Json(PendingCountResponse { count }))
}

/// PUT /api/access/approve/{id} - Approve from the console.
pub async fn approve_access_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(request_id): Path<String>,
    Json(payload): Json<ApproveAccessRequest>,
) -> ApiResult<Json<AccessDecisionResponse>> {
    state
        .authorization_service
        .require_permission(&identity, Permission::AccessApprove)?;

    let request_id = RequestId::from_str(&request_id)?;
    let access_type = AccessType::from_str(&payload.access_type)?;

    let outcome = state
        .access_service
        .approve(request_id, access_type, identity.email())
        .await?;

    match outcome {
        ApproveOutcome::Granted(request) => Ok(Json(AccessDecisionResponse::approved(&request))),
        ApproveOutcome::AlreadyProcessed => Ok(Json(AccessDecisionResponse::already_processed())),
        ApproveOutcome::NotFound => {
            Err(AppError::NotFound("access request not found".to_owned()).into())
        }
    }
}

/// PUT /api/access/deny/{id} - Deny from the console.
pub async fn deny_access_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(request_id): Path<String>,
) -> ApiResult<Json<AccessDecisionResponse>> {
    state
        .authorization_service
        .require_permission(&identity, Permission::AccessApprove)?;

    let request_id = RequestId::from_str(&request_id)?;

    let outcome = state
        .access_service
        .deny(request_id, identity.email())
        .await?;

    match outcome {
        DenyOutcome::Denied(request) => Ok(Json(AccessDecisionResponse::denied(&request))),
        DenyOutcome::AlreadyProcessed => Ok(Json(AccessDecisionResponse::already_processed())),
        DenyOutcome::NotFound => {
            Err(AppError::NotFound("access request not found".to_owned()).into())
        }
    }
}
