//! Public access workflow endpoints: submission, polling, and the
//! unauthenticated action-link channel.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;

use anteroom_application::{ACTION_LINK_SUBJECT, ApproveOutcome, DenyOutcome, SubmitAccessRequest, SubmitOutcome};
use anteroom_core::AppError;
use anteroom_domain::{AccessType, RequestId};

use crate::auth::session_helpers::extract_request_context;
use crate::dto::{
    AccessActionApproveRequest, AccessActionDenyRequest, AccessCheckResponse,
    AccessDecisionResponse, AccessRequestSubmitRequest, AccessRequestSubmitResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /access/request - Submit a visitor access request.
pub async fn submit_access_request_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AccessRequestSubmitRequest>,
) -> ApiResult<Json<AccessRequestSubmitResponse>> {
    let (ip_address, _) = extract_request_context(&headers);

    let outcome = state
        .access_service
        .submit_request(SubmitAccessRequest {
            name: payload.name,
            email: payload.email,
            reason: payload.reason,
            ip_address,
        })
        .await?;

    let response = match outcome {
        SubmitOutcome::Created(request) => AccessRequestSubmitResponse::submitted(&request),
        SubmitOutcome::AlreadyAuthorized => AccessRequestSubmitResponse::already_authorized(),
        SubmitOutcome::AlreadyPending => AccessRequestSubmitResponse::already_pending(),
    };

    Ok(Json(response))
}

/// GET /access/check/{email} - Polling read for the client gate.
pub async fn check_access_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<AccessCheckResponse>> {
    let status = state.access_service.check_access(&email).await?;

    Ok(Json(AccessCheckResponse::from(status)))
}

/// POST /access/action/approve - One-click approval from the email link.
pub async fn action_approve_handler(
    State(state): State<AppState>,
    Json(payload): Json<AccessActionApproveRequest>,
) -> ApiResult<Json<AccessDecisionResponse>> {
    let request_id = RequestId::from_str(&payload.request_id)?;
    let access_type = AccessType::from_str(&payload.access_type)?;

    let outcome = state
        .access_service
        .approve(request_id, access_type, ACTION_LINK_SUBJECT)
        .await?;

    match outcome {
        ApproveOutcome::Granted(request) => Ok(Json(AccessDecisionResponse::approved(&request))),
        ApproveOutcome::AlreadyProcessed => Ok(Json(AccessDecisionResponse::already_processed())),
        ApproveOutcome::NotFound => {
            Err(AppError::NotFound("invalid or expired link".to_owned()).into())
        }
    }
}

/// POST /access/action/deny - One-click denial from the email link.
pub async fn action_deny_handler(
    State(state): State<AppState>,
    Json(payload): Json<AccessActionDenyRequest>,
) -> ApiResult<Json<AccessDecisionResponse>> {
    let request_id = RequestId::from_str(&payload.request_id)?;

    let outcome = state
        .access_service
        .deny(request_id, ACTION_LINK_SUBJECT)
        .await?;

    match outcome {
        DenyOutcome::Denied(request) => Ok(Json(AccessDecisionResponse::denied(&request))),
        DenyOutcome::AlreadyProcessed => Ok(Json(AccessDecisionResponse::already_processed())),
        DenyOutcome::NotFound => {
            Err(AppError::NotFound("invalid or expired link".to_owned()).into())
        }
    }
}
