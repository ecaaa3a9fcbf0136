use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;

use anteroom_application::AuthEvent;
use anteroom_core::AppError;

use crate::dto::{AuthBootstrapRequest, GenericMessageResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::session_helpers::extract_request_context;

/// POST /auth/bootstrap - Create the first approver account.
///
/// Guarded by the deployment's bootstrap token and refused once any user
/// exists.
pub async fn bootstrap_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AuthBootstrapRequest>,
) -> ApiResult<(StatusCode, Json<GenericMessageResponse>)> {
    if payload.token != state.bootstrap_token {
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let user_id = state
        .user_service
        .bootstrap_approver(&payload.email, &payload.display_name, &payload.password)
        .await?;

    let (ip_address, user_agent) = extract_request_context(&headers);
    state
        .auth_event_service
        .record_event(AuthEvent {
            subject: Some(user_id.to_string()),
            event_type: "bootstrap".to_owned(),
            outcome: "success".to_owned(),
            ip_address,
            user_agent,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GenericMessageResponse {
            message: "approver account created, sign in to continue".to_owned(),
        }),
    ))
}
