use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::HeaderMap;
use axum::http::StatusCode;
use tower_sessions::Session;

use anteroom_application::AuthOutcome;
use anteroom_core::{AppError, UserIdentity};
use anteroom_domain::UserId;

use crate::dto::{AuthChangePasswordRequest, AuthLoginRequest, AuthLoginResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::session_helpers::extract_request_context;
use super::{SESSION_CREATED_AT_KEY, SESSION_USER_KEY};

/// POST /auth/login - Authenticate with email+password.
pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Json(payload): Json<AuthLoginRequest>,
) -> ApiResult<Json<AuthLoginResponse>> {
    let (ip_address, user_agent) = extract_request_context(&headers);

    let outcome = state
        .user_service
        .login(&payload.email, &payload.password, ip_address, user_agent)
        .await?;

    match outcome {
        AuthOutcome::Authenticated(user) => {
            let identity = UserIdentity::new(
                user.id.to_string(),
                user.display_name.clone(),
                user.email.clone(),
                user.role.as_str(),
            );

            // Session id regeneration on privilege change.
            session.cycle_id().await.map_err(|error| {
                AppError::Internal(format!("failed to cycle session id: {error}"))
            })?;

            session
                .insert(SESSION_USER_KEY, &identity)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to persist session identity: {error}"))
                })?;

            session
                .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to persist session creation time: {error}"))
                })?;

            Ok(Json(AuthLoginResponse {
                status: "authenticated".to_owned(),
            }))
        }
        AuthOutcome::Failed => {
            // Generic error message for all failure causes.
            Err(AppError::Unauthorized("invalid email or password".to_owned()).into())
        }
    }
}

/// PUT /api/profile/password - Change the current user's password.
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(payload): Json<AuthChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    let user_id = UserId::from_uuid(
        uuid_from_subject(identity.subject())
            .map_err(|error| AppError::Internal(format!("corrupt session subject: {error}")))?,
    );

    state
        .user_service
        .change_password(user_id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn uuid_from_subject(subject: &str) -> Result<uuid::Uuid, uuid::Error> {
    uuid::Uuid::from_str(subject)
}
