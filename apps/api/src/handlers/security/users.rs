use std::str::FromStr;

use anteroom_application::CreateUserParams;
use anteroom_domain::Role;

use super::*;

/// GET /api/security/users - All console users.
pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    state
        .authorization_service
        .require_permission(&identity, Permission::SecurityUserManage)?;

    let users = state
        .user_service
        .list_users()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

/// POST /api/security/users - Create a console user.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    state
        .authorization_service
        .require_permission(&identity, Permission::SecurityUserManage)?;

    let role = Role::from_str(&payload.role)?;

    let user_id = state
        .user_service
        .create_user(CreateUserParams {
            email: payload.email,
            display_name: payload.display_name,
            password: payload.password,
            role,
        })
        .await?;

    let user = state
        .user_service
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| {
            anteroom_core::AppError::Internal("created user could not be reloaded".to_owned())
        })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
