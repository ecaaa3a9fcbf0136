use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use anteroom_core::UserIdentity;
use anteroom_domain::Role;

use super::security::permission_values;

/// Incoming payload for console login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auth-login-request.ts"
)]
pub struct AuthLoginRequest {
    pub email: String,
    pub password: String,
}

/// Login outcome.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auth-login-response.ts"
)]
pub struct AuthLoginResponse {
    pub status: String,
}

/// Incoming payload for first-approver bootstrap.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auth-bootstrap-request.ts"
)]
pub struct AuthBootstrapRequest {
    pub token: String,
    pub email: String,
    pub display_name: String,
    pub password: String,
}

/// Incoming payload for password changes.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auth-change-password-request.ts"
)]
pub struct AuthChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Session identity payload for the console shell.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub permissions: Vec<String>,
}

impl From<UserIdentity> for UserIdentityResponse {
    fn from(identity: UserIdentity) -> Self {
        let permissions = Role::from_str(identity.role())
            .map(permission_values)
            .unwrap_or_default();

        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().to_owned(),
            role: identity.role().to_owned(),
            permissions,
        }
    }
}
