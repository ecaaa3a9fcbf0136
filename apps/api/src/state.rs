use std::sync::Arc;

use anteroom_application::{
    AccessService, AuditLogRepository, AuthEventService, AuthorizationService, RateLimitService,
    UserService,
};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_service: AccessService,
    pub authorization_service: AuthorizationService,
    pub auth_event_service: AuthEventService,
    pub user_service: UserService,
    pub rate_limit_service: RateLimitService,
    pub audit_log_repository: Arc<dyn AuditLogRepository>,
    pub postgres_pool: PgPool,
    pub frontend_url: String,
    pub bootstrap_token: String,
}
