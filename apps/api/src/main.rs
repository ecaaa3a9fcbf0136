//! Anteroom API composition root.

#![forbid(unsafe_code)]

mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post, put};
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration as CookieDuration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use anteroom_application::{
    AccessNotificationService, AccessService, AuditLogRepository, AuthEventService,
    AuthorizationService, EmailService, RateLimitRule, RateLimitService, UserService,
};
use anteroom_core::AppError;
use anteroom_infrastructure::{
    Argon2PasswordHasher, ConsoleEmailService, PostgresAccessRequestRepository,
    PostgresAuditLogRepository, PostgresAuditRepository, PostgresAuthEventRepository,
    PostgresBlockListRepository, PostgresGrantRepository, PostgresRateLimitRepository,
    PostgresUserRepository, SmtpEmailConfig, SmtpEmailService,
};

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
    let bootstrap_token = required_env("AUTH_BOOTSTRAP_TOKEN")?;
    let approver_email = required_env("APPROVER_NOTIFICATION_EMAIL")?;

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .unwrap_or_else(|_| "false".to_owned())
        .eq_ignore_ascii_case("true");

    let temporary_grant_minutes = env::var("TEMPORARY_GRANT_MINUTES")
        .ok()
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(20);
    if temporary_grant_minutes <= 0 {
        return Err(AppError::Validation(
            "TEMPORARY_GRANT_MINUTES must be greater than zero".to_owned(),
        ));
    }

    let email_provider = env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "console".to_owned());

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let session_store = PostgresStore::new(pool.clone())
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(CookieDuration::minutes(30)));

    let email_service: Arc<dyn EmailService> = match email_provider.as_str() {
        "smtp" => {
            let smtp_port = required_non_empty_env("SMTP_PORT")?
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid SMTP_PORT: {error}")))?;

            let smtp_config = SmtpEmailConfig {
                host: required_non_empty_env("SMTP_HOST")?,
                port: smtp_port,
                username: required_non_empty_env("SMTP_USERNAME")?,
                password: required_non_empty_env("SMTP_PASSWORD")?,
                from_address: required_non_empty_env("SMTP_FROM_ADDRESS")?,
            };
            Arc::new(SmtpEmailService::new(smtp_config))
        }
        "console" => Arc::new(ConsoleEmailService::new()),
        _ => {
            return Err(AppError::Validation(format!(
                "EMAIL_PROVIDER must be either 'console' or 'smtp', got '{email_provider}'"
            )));
        }
    };

    let notifier = Arc::new(AccessNotificationService::new(
        email_service,
        approver_email,
        frontend_url.clone(),
    ));

    let access_service = AccessService::new(
        Arc::new(PostgresAccessRequestRepository::new(pool.clone())),
        Arc::new(PostgresGrantRepository::new(pool.clone())),
        Arc::new(PostgresBlockListRepository::new(pool.clone())),
        Arc::new(PostgresAuditRepository::new(pool.clone())),
        notifier,
        Duration::minutes(temporary_grant_minutes),
    );

    let audit_log_repository: Arc<dyn AuditLogRepository> =
        Arc::new(PostgresAuditLogRepository::new(pool.clone()));

    let auth_event_service =
        AuthEventService::new(Arc::new(PostgresAuthEventRepository::new(pool.clone())));

    let user_service = UserService::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(Argon2PasswordHasher::new()),
        auth_event_service.clone(),
    );

    let rate_limit_service =
        RateLimitService::new(Arc::new(PostgresRateLimitRepository::new(pool.clone())));

    let app_state = AppState {
        access_service,
        authorization_service: AuthorizationService::new(),
        auth_event_service,
        user_service,
        rate_limit_service,
        audit_log_repository,
        postgres_pool: pool,
        frontend_url: frontend_url.clone(),
        bootstrap_token,
    };

    let protected_routes = Router::new()
        .route(
            "/api/access/requests",
            get(handlers::security::list_access_requests_handler),
        )
        .route(
            "/api/access/requests/pending-count",
            get(handlers::security::pending_count_handler),
        )
        .route(
            "/api/access/authorized",
            get(handlers::security::list_grants_handler),
        )
        .route(
            "/api/access/approve/{request_id}",
            put(handlers::security::approve_access_handler),
        )
        .route(
            "/api/access/deny/{request_id}",
            put(handlers::security::deny_access_handler),
        )
        .route(
            "/api/access/revoke/{email}",
            delete(handlers::security::revoke_access_handler),
        )
        .route(
            "/api/access/blocked",
            get(handlers::security::list_blocked_handler),
        )
        .route(
            "/api/access/block",
            post(handlers::security::block_email_handler),
        )
        .route(
            "/api/access/block/{email}",
            delete(handlers::security::unblock_email_handler),
        )
        .route(
            "/api/security/audit-log",
            get(handlers::security::list_audit_log_handler),
        )
        .route(
            "/api/security/users",
            get(handlers::security::list_users_handler)
                .post(handlers::security::create_user_handler),
        )
        .route("/auth/me", get(auth::me_handler))
        .route("/api/profile/password", put(auth::change_password_handler))
        .route_layer(from_fn(middleware::require_auth));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    // Login: 10 attempts per IP per 15 minutes.
    let login_rate_rule = RateLimitRule::new("login", 10, 15 * 60);
    // Request submission: 5 attempts per IP per hour.
    let submit_rate_rule = RateLimitRule::new("submit", 5, 60 * 60);
    // Action links: 30 attempts per IP per hour.
    let action_rate_rule = RateLimitRule::new("action", 30, 60 * 60);

    let login_routes = Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::rate_limit,
        ))
        .layer(axum::Extension(login_rate_rule));

    let submit_routes = Router::new()
        .route(
            "/access/request",
            post(handlers::access::submit_access_request_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::rate_limit,
        ))
        .layer(axum::Extension(submit_rate_rule));

    let action_routes = Router::new()
        .route(
            "/access/action/approve",
            post(handlers::access::action_approve_handler),
        )
        .route(
            "/access/action/deny",
            post(handlers::access::action_deny_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::rate_limit,
        ))
        .layer(axum::Extension(action_rate_rule));

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route(
            "/access/check/{email}",
            get(handlers::access::check_access_handler),
        )
        .merge(login_routes)
        .merge(submit_routes)
        .merge(action_routes)
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "anteroom-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
