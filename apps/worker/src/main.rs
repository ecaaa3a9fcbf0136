//! Anteroom storage-hygiene sweeper.
//!
//! Access-grant expiry is evaluated lazily at read time; nothing here changes
//! observable semantics. This process only prunes storage on an interval:
//! long-expired grant rows, audit entries past the retention window, and
//! stale rate-limit counters.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use anteroom_application::{AuditLogRepository, GrantRepository, RateLimitService};
use anteroom_core::AppError;
use anteroom_infrastructure::{
    PostgresAuditLogRepository, PostgresGrantRepository, PostgresRateLimitRepository,
};

#[derive(Debug, Clone)]
struct SweeperConfig {
    database_url: String,
    sweep_interval_seconds: u64,
    /// Expired grant rows younger than this stay for the lazy-expiry audit
    /// entry to be written by a late poller.
    grant_purge_grace_hours: i64,
    audit_retention_days: u16,
}

impl SweeperConfig {
    fn load() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::Validation("DATABASE_URL is required".to_owned()))?;

        let sweep_interval_seconds = env::var("SWEEP_INTERVAL_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(15 * 60);

        let grant_purge_grace_hours = env::var("GRANT_PURGE_GRACE_HOURS")
            .ok()
            .and_then(|value| value.parse::<i64>().ok())
            .unwrap_or(24);

        let audit_retention_days = env::var("AUDIT_RETENTION_DAYS")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(365);

        Ok(Self {
            database_url,
            sweep_interval_seconds,
            grant_purge_grace_hours,
            audit_retention_days,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = SweeperConfig::load()?;
    let pool = connect_pool(config.database_url.as_str()).await?;

    let grant_repository = PostgresGrantRepository::new(pool.clone());
    let audit_log_repository = PostgresAuditLogRepository::new(pool.clone());
    let rate_limit_service =
        RateLimitService::new(Arc::new(PostgresRateLimitRepository::new(pool)));

    info!(
        sweep_interval_seconds = config.sweep_interval_seconds,
        grant_purge_grace_hours = config.grant_purge_grace_hours,
        audit_retention_days = config.audit_retention_days,
        "anteroom-worker started"
    );

    loop {
        sweep(
            &config,
            &grant_repository,
            &audit_log_repository,
            &rate_limit_service,
        )
        .await;

        tokio::time::sleep(Duration::from_secs(config.sweep_interval_seconds)).await;
    }
}

async fn sweep(
    config: &SweeperConfig,
    grant_repository: &PostgresGrantRepository,
    audit_log_repository: &PostgresAuditLogRepository,
    rate_limit_service: &RateLimitService,
) {
    let cutoff = Utc::now() - chrono::Duration::hours(config.grant_purge_grace_hours);
    match grant_repository.purge_expired_before(cutoff).await {
        Ok(purged) if purged > 0 => info!(purged, "purged long-expired access grants"),
        Ok(_) => {}
        Err(error) => warn!(error = %error, "failed to purge expired access grants"),
    }

    match audit_log_repository
        .purge_entries_older_than(config.audit_retention_days)
        .await
    {
        Ok(purged) if purged > 0 => info!(purged, "purged audit entries past retention"),
        Ok(_) => {}
        Err(error) => warn!(error = %error, "failed to purge audit entries"),
    }

    match rate_limit_service.cleanup().await {
        Ok(removed) if removed > 0 => info!(removed, "removed stale rate limit windows"),
        Ok(_) => {}
        Err(error) => warn!(error = %error, "failed to clean up rate limit windows"),
    }
}

async fn connect_pool(database_url: &str) -> Result<PgPool, AppError> {
    PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
