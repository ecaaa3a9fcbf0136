//! PostgreSQL-backed grant store.
//!
//! Rows are written only by the request repository's approval transaction;
//! this repository reads and removes them. Expired removal is conditional on
//! the stored expiry, so a racing re-approval is never destroyed.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use anteroom_application::GrantRepository;
use anteroom_core::{AppError, AppResult};
use anteroom_domain::{AccessType, Grant};

/// PostgreSQL implementation of the grant repository port.
#[derive(Clone)]
pub struct PostgresGrantRepository {
    pool: PgPool,
}

impl PostgresGrantRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GrantRow {
    email: String,
    name: String,
    access_type: String,
    granted_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    approved_by: String,
}

impl TryFrom<GrantRow> for Grant {
    type Error = AppError;

    fn try_from(row: GrantRow) -> Result<Self, Self::Error> {
        let access_type = AccessType::from_str(row.access_type.as_str()).map_err(|_| {
            AppError::Internal(format!("corrupt grant access type '{}'", row.access_type))
        })?;

        Ok(Self {
            email: row.email,
            name: row.name,
            access_type,
            granted_at: row.granted_at,
            expires_at: row.expires_at,
            approved_by: row.approved_by,
        })
    }
}

#[async_trait]
impl GrantRepository for PostgresGrantRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Grant>> {
        let row = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT email, name, access_type, granted_at, expires_at, approved_by
            FROM access_grants
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load access grant: {error}")))?;

        row.map(Grant::try_from).transpose()
    }

    async fn list(&self) -> AppResult<Vec<Grant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT email, name, access_type, granted_at, expires_at, approved_by
            FROM access_grants
            ORDER BY granted_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list access grants: {error}")))?;

        rows.into_iter().map(Grant::try_from).collect()
    }

    async fn delete_by_email(&self, email: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM access_grants WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete access grant: {error}"))
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, email: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM access_grants
            WHERE email = $1
              AND expires_at IS NOT NULL
              AND expires_at <= $2
            "#,
        )
        .bind(email)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete expired access grant: {error}"))
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM access_grants
            WHERE expires_at IS NOT NULL
              AND expires_at <= $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to purge expired access grants: {error}"))
        })?;

        Ok(result.rows_affected())
    }
}
