//! PostgreSQL-backed access request store.
//!
//! The pending-to-terminal transition is a conditional `UPDATE … WHERE
//! status = 'pending'`; concurrent decisions on the same request id are
//! linearized by the database, and the approval path upserts the grant inside
//! the same transaction.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;

use anteroom_application::{AccessRequestRepository, GrantTerms, PendingDecision};
use anteroom_core::{AppError, AppResult};
use anteroom_domain::{AccessRequest, AccessType, RequestId, RequestStatus};

/// PostgreSQL implementation of the access request repository port.
#[derive(Clone)]
pub struct PostgresAccessRequestRepository {
    pool: PgPool,
}

impl PostgresAccessRequestRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccessRequestRow {
    id: uuid::Uuid,
    name: String,
    email: String,
    reason: Option<String>,
    status: String,
    access_type: Option<String>,
    ip_address: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<AccessRequestRow> for AccessRequest {
    type Error = AppError;

    fn try_from(row: AccessRequestRow) -> Result<Self, Self::Error> {
        let status = RequestStatus::from_str(row.status.as_str())
            .map_err(|_| AppError::Internal(format!("corrupt request status '{}'", row.status)))?;
        let access_type = row
            .access_type
            .as_deref()
            .map(AccessType::from_str)
            .transpose()
            .map_err(|_| AppError::Internal("corrupt request access type".to_owned()))?;

        Ok(Self {
            id: RequestId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            reason: row.reason,
            status,
            access_type,
            ip_address: row.ip_address,
            created_at: row.created_at,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, name, email, reason, status, access_type, ip_address, created_at";

#[async_trait]
impl AccessRequestRepository for PostgresAccessRequestRepository {
    async fn insert(&self, request: AccessRequest) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO access_requests (
                id,
                name,
                email,
                reason,
                status,
                access_type,
                ip_address,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(request.name)
        .bind(request.email)
        .bind(request.reason)
        .bind(request.status.as_str())
        .bind(request.access_type.map(|value| value.as_str()))
        .bind(request.ip_address)
        .bind(request.created_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert access request: {error}")))?;

        Ok(())
    }

    async fn find_by_id(&self, request_id: RequestId) -> AppResult<Option<AccessRequest>> {
        let row = sqlx::query_as::<_, AccessRequestRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM access_requests WHERE id = $1"
        ))
        .bind(request_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load access request: {error}")))?;

        row.map(AccessRequest::try_from).transpose()
    }

    async fn find_pending_by_email(&self, email: &str) -> AppResult<Option<AccessRequest>> {
        let row = sqlx::query_as::<_, AccessRequestRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM access_requests \
             WHERE email = $1 AND status = 'pending' \
             ORDER BY created_at DESC \
             LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find pending access request: {error}"))
        })?;

        row.map(AccessRequest::try_from).transpose()
    }

    async fn list(&self) -> AppResult<Vec<AccessRequest>> {
        let rows = sqlx::query_as::<_, AccessRequestRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM access_requests ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list access requests: {error}")))?;

        rows.into_iter().map(AccessRequest::try_from).collect()
    }

    async fn count_pending(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM access_requests WHERE status = 'pending'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to count pending access requests: {error}"))
        })?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn approve_pending(
        &self,
        request_id: RequestId,
        terms: GrantTerms,
    ) -> AppResult<PendingDecision> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let updated = sqlx::query_as::<_, AccessRequestRow>(&format!(
            "UPDATE access_requests \
             SET status = 'approved', access_type = $2 \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(request_id.as_uuid())
        .bind(terms.access_type.as_str())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to approve access request: {error}")))?;

        let Some(row) = updated else {
            // The conditional update matched nothing: either the request is
            // unknown or another caller already decided it.
            let status: Option<String> =
                sqlx::query_scalar("SELECT status FROM access_requests WHERE id = $1")
                    .bind(request_id.as_uuid())
                    .fetch_optional(&mut *transaction)
                    .await
                    .map_err(|error| {
                        AppError::Internal(format!("failed to inspect access request: {error}"))
                    })?;

            transaction.commit().await.map_err(|error| {
                AppError::Internal(format!("failed to commit transaction: {error}"))
            })?;

            return Ok(match status {
                Some(_) => PendingDecision::AlreadyProcessed,
                None => PendingDecision::NotFound,
            });
        };

        let request = AccessRequest::try_from(row)?;

        sqlx::query(
            r#"
            INSERT INTO access_grants (email, name, access_type, granted_at, expires_at, approved_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO UPDATE SET
                name = EXCLUDED.name,
                access_type = EXCLUDED.access_type,
                granted_at = EXCLUDED.granted_at,
                expires_at = EXCLUDED.expires_at,
                approved_by = EXCLUDED.approved_by
            "#,
        )
        .bind(request.email.as_str())
        .bind(request.name.as_str())
        .bind(terms.access_type.as_str())
        .bind(terms.granted_at)
        .bind(terms.expires_at)
        .bind(terms.approved_by.as_str())
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to upsert access grant: {error}")))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(PendingDecision::Applied(request))
    }

    async fn deny_pending(&self, request_id: RequestId) -> AppResult<PendingDecision> {
        let updated = sqlx::query_as::<_, AccessRequestRow>(&format!(
            "UPDATE access_requests \
             SET status = 'denied' \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(request_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to deny access request: {error}")))?;

        if let Some(row) = updated {
            return Ok(PendingDecision::Applied(AccessRequest::try_from(row)?));
        }

        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM access_requests WHERE id = $1")
                .bind(request_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to inspect access request: {error}"))
                })?;

        Ok(match status {
            Some(_) => PendingDecision::AlreadyProcessed,
            None => PendingDecision::NotFound,
        })
    }
}
