use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use anteroom_application::BlockListRepository;
use anteroom_core::{AppError, AppResult};
use anteroom_domain::BlockedEntry;

/// PostgreSQL implementation of the block list repository port.
#[derive(Clone)]
pub struct PostgresBlockListRepository {
    pool: PgPool,
}

impl PostgresBlockListRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BlockedRow {
    email: String,
    reason: Option<String>,
    blocked_by: String,
    blocked_at: DateTime<Utc>,
}

impl From<BlockedRow> for BlockedEntry {
    fn from(row: BlockedRow) -> Self {
        Self {
            email: row.email,
            reason: row.reason,
            blocked_by: row.blocked_by,
            blocked_at: row.blocked_at,
        }
    }
}

#[async_trait]
impl BlockListRepository for PostgresBlockListRepository {
    async fn upsert(&self, entry: BlockedEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO access_block_list (email, reason, blocked_by, blocked_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE SET
                reason = EXCLUDED.reason,
                blocked_by = EXCLUDED.blocked_by,
                blocked_at = EXCLUDED.blocked_at
            "#,
        )
        .bind(entry.email)
        .bind(entry.reason)
        .bind(entry.blocked_by)
        .bind(entry.blocked_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to upsert block entry: {error}")))?;

        Ok(())
    }

    async fn delete(&self, email: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM access_block_list WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete block entry: {error}"))
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<BlockedEntry>> {
        let row = sqlx::query_as::<_, BlockedRow>(
            r#"
            SELECT email, reason, blocked_by, blocked_at
            FROM access_block_list
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load block entry: {error}")))?;

        Ok(row.map(BlockedEntry::from))
    }

    async fn list(&self) -> AppResult<Vec<BlockedEntry>> {
        let rows = sqlx::query_as::<_, BlockedRow>(
            r#"
            SELECT email, reason, blocked_by, blocked_at
            FROM access_block_list
            ORDER BY blocked_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list block entries: {error}")))?;

        Ok(rows.into_iter().map(BlockedEntry::from).collect())
    }
}
