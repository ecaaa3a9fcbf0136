use async_trait::async_trait;
use chrono::{DateTime, Utc};

use anteroom_core::AppResult;
use anteroom_domain::Grant;

/// Repository port for the durable grant store.
///
/// Grants are created only through
/// [`AccessRequestRepository::approve_pending`](super::AccessRequestRepository::approve_pending);
/// this port covers reads and removals.
#[async_trait]
pub trait GrantRepository: Send + Sync {
    /// Finds the grant for an email, expired or not.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Grant>>;

    /// Lists every stored grant, newest first.
    async fn list(&self) -> AppResult<Vec<Grant>>;

    /// Removes the grant for an email unconditionally.
    ///
    /// Returns whether a grant existed.
    async fn delete_by_email(&self, email: &str) -> AppResult<bool>;

    /// Removes the grant for an email only if its expiry has passed at `now`.
    ///
    /// The expiry guard keeps a racing re-approval safe: a fresh grant that
    /// replaced the expired row is never destroyed. Returns whether a row was
    /// removed.
    async fn delete_expired(&self, email: &str, now: DateTime<Utc>) -> AppResult<bool>;

    /// Removes temporary grants whose expiry passed before the cutoff.
    ///
    /// Storage hygiene only; lazy expiry already hides these rows from every
    /// read. Returns the number of rows removed.
    async fn purge_expired_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}
