use async_trait::async_trait;
use chrono::{DateTime, Utc};

use anteroom_core::AppResult;
use anteroom_domain::{AccessRequest, AccessType, RequestId};

/// Grant parameters applied when a pending request is approved.
///
/// `expires_at` is `Some` exactly when `access_type` is temporary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantTerms {
    /// Permanent or temporary access.
    pub access_type: AccessType,
    /// Issuance timestamp.
    pub granted_at: DateTime<Utc>,
    /// Expiry instant for temporary grants.
    pub expires_at: Option<DateTime<Utc>>,
    /// Approver subject, or the action-link channel label.
    pub approved_by: String,
}

/// Outcome of a conditional pending-to-terminal transition.
///
/// Concurrent approvals and denials of the same request id race through this
/// result: exactly one caller observes [`PendingDecision::Applied`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDecision {
    /// This caller won the transition; the updated request is returned.
    Applied(AccessRequest),
    /// The request had already reached a terminal state.
    AlreadyProcessed,
    /// No request exists with the given id.
    NotFound,
}

/// Repository port for the durable access-request store.
#[async_trait]
pub trait AccessRequestRepository: Send + Sync {
    /// Persists a freshly created pending request.
    async fn insert(&self, request: AccessRequest) -> AppResult<()>;

    /// Finds a request by its identifier.
    async fn find_by_id(&self, request_id: RequestId) -> AppResult<Option<AccessRequest>>;

    /// Finds a pending request for the given email, if one exists.
    async fn find_pending_by_email(&self, email: &str) -> AppResult<Option<AccessRequest>>;

    /// Lists all requests, newest first.
    async fn list(&self) -> AppResult<Vec<AccessRequest>>;

    /// Counts requests still awaiting a decision.
    async fn count_pending(&self) -> AppResult<u64>;

    /// Atomically transitions a pending request to `approved` and upserts the
    /// grant for the request's email under the given terms.
    ///
    /// The status update is conditional on the request still being pending,
    /// and the grant write happens in the same transaction: a request is
    /// never left `approved` without its grant.
    async fn approve_pending(
        &self,
        request_id: RequestId,
        terms: GrantTerms,
    ) -> AppResult<PendingDecision>;

    /// Atomically transitions a pending request to `denied`. No grant is
    /// written.
    async fn deny_pending(&self, request_id: RequestId) -> AppResult<PendingDecision>;
}
