//! The authorization engine for the access-gating workflow.
//!
//! [`AccessService`] is the single writer of the request store, grant store,
//! block list, and audit log. It is stateless between calls; every outcome a
//! caller must render distinctly is a variant of the operation's result enum,
//! never an error.

use std::sync::Arc;

use chrono::Duration;

use anteroom_core::{AppError, AppResult};
use anteroom_domain::{AccessRequest, AccessType};

use crate::access_ports::{
    AccessRequestRepository, AuditEvent, AuditRepository, BlockListRepository, GrantRepository,
};
use crate::notification_service::AccessNotifier;

mod admin;
mod check;
mod decide;
mod submit;

#[cfg(test)]
mod tests;

/// Approver label recorded when a decision arrives through the out-of-band
/// action link instead of an authenticated console session.
pub const ACTION_LINK_SUBJECT: &str = "action-link";

/// Input payload for a visitor access request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitAccessRequest {
    /// Requester-supplied display name.
    pub name: String,
    /// Requester email, canonicalized by the engine.
    pub email: String,
    /// Optional free-text motivation.
    pub reason: Option<String>,
    /// Submitter IP captured at the boundary, for audit.
    pub ip_address: Option<String>,
}

/// Outcome of a request submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new pending request was created.
    Created(AccessRequest),
    /// The email already holds an active grant; no request was created.
    AlreadyAuthorized,
    /// A pending request for the email already exists.
    AlreadyPending,
}

/// Outcome of an approval attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApproveOutcome {
    /// The request was approved and a grant issued.
    Granted(AccessRequest),
    /// The request had already reached a terminal state.
    AlreadyProcessed,
    /// No request exists with the given id.
    NotFound,
}

/// Outcome of a denial attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyOutcome {
    /// The request was denied; no grant was issued.
    Denied(AccessRequest),
    /// The request had already reached a terminal state.
    AlreadyProcessed,
    /// No request exists with the given id.
    NotFound,
}

/// Authorization state reported to a polling client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessStatus {
    /// The email holds an active grant.
    Authorized {
        /// Permanent or temporary access.
        access_type: AccessType,
        /// Whole seconds until expiry; `None` for permanent grants.
        remaining_seconds: Option<i64>,
    },
    /// A request for the email awaits a decision.
    Pending,
    /// No active grant and no pending request.
    Unauthorized,
}

/// Outcome of a grant revocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeOutcome {
    /// The grant was removed.
    Revoked,
    /// No grant existed for the email.
    NotFound,
}

/// Outcome of a block-list removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnblockOutcome {
    /// The block entry was removed.
    Unblocked,
    /// The email was not blocked.
    NotFound,
}

/// Application service owning every state transition of the access workflow.
#[derive(Clone)]
pub struct AccessService {
    requests: Arc<dyn AccessRequestRepository>,
    grants: Arc<dyn GrantRepository>,
    block_list: Arc<dyn BlockListRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    notifier: Arc<dyn AccessNotifier>,
    temporary_grant_duration: Duration,
}

impl AccessService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        requests: Arc<dyn AccessRequestRepository>,
        grants: Arc<dyn GrantRepository>,
        block_list: Arc<dyn BlockListRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        notifier: Arc<dyn AccessNotifier>,
        temporary_grant_duration: Duration,
    ) -> Self {
        Self {
            requests,
            grants,
            block_list,
            audit_repository,
            notifier,
            temporary_grant_duration,
        }
    }

    /// Lists every access request, newest first. Read-only console view.
    pub async fn list_requests(&self) -> AppResult<Vec<AccessRequest>> {
        self.requests.list().await
    }

    /// Counts requests awaiting a decision. Read-only console view.
    pub async fn pending_count(&self) -> AppResult<u64> {
        self.requests.count_pending().await
    }

    /// Lists blocked entries, newest first. Read-only console view.
    pub async fn list_blocked(&self) -> AppResult<Vec<anteroom_domain::BlockedEntry>> {
        self.block_list.list().await
    }

    /// Rejects the operation with a generic denial when the email is blocked.
    ///
    /// The message never reveals block-list membership.
    async fn ensure_not_blocked(&self, email: &str) -> AppResult<()> {
        if self.block_list.find_by_email(email).await?.is_some() {
            return Err(AppError::Forbidden("access denied".to_owned()));
        }

        Ok(())
    }

    async fn append_audit(
        &self,
        subject: impl Into<String>,
        action: anteroom_domain::AuditAction,
        resource_type: &str,
        resource_id: impl Into<String>,
        detail: Option<String>,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: subject.into(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id: resource_id.into(),
                detail,
            })
            .await
    }
}
