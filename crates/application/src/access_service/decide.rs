use chrono::{DateTime, Utc};

use anteroom_core::AppResult;
use anteroom_domain::{AccessType, AuditAction, RequestId};

use crate::access_ports::{GrantTerms, PendingDecision};

use super::{AccessService, ApproveOutcome, DenyOutcome};

impl AccessService {
    /// Approves a pending request and issues a grant for its email.
    ///
    /// Safe to invoke concurrently from both approval channels: the
    /// pending-to-approved transition and the grant upsert are one atomic
    /// unit in the store, so exactly one caller wins and the rest observe
    /// [`ApproveOutcome::AlreadyProcessed`].
    pub async fn approve(
        &self,
        request_id: RequestId,
        access_type: AccessType,
        approved_by: &str,
    ) -> AppResult<ApproveOutcome> {
        self.approve_at(request_id, access_type, approved_by, Utc::now())
            .await
    }

    pub(super) async fn approve_at(
        &self,
        request_id: RequestId,
        access_type: AccessType,
        approved_by: &str,
        now: DateTime<Utc>,
    ) -> AppResult<ApproveOutcome> {
        let Some(request) = self.requests.find_by_id(request_id).await? else {
            return Ok(ApproveOutcome::NotFound);
        };

        if request.status.is_terminal() {
            return Ok(ApproveOutcome::AlreadyProcessed);
        }

        // A blocked email can never hold a grant; fail closed without
        // transitioning the request.
        self.ensure_not_blocked(&request.email).await?;

        let expires_at = match access_type {
            AccessType::Permanent => None,
            AccessType::Temporary => Some(now + self.temporary_grant_duration),
        };

        let terms = GrantTerms {
            access_type,
            granted_at: now,
            expires_at,
            approved_by: approved_by.to_owned(),
        };

        match self.requests.approve_pending(request_id, terms).await? {
            PendingDecision::Applied(request) => {
                self.append_audit(
                    approved_by,
                    AuditAction::AccessApproved,
                    "access_request",
                    request.id.to_string(),
                    Some(format!(
                        "granted {} access to '{}'",
                        access_type.as_str(),
                        request.email
                    )),
                )
                .await?;

                Ok(ApproveOutcome::Granted(request))
            }
            PendingDecision::AlreadyProcessed => Ok(ApproveOutcome::AlreadyProcessed),
            PendingDecision::NotFound => Ok(ApproveOutcome::NotFound),
        }
    }

    /// Denies a pending request. Same idempotency contract as approval; no
    /// grant is issued.
    pub async fn deny(&self, request_id: RequestId, denied_by: &str) -> AppResult<DenyOutcome> {
        let Some(request) = self.requests.find_by_id(request_id).await? else {
            return Ok(DenyOutcome::NotFound);
        };

        if request.status.is_terminal() {
            return Ok(DenyOutcome::AlreadyProcessed);
        }

        match self.requests.deny_pending(request_id).await? {
            PendingDecision::Applied(request) => {
                self.append_audit(
                    denied_by,
                    AuditAction::AccessDenied,
                    "access_request",
                    request.id.to_string(),
                    Some(format!("denied access to '{}'", request.email)),
                )
                .await?;

                Ok(DenyOutcome::Denied(request))
            }
            PendingDecision::AlreadyProcessed => Ok(DenyOutcome::AlreadyProcessed),
            PendingDecision::NotFound => Ok(DenyOutcome::NotFound),
        }
    }
}
