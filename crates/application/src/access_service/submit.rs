use chrono::{DateTime, Utc};
use tracing::warn;

use anteroom_core::{AppResult, NonEmptyString};
use anteroom_domain::{AccessRequest, AuditAction, EmailAddress, RequestId, RequestStatus};

use super::{AccessService, SubmitAccessRequest, SubmitOutcome};

impl AccessService {
    /// Submits a visitor access request.
    ///
    /// Idempotent re-entry: an email with an active grant gets
    /// [`SubmitOutcome::AlreadyAuthorized`], an email with a pending request
    /// gets [`SubmitOutcome::AlreadyPending`]. A previously denied email may
    /// submit a fresh request. Blocked emails receive a generic denial.
    pub async fn submit_request(&self, input: SubmitAccessRequest) -> AppResult<SubmitOutcome> {
        self.submit_request_at(input, Utc::now()).await
    }

    pub(super) async fn submit_request_at(
        &self,
        input: SubmitAccessRequest,
        now: DateTime<Utc>,
    ) -> AppResult<SubmitOutcome> {
        let name = NonEmptyString::new(input.name)?;
        let email = EmailAddress::new(input.email)?;

        self.ensure_not_blocked(email.as_str()).await?;

        if let Some(grant) = self.grants.find_by_email(email.as_str()).await?
            && grant.is_active(now)
        {
            return Ok(SubmitOutcome::AlreadyAuthorized);
        }

        if self
            .requests
            .find_pending_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Ok(SubmitOutcome::AlreadyPending);
        }

        let request = AccessRequest {
            id: RequestId::new(),
            name: name.into(),
            email: email.into(),
            reason: input
                .reason
                .map(|reason| reason.trim().to_owned())
                .filter(|reason| !reason.is_empty()),
            status: RequestStatus::Pending,
            access_type: None,
            ip_address: input.ip_address,
            created_at: now,
        };

        self.requests.insert(request.clone()).await?;

        self.append_audit(
            request.email.clone(),
            AuditAction::AccessRequestCreated,
            "access_request",
            request.id.to_string(),
            Some(format!("access requested by '{}'", request.name)),
        )
        .await?;

        // Delivery failures must not lose the submission; the request is
        // already durable and visible in the console.
        if let Err(error) = self.notifier.notify_request_submitted(&request).await {
            warn!(
                request_id = %request.id,
                error = %error,
                "failed to deliver approver notification"
            );
        }

        Ok(SubmitOutcome::Created(request))
    }
}
