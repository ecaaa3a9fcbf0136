use chrono::{DateTime, Utc};

use anteroom_core::AppResult;
use anteroom_domain::{AuditAction, BlockedEntry, EmailAddress, Grant};

use super::{AccessService, RevokeOutcome, UnblockOutcome};

impl AccessService {
    /// Lists grants that still authorize access at the current instant.
    ///
    /// Display-filtered only: expired rows are hidden, not deleted. Removal
    /// stays with [`check_access`](AccessService::check_access) lazy expiry
    /// and the hygiene sweeper, so this read takes no write path.
    pub async fn list_active_grants(&self) -> AppResult<Vec<Grant>> {
        self.list_active_grants_at(Utc::now()).await
    }

    pub(super) async fn list_active_grants_at(&self, now: DateTime<Utc>) -> AppResult<Vec<Grant>> {
        let grants = self.grants.list().await?;

        Ok(grants
            .into_iter()
            .filter(|grant| grant.is_active(now))
            .collect())
    }

    /// Deletes the grant for an email unconditionally.
    ///
    /// Distinguished from time-based expiry in the audit log.
    pub async fn revoke(&self, email: &str, revoked_by: &str) -> AppResult<RevokeOutcome> {
        let email = EmailAddress::new(email)?;

        if !self.grants.delete_by_email(email.as_str()).await? {
            return Ok(RevokeOutcome::NotFound);
        }

        self.append_audit(
            revoked_by,
            AuditAction::AccessRevoked,
            "access_grant",
            email.as_str(),
            Some(format!("revoked access for '{}'", email.as_str())),
        )
        .await?;

        Ok(RevokeOutcome::Revoked)
    }

    /// Adds an email to the block list and voids any existing grant.
    pub async fn block(
        &self,
        email: &str,
        reason: Option<String>,
        blocked_by: &str,
    ) -> AppResult<()> {
        self.block_at(email, reason, blocked_by, Utc::now()).await
    }

    pub(super) async fn block_at(
        &self,
        email: &str,
        reason: Option<String>,
        blocked_by: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let email = EmailAddress::new(email)?;

        self.block_list
            .upsert(BlockedEntry {
                email: email.as_str().to_owned(),
                reason: reason
                    .map(|reason| reason.trim().to_owned())
                    .filter(|reason| !reason.is_empty()),
                blocked_by: blocked_by.to_owned(),
                blocked_at: now,
            })
            .await?;

        self.append_audit(
            blocked_by,
            AuditAction::EmailBlocked,
            "access_block_entry",
            email.as_str(),
            None,
        )
        .await?;

        // Implicit revoke: a blocked email can never hold a grant. Both the
        // block and the revocation are audited for later reconciliation.
        if self.grants.delete_by_email(email.as_str()).await? {
            self.append_audit(
                blocked_by,
                AuditAction::AccessRevoked,
                "access_grant",
                email.as_str(),
                Some("revoked by block".to_owned()),
            )
            .await?;
        }

        Ok(())
    }

    /// Removes an email from the block list.
    pub async fn unblock(&self, email: &str, unblocked_by: &str) -> AppResult<UnblockOutcome> {
        let email = EmailAddress::new(email)?;

        if !self.block_list.delete(email.as_str()).await? {
            return Ok(UnblockOutcome::NotFound);
        }

        self.append_audit(
            unblocked_by,
            AuditAction::EmailUnblocked,
            "access_block_entry",
            email.as_str(),
            None,
        )
        .await?;

        Ok(UnblockOutcome::Unblocked)
    }
}
