use chrono::{DateTime, Utc};

use anteroom_core::AppResult;
use anteroom_domain::{AuditAction, EmailAddress};

use crate::access_ports::SYSTEM_SUBJECT;

use super::{AccessService, AccessStatus};

impl AccessService {
    /// Reports the authorization state for an email.
    ///
    /// This is the read side of the polling protocol. Order matters: the
    /// block list overrides everything, then the grant (with lazy expiry),
    /// then any pending request. The only write this performs is the
    /// conditional removal of an expired temporary grant, so the call is
    /// safe to repeat and to cancel at any point.
    pub async fn check_access(&self, email: &str) -> AppResult<AccessStatus> {
        self.check_access_at(email, Utc::now()).await
    }

    pub(super) async fn check_access_at(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> AppResult<AccessStatus> {
        let email = EmailAddress::new(email)?;

        if self
            .block_list
            .find_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Ok(AccessStatus::Unauthorized);
        }

        if let Some(grant) = self.grants.find_by_email(email.as_str()).await? {
            if grant.is_active(now) {
                return Ok(AccessStatus::Authorized {
                    access_type: grant.access_type,
                    remaining_seconds: grant.remaining_seconds(now),
                });
            }

            // Lazy expiry: the conditional delete only removes the row if its
            // expiry has passed, so a concurrent re-approval survives. Only
            // the winning reader appends the audit entry.
            if grant.is_expired(now) && self.grants.delete_expired(email.as_str(), now).await? {
                self.append_audit(
                    SYSTEM_SUBJECT,
                    AuditAction::AccessExpired,
                    "access_grant",
                    email.as_str(),
                    Some(format!(
                        "temporary access for '{}' expired",
                        email.as_str()
                    )),
                )
                .await?;
            }

            return Ok(AccessStatus::Unauthorized);
        }

        if self
            .requests
            .find_pending_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Ok(AccessStatus::Pending);
        }

        Ok(AccessStatus::Unauthorized)
    }
}
