//! Access request and grant entities.
//!
//! An [`AccessRequest`] moves from `pending` to exactly one terminal state;
//! a [`Grant`] authorizes one email, either permanently or until a fixed
//! expiry instant. Expiry is evaluated at read time against the caller's
//! clock, never by a background job.

use std::str::FromStr;

use anteroom_core::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new random request identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a request identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| AppError::Validation(format!("invalid request id '{value}'")))
    }
}

/// Kind of access conferred by a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    /// Access without an expiry.
    Permanent,
    /// Access until a fixed expiry instant.
    Temporary,
}

impl AccessType {
    /// Returns a stable storage value for this access type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permanent => "permanent",
            Self::Temporary => "temporary",
        }
    }
}

impl FromStr for AccessType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "permanent" => Ok(Self::Permanent),
            "temporary" => Ok(Self::Temporary),
            _ => Err(AppError::Validation(format!(
                "unknown access type '{value}'"
            ))),
        }
    }
}

/// Lifecycle state of an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting an approver decision.
    Pending,
    /// Terminal: approved, a grant was issued.
    Approved,
    /// Terminal: denied, no grant issued.
    Denied,
}

impl RequestStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }

    /// Returns whether the status is a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl FromStr for RequestStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "denied" => Ok(Self::Denied),
            _ => Err(AppError::Validation(format!(
                "unknown request status '{value}'"
            ))),
        }
    }
}

/// A visitor's application for access, retained forever for audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequest {
    /// Stable request identifier.
    pub id: RequestId,
    /// Requester-supplied display name.
    pub name: String,
    /// Canonical lowercased email, the identity key downstream.
    pub email: String,
    /// Optional free-text motivation.
    pub reason: Option<String>,
    /// Current lifecycle state.
    pub status: RequestStatus,
    /// Access type recorded when the request was approved.
    pub access_type: Option<AccessType>,
    /// Submitter IP captured at submission, for audit.
    pub ip_address: Option<String>,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

impl AccessRequest {
    /// Returns whether the request still awaits a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// An authorization record for one email.
///
/// At most one grant exists per email. `expires_at` is `Some` exactly when
/// `access_type` is temporary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// Unique identity key.
    pub email: String,
    /// Display name carried over from the approved request.
    pub name: String,
    /// Permanent or temporary access.
    pub access_type: AccessType,
    /// Issuance timestamp.
    pub granted_at: DateTime<Utc>,
    /// Expiry instant for temporary grants.
    pub expires_at: Option<DateTime<Utc>>,
    /// Approver subject, or the action-link channel label.
    pub approved_by: String,
}

impl Grant {
    /// Returns whether the grant authorizes access at `now`.
    ///
    /// A temporary grant is revoked-by-time the instant `now >= expires_at`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self.access_type {
            AccessType::Permanent => true,
            AccessType::Temporary => self.expires_at.is_some_and(|expires_at| now < expires_at),
        }
    }

    /// Returns whether a temporary grant has passed its expiry at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.access_type == AccessType::Temporary
            && self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Returns the whole seconds left before expiry, clamped to zero.
    ///
    /// `None` for permanent grants.
    #[must_use]
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at
            .map(|expires_at| (expires_at - now).num_seconds().max(0))
    }
}

/// Hard-deny list entry; a blocked email can never hold a grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedEntry {
    /// Blocked identity key.
    pub email: String,
    /// Optional operator-supplied reason, never shown to the visitor.
    pub reason: Option<String>,
    /// Subject that recorded the block.
    pub blocked_by: String,
    /// Block timestamp.
    pub blocked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    use super::{AccessType, Grant, RequestStatus};

    fn temporary_grant(expires_at: chrono::DateTime<Utc>) -> Grant {
        Grant {
            email: "visitor@example.com".to_owned(),
            name: "Visitor".to_owned(),
            access_type: AccessType::Temporary,
            granted_at: expires_at - Duration::minutes(20),
            expires_at: Some(expires_at),
            approved_by: "approver".to_owned(),
        }
    }

    #[test]
    fn status_roundtrip_storage_value() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Approved,
            RequestStatus::Denied,
        ] {
            let restored = RequestStatus::from_str(status.as_str());
            assert!(restored.is_ok());
            assert_eq!(restored.unwrap_or(RequestStatus::Pending), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(RequestStatus::from_str("revoked").is_err());
    }

    #[test]
    fn terminal_statuses_exclude_pending() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Denied.is_terminal());
    }

    #[test]
    fn permanent_grant_never_expires() {
        let grant = Grant {
            email: "visitor@example.com".to_owned(),
            name: "Visitor".to_owned(),
            access_type: AccessType::Permanent,
            granted_at: Utc::now(),
            expires_at: None,
            approved_by: "approver".to_owned(),
        };

        let far_future = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).single();
        assert!(far_future.is_some_and(|instant| grant.is_active(instant)));
        assert_eq!(grant.remaining_seconds(Utc::now()), None);
    }

    #[test]
    fn temporary_grant_is_inactive_exactly_at_expiry() {
        let expires_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single();
        let Some(expires_at) = expires_at else {
            return;
        };
        let grant = temporary_grant(expires_at);

        assert!(grant.is_active(expires_at - Duration::seconds(1)));
        assert!(!grant.is_active(expires_at));
        assert!(!grant.is_active(expires_at + Duration::seconds(1)));
        assert!(grant.is_expired(expires_at));
    }

    #[test]
    fn remaining_seconds_clamps_to_zero_after_expiry() {
        let expires_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single();
        let Some(expires_at) = expires_at else {
            return;
        };
        let grant = temporary_grant(expires_at);

        assert_eq!(
            grant.remaining_seconds(expires_at + Duration::minutes(5)),
            Some(0)
        );
        assert_eq!(
            grant.remaining_seconds(expires_at - Duration::minutes(5)),
            Some(300)
        );
    }

    proptest! {
        // A temporary grant is active strictly before its expiry and never at
        // or after it, for any pair of instants.
        #[test]
        fn temporary_activity_matches_expiry_ordering(
            expiry_offset in 0_i64..10_000_000,
            probe_offset in 0_i64..20_000_000,
        ) {
            let base = Utc.timestamp_opt(1_750_000_000, 0).single();
            prop_assume!(base.is_some());
            if let Some(base) = base {
                let expires_at = base + Duration::seconds(expiry_offset);
                let probe = base + Duration::seconds(probe_offset);
                let grant = temporary_grant(expires_at);

                prop_assert_eq!(grant.is_active(probe), probe < expires_at);
                prop_assert_eq!(grant.is_expired(probe), probe >= expires_at);
            }
        }
    }
}
