//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod access_service;
mod auth_event_service;
mod authorization;
mod notification_service;
mod rate_limit;
mod user_service;

pub use access_ports::{
    AccessRequestRepository, AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository,
    AuditRepository, BlockListRepository, GrantRepository, GrantTerms, PendingDecision,
    SYSTEM_SUBJECT,
};
pub use access_service::{
    ACTION_LINK_SUBJECT, AccessService, AccessStatus, ApproveOutcome, DenyOutcome, RevokeOutcome,
    SubmitAccessRequest, SubmitOutcome, UnblockOutcome,
};
pub use auth_event_service::{AuthEvent, AuthEventRepository, AuthEventService};
pub use authorization::AuthorizationService;
pub use notification_service::{AccessNotificationService, AccessNotifier, EmailService};
pub use rate_limit::{AttemptInfo, RateLimitRepository, RateLimitRule, RateLimitService};
pub use user_service::{
    AuthOutcome, CreateUserParams, PasswordHasher, UserRecord, UserRepository, UserService,
};
