mod audit;
mod blocklist;
mod grants;
mod requests;

pub use audit::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository, SYSTEM_SUBJECT,
};
pub use blocklist::BlockListRepository;
pub use grants::GrantRepository;
pub use requests::{AccessRequestRepository, GrantTerms, PendingDecision};
