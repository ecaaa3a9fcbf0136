//! Infrastructure adapters: PostgreSQL repositories, password hashing, and
//! email transports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod console_email_service;
mod in_memory_access_repository;
mod postgres_access_request_repository;
mod postgres_audit_log_repository;
mod postgres_audit_repository;
mod postgres_auth_event_repository;
mod postgres_block_list_repository;
mod postgres_grant_repository;
mod postgres_rate_limit_repository;
mod postgres_user_repository;
mod smtp_email_service;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use console_email_service::ConsoleEmailService;
pub use in_memory_access_repository::{InMemoryAccessRepository, InMemoryAuditRepository};
pub use postgres_access_request_repository::PostgresAccessRequestRepository;
pub use postgres_audit_log_repository::PostgresAuditLogRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_auth_event_repository::PostgresAuthEventRepository;
pub use postgres_block_list_repository::PostgresBlockListRepository;
pub use postgres_grant_repository::PostgresGrantRepository;
pub use postgres_rate_limit_repository::PostgresRateLimitRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use smtp_email_service::{SmtpEmailConfig, SmtpEmailService};
