//! Authenticated console endpoints over the access workflow.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use anteroom_core::UserIdentity;
use anteroom_domain::Permission;

use crate::dto::{
    AccessDecisionResponse, AccessRequestResponse, ApproveAccessRequest, AuditLogEntryResponse,
    BlockEmailRequest, BlockedEntryResponse, CreateUserRequest, GrantResponse,
    PendingCountResponse, UserResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod audit;
mod blocklist;
mod grants;
mod requests;
mod users;

pub use audit::list_audit_log_handler;
pub use blocklist::{block_email_handler, list_blocked_handler, unblock_email_handler};
pub use grants::{list_grants_handler, revoke_access_handler};
pub use requests::{
    approve_access_handler, deny_access_handler, list_access_requests_handler,
    pending_count_handler,
};
pub use users::{create_user_handler, list_users_handler};
