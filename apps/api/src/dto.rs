//! Request and response payloads for the HTTP API.

mod access;
mod auth;
mod common;
mod security;

pub use access::{
    AccessActionApproveRequest, AccessActionDenyRequest, AccessCheckResponse,
    AccessDecisionResponse, AccessRequestSubmitRequest, AccessRequestSubmitResponse,
};
pub use auth::{
    AuthBootstrapRequest, AuthChangePasswordRequest, AuthLoginRequest, AuthLoginResponse,
    UserIdentityResponse,
};
pub use common::GenericMessageResponse;
pub use security::{
    AccessRequestResponse, ApproveAccessRequest, AuditLogEntryResponse, BlockEmailRequest,
    BlockedEntryResponse, CreateUserRequest, GrantResponse, PendingCountResponse, UserResponse,
};
