use std::str::FromStr;

use anteroom_core::{AppError, AppResult, UserIdentity};
use anteroom_domain::{Permission, Role};

/// Application service for console capability checks.
///
/// The capability table is the static role enumeration in the domain; every
/// screen-level decision funnels through this one evaluation instead of ad
/// hoc flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationService;

impl AuthorizationService {
    /// Creates the authorization service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Ensures the actor's role carries the required permission.
    pub fn require_permission(
        &self,
        actor: &UserIdentity,
        permission: Permission,
    ) -> AppResult<()> {
        if self.has_permission(actor, permission) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' is missing permission '{}'",
            actor.subject(),
            permission.as_str()
        )))
    }

    /// Returns whether the actor's role carries the permission.
    ///
    /// An unknown role value grants nothing.
    #[must_use]
    pub fn has_permission(&self, actor: &UserIdentity, permission: Permission) -> bool {
        Role::from_str(actor.role())
            .map(|role| role.grants(permission))
            .unwrap_or(false)
    }
}
