//! Console user ports and application service.
//!
//! Owns the approver/auditor/viewer account lifecycle: creation, login,
//! password changes, and lockout. Follows OWASP guidance on generic error
//! messages and timing-neutral responses.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use anteroom_core::{AppError, AppResult};
use anteroom_domain::{EmailAddress, Role, UserId, validate_password};

use crate::auth_event_service::{AuthEvent, AuthEventService};

/// User record returned by repository queries.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Canonical email address.
    pub email: String,
    /// Display name shown in the console.
    pub display_name: String,
    /// Console role.
    pub role: Role,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Number of consecutive failed login attempts.
    pub failed_login_count: i32,
    /// Account is locked until this time, if set.
    pub locked_until: Option<DateTime<Utc>>,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Repository port for console user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Creates a new user record. Returns the assigned user id.
    async fn create(
        &self,
        email: &str,
        display_name: &str,
        role: Role,
        password_hash: &str,
    ) -> AppResult<UserId>;

    /// Updates the password hash for a user.
    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()>;

    /// Increments the failed login counter, locking the account once the
    /// implementation's threshold is reached.
    async fn record_failed_login(&self, user_id: UserId) -> AppResult<()>;

    /// Resets the failed login counter and removes any account lock.
    async fn reset_failed_logins(&self, user_id: UserId) -> AppResult<()>;

    /// Lists all users, oldest first.
    async fn list(&self) -> AppResult<Vec<UserRecord>>;

    /// Counts user records.
    async fn count(&self) -> AppResult<u64>;
}

/// Port for password hashing operations. Keeps the application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Authentication succeeded. A session can be established.
    Authenticated(UserRecord),
    /// Authentication failed. Generic message prevents enumeration.
    Failed,
}

/// Parameters for console user creation.
pub struct CreateUserParams {
    /// Email address for the new account.
    pub email: String,
    /// Display name shown in the console.
    pub display_name: String,
    /// Plaintext password, validated against strength rules.
    pub password: String,
    /// Console role for the new account.
    pub role: Role,
}

/// Application service for console user management and authentication.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    auth_event_service: AuthEventService,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        auth_event_service: AuthEventService,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            auth_event_service,
        }
    }

    /// Creates a console user.
    pub async fn create_user(&self, params: CreateUserParams) -> AppResult<UserId> {
        let email = EmailAddress::new(&params.email)?;
        validate_password(&params.password)?;

        if params.display_name.trim().is_empty() {
            return Err(AppError::Validation(
                "display name must not be empty".to_owned(),
            ));
        }

        let existing = self.user_repository.find_by_email(email.as_str()).await?;
        if existing.is_some() {
            // Still hash the password to keep response timing uniform.
            let _ = self.password_hasher.hash_password(&params.password);
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        self.user_repository
            .create(
                email.as_str(),
                params.display_name.trim(),
                params.role,
                &password_hash,
            )
            .await
    }

    /// Creates the first approver account.
    ///
    /// Only valid while the user table is empty; the HTTP boundary guards
    /// the call with the bootstrap token.
    pub async fn bootstrap_approver(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> AppResult<UserId> {
        if self.user_repository.count().await? > 0 {
            return Err(AppError::Conflict(
                "the console has already been bootstrapped".to_owned(),
            ));
        }

        self.create_user(CreateUserParams {
            email: email.to_owned(),
            display_name: display_name.to_owned(),
            password: password.to_owned(),
            role: Role::Approver,
        })
        .await
    }

    /// Authenticates a console user with email and password.
    ///
    /// Returns [`AuthOutcome::Failed`] for every failure cause (unknown
    /// email, wrong password, locked account) to prevent enumeration.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<AuthOutcome> {
        let user = self.user_repository.find_by_email(email).await?;

        let Some(user) = user else {
            // Hash anyway so unknown emails cost the same as wrong passwords.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        if let Some(locked_until) = user.locked_until
            && Utc::now() < locked_until
        {
            let _ = self.password_hasher.hash_password(password);

            self.auth_event_service
                .record_event(AuthEvent {
                    subject: Some(user.id.to_string()),
                    event_type: "login_attempt".to_owned(),
                    outcome: "account_locked".to_owned(),
                    ip_address,
                    user_agent,
                })
                .await?;

            return Ok(AuthOutcome::Failed);
        }

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;

        if !password_valid {
            self.user_repository.record_failed_login(user.id).await?;

            self.auth_event_service
                .record_event(AuthEvent {
                    subject: Some(user.id.to_string()),
                    event_type: "login_attempt".to_owned(),
                    outcome: "invalid_password".to_owned(),
                    ip_address,
                    user_agent,
                })
                .await?;

            return Ok(AuthOutcome::Failed);
        }

        self.user_repository.reset_failed_logins(user.id).await?;

        self.auth_event_service
            .record_event(AuthEvent {
                subject: Some(user.id.to_string()),
                event_type: "login_attempt".to_owned(),
                outcome: "success".to_owned(),
                ip_address,
                user_agent,
            })
            .await?;

        Ok(AuthOutcome::Authenticated(user))
    }

    /// Changes the password for an authenticated user.
    ///
    /// Requires the current password for verification.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

        let current_valid = self
            .password_hasher
            .verify_password(current_password, &user.password_hash)?;

        if !current_valid {
            return Err(AppError::Unauthorized(
                "current password is incorrect".to_owned(),
            ));
        }

        validate_password(new_password)?;

        let new_hash = self.password_hasher.hash_password(new_password)?;
        self.user_repository
            .update_password(user_id, &new_hash)
            .await
    }

    /// Lists console users.
    pub async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        self.user_repository.list().await
    }

    /// Returns a user record by id, if it exists.
    pub async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.user_repository.find_by_id(user_id).await
    }
}
