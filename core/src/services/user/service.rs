//! Main user service implementation

use std::future::Future;
use std::sync::Arc;

use sy_shared::Pagination;
use tracing::{debug, info, warn};

use crate::domain::entities::password::Password;
use crate::domain::entities::token::{TokenHash, TokenScope};
use crate::domain::entities::user::{User, STATUS_ACTIVE};
use crate::errors::{AuthError, DomainResult, TokenError};
use crate::repositories::UserRepository;
use crate::services::clock::{Clock, SystemClock};
use crate::services::deadline::with_deadline;

use super::config::UserServiceConfig;
use super::validation::{validate_password, validate_status, validate_username};

/// User service for account lifecycle and the admin approval workflow
///
/// Existence checks and the writes that follow them are separate
/// repository calls. Two concurrent registrations of one username can both
/// pass the check; the storage unique key rejects the second and it
/// surfaces as `UserAlreadyExists`.
pub struct UserService<U: UserRepository> {
    pub(crate) repository: U,
    config: UserServiceConfig,
    clock: Arc<dyn Clock>,
}

impl<U: UserRepository> UserService<U> {
    /// Create a new user service using the wall clock
    pub fn new(repository: U, config: UserServiceConfig) -> Self {
        Self::with_clock(repository, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        repository: U,
        config: UserServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            config,
            clock,
        }
    }

    pub fn repository(&self) -> &U {
        &self.repository
    }

    /// Register a new, unapproved account
    ///
    /// # Arguments
    ///
    /// * `username` - Desired login name (trimmed before use)
    /// * `password` - Plaintext password
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The stored user with `status = "pending"`
    /// * `Err(ValidationError)` - Username or password rejected
    /// * `Err(AuthError::UserAlreadyExists)` - Username taken
    pub async fn create_user(&self, username: &str, password: &str) -> DomainResult<User> {
        let created = self.insert_new(username, password, |_| {}).await?;

        info!(user_id = created.id, username = %created.username, "User created");
        Ok(created)
    }

    /// Check a username/password pair
    ///
    /// Failures are reported in a fixed order: unknown user, then wrong
    /// password, then an account still awaiting approval.
    pub async fn authenticate_user(&self, username: &str, password: &str) -> DomainResult<User> {
        let user = self
            .call(
                "users.find_by_username",
                self.repository.find_by_username(username.trim()),
            )
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.password.matches(password)? {
            warn!(user_id = user.id, "Authentication failed: invalid credentials");
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.is_approved() {
            warn!(user_id = user.id, "Authentication refused: account not approved");
            return Err(AuthError::NotApproved.into());
        }

        debug!(user_id = user.id, "User authenticated");
        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: i64) -> DomainResult<User> {
        self.find_existing(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> DomainResult<User> {
        self.call(
            "users.find_by_username",
            self.repository.find_by_username(username.trim()),
        )
        .await?
        .ok_or_else(|| AuthError::UserNotFound.into())
    }

    /// Persist changes to an existing user
    ///
    /// The username is re-validated and stored in its trimmed form.
    pub async fn update_user(&self, user: &mut User) -> DomainResult<()> {
        user.username = validate_username(&user.username)?.to_string();
        self.call("users.update", self.repository.update(user)).await?;
        debug!(user_id = user.id, "User updated");
        Ok(())
    }

    /// Delete an account; tokens go with it
    pub async fn delete_user(&self, username: &str) -> DomainResult<()> {
        let deleted = self
            .call(
                "users.delete_by_username",
                self.repository.delete_by_username(username.trim()),
            )
            .await?;

        if deleted == 0 {
            return Err(AuthError::UserNotFound.into());
        }
        info!(username = %username.trim(), "User deleted");
        Ok(())
    }

    /// Replace a password after re-authenticating with the current one
    pub async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let mut user = self.authenticate_user(username, current_password).await?;
        validate_password(new_password)?;

        user.password.set_with_cost(new_password, self.config.bcrypt_cost)?;
        let result = self.call("users.update", self.repository.update(&user)).await;
        user.password.clear_plain_text();
        result?;

        info!(user_id = user.id, "Password changed");
        Ok(())
    }

    /// Approve a pending account
    ///
    /// # Arguments
    ///
    /// * `user_id` - Account to approve; must exist and be unapproved
    /// * `approver_id` - Acting admin, re-read from storage
    pub async fn approve_user(&self, user_id: i64, approver_id: i64) -> DomainResult<()> {
        let user = self.find_existing(user_id).await?;
        if user.is_approved() {
            return Err(AuthError::AlreadyApproved.into());
        }

        self.require_admin(approver_id).await?;

        let approved = self
            .call(
                "users.approve",
                self.repository.approve(user_id, approver_id, self.clock.now()),
            )
            .await?;
        if approved == 0 {
            return Err(AuthError::UserNotFound.into());
        }

        info!(user_id, approver_id, "User approved");
        Ok(())
    }

    /// Grant the admin flag
    pub async fn make_admin(&self, user_id: i64, admin_id: i64) -> DomainResult<()> {
        self.require_admin(admin_id).await?;

        let mut user = self.find_existing(user_id).await?;
        user.is_admin = true;
        self.call("users.update", self.repository.update(&user)).await?;

        info!(user_id, admin_id, "Admin privileges granted");
        Ok(())
    }

    /// Remove the admin flag; admins cannot demote themselves
    pub async fn revoke_admin(&self, user_id: i64, admin_id: i64) -> DomainResult<()> {
        self.require_admin(admin_id).await?;

        if user_id == admin_id {
            return Err(AuthError::CannotRevokeOwnAdmin.into());
        }

        let mut user = self.find_existing(user_id).await?;
        user.is_admin = false;
        self.call("users.update", self.repository.update(&user)).await?;

        info!(user_id, admin_id, "Admin privileges revoked");
        Ok(())
    }

    /// Set an account's free-form status
    pub async fn update_user_status(
        &self,
        user_id: i64,
        status: &str,
        admin_id: i64,
    ) -> DomainResult<()> {
        let status = validate_status(status)?;
        self.require_admin(admin_id).await?;

        let mut user = self.find_existing(user_id).await?;
        user.status = status.to_string();
        self.call("users.update", self.repository.update(&user)).await?;

        info!(user_id, admin_id, status, "User status updated");
        Ok(())
    }

    /// Page through all users, newest first
    ///
    /// A non-positive limit becomes 10, limits above 100 become 100 and a
    /// negative offset becomes 0.
    pub async fn list_users(&self, limit: i64, offset: i64) -> DomainResult<Vec<User>> {
        let page = Pagination::new(limit, offset);
        self.call("users.list", self.repository.list(page)).await
    }

    /// Page through accounts awaiting approval, newest first
    pub async fn list_pending_users(&self, limit: i64, offset: i64) -> DomainResult<Vec<User>> {
        let page = Pagination::new(limit, offset);
        self.call("users.list_pending", self.repository.list_pending(page)).await
    }

    /// Resolve a bearer token to its owner
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - Owner of an unexpired token with the given scope
    /// * `Err(TokenError::NotFound)` - No such token, wrong scope, or expired
    pub async fn get_user_for_token(
        &self,
        scope: TokenScope,
        plaintext: &str,
    ) -> DomainResult<User> {
        let hash = TokenHash::from_plaintext(plaintext);
        self.call(
            "users.find_by_token",
            self.repository.find_by_token(scope, &hash, self.clock.now()),
        )
        .await?
        .ok_or_else(|| TokenError::NotFound.into())
    }

    /// Create the first admin so the approval workflow has someone to
    /// start from
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - An approved, active admin with no approver recorded
    /// * `Err(AuthError::UserAlreadyExists)` - An admin already exists
    ///
    /// The admin row is written by a single insert, so a failed bootstrap
    /// leaves nothing behind and can be retried.
    pub async fn bootstrap_admin(&self, username: &str, password: &str) -> DomainResult<User> {
        let admins = self
            .call("users.count_admins", self.repository.count_admins())
            .await?;
        if admins > 0 {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let now = self.clock.now();
        let user = self
            .insert_new(username, password, |user| {
                user.is_admin = true;
                user.approved_at = Some(now);
                user.status = STATUS_ACTIVE.to_string();
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
        Ok(user)
    }

    /// Validate, check for a clash, hash and insert in one `create` call
    async fn insert_new<F>(&self, username: &str, password: &str, prepare: F) -> DomainResult<User>
    where
        F: FnOnce(&mut User),
    {
        let username = validate_username(username)?;
        validate_password(password)?;

        if self
            .call("users.find_by_username", self.repository.find_by_username(username))
            .await?
            .is_some()
        {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let mut credential = Password::default();
        credential.set_with_cost(password, self.config.bcrypt_cost)?;
        let mut user = User::new(username, credential, self.clock.now());
        prepare(&mut user);

        let mut created = self
            .call("users.create", self.repository.create(&user))
            .await?;
        created.password.clear_plain_text();
        Ok(created)
    }

    async fn find_existing(&self, id: i64) -> DomainResult<User> {
        self.call("users.find_by_id", self.repository.find_by_id(id))
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    /// The actor must exist and hold the admin flag at call time
    async fn require_admin(&self, admin_id: i64) -> DomainResult<User> {
        match self
            .call("users.find_by_id", self.repository.find_by_id(admin_id))
            .await?
        {
            Some(admin) if admin.is_admin => Ok(admin),
            _ => {
                warn!(admin_id, "Admin action refused: insufficient permissions");
                Err(AuthError::InsufficientPermissions.into())
            }
        }
    }

    async fn call<T, F>(&self, operation: &'static str, future: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        with_deadline(self.config.call_timeout, operation, future).await
    }
}
