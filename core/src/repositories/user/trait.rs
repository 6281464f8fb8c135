//! User repository trait defining the interface for user data persistence.
//!
//! The trait is async-first; implementations translate their own failures
//! into `DomainError` and keep the domain free of storage types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sy_shared::Pagination;

use crate::domain::entities::token::{TokenHash, TokenScope};
use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user
    ///
    /// # Arguments
    /// * `user` - The user to insert; its `id` is ignored
    ///
    /// # Returns
    /// * `Ok(User)` - The stored user carrying its assigned id
    /// * `Err(DomainError::Auth(AuthError::UserAlreadyExists))` - Username taken
    /// * `Err(DomainError)` - Storage failure
    async fn create(&self, user: &User) -> Result<User, DomainError>;

    /// Find a user by id
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with this id
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;

    /// Find a user by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Overwrite username, password hash, status, admin flag and approval
    /// fields of an existing user
    ///
    /// # Returns
    /// * `Ok(())` - Row updated
    /// * `Err(DomainError::Auth(AuthError::UserNotFound))` - No user with `user.id`
    /// * `Err(DomainError::Auth(AuthError::UserAlreadyExists))` - New username taken
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    /// Delete a user (and, through the foreign key, their tokens)
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of users removed (0 or 1)
    async fn delete_by_username(&self, username: &str) -> Result<u64, DomainError>;

    /// Mark a user approved
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of users updated (0 when the id is unknown)
    async fn approve(
        &self,
        user_id: i64,
        approved_by: i64,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError>;

    /// Page through all users, newest first
    async fn list(&self, page: Pagination) -> Result<Vec<User>, DomainError>;

    /// Page through users awaiting approval, newest first
    async fn list_pending(&self, page: Pagination) -> Result<Vec<User>, DomainError>;

    /// Resolve the owner of a token that has the given scope and has not
    /// expired at `now`
    async fn find_by_token(
        &self,
        scope: TokenScope,
        hash: &TokenHash,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DomainError>;

    /// Number of users holding the admin flag
    async fn count_admins(&self) -> Result<u64, DomainError>;
}
