//! Token repository trait defining the interface for token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::token::{Token, TokenHash, TokenScope};
use crate::errors::DomainError;

/// Repository trait for Token entity persistence operations
///
/// Tokens are keyed by the SHA-256 digest of their plaintext; the plaintext
/// itself must never reach storage. The repository performs no expiry or
/// scope checks, those belong to the token service.
///
/// Every method maps to a single storage statement, so dropping a call
/// mid-flight never leaves a half-applied write.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Store a newly issued token
    ///
    /// # Arguments
    /// * `token` - The token to persist; its `plaintext` is ignored
    ///
    /// # Returns
    /// * `Ok(())` - Token stored
    /// * `Err(DomainError::Token(TokenError::Conflict))` - A token with this hash exists
    /// * `Err(DomainError)` - Storage failure
    async fn insert(&self, token: &Token) -> Result<(), DomainError>;

    /// Look a token up by its hash
    ///
    /// # Returns
    /// * `Ok(Some(Token))` - Token found (without plaintext)
    /// * `Ok(None)` - No token stored under this hash
    /// * `Err(DomainError)` - Storage failure
    async fn get_by_hash(&self, hash: &TokenHash) -> Result<Option<Token>, DomainError>;

    /// Delete a single token
    ///
    /// Deleting a hash that is not stored is not an error.
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of tokens removed (0 or 1)
    async fn delete_by_hash(&self, hash: &TokenHash) -> Result<u64, DomainError>;

    /// Delete every token a user holds in one scope
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of tokens removed, possibly 0
    async fn delete_all_for_user(&self, user_id: i64, scope: TokenScope) -> Result<u64, DomainError>;

    /// Delete tokens whose expiry is strictly before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;

    /// Count the tokens a user holds in one scope, expired or not
    async fn count_for_user(&self, user_id: i64, scope: TokenScope) -> Result<u64, DomainError>;
}
