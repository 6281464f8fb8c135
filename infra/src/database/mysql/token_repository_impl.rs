//! MySQL implementation of the TokenRepository trait.
//!
//! Tokens are keyed by their SHA-256 hash (`BINARY(32)`); the plaintext never
//! reaches the database. Each method is a single statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use sy_core::domain::entities::token::{Token, TokenHash, TokenScope};
use sy_core::errors::{DomainError, TokenError};
use sy_core::repositories::TokenRepository;

use super::{column_error, is_unique_violation, storage_error};

/// MySQL implementation of TokenRepository
#[derive(Clone)]
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to a stored Token (no plaintext)
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<Token, DomainError> {
        let hash: Vec<u8> = row.try_get("hash").map_err(column_error("hash"))?;
        let hash = TokenHash::try_from(hash.as_slice())
            .map_err(|e| DomainError::internal(format!("Invalid token hash length: {}", e)))?;

        let scope: String = row.try_get("scope").map_err(column_error("scope"))?;
        let scope = scope.parse::<TokenScope>().map_err(DomainError::internal)?;

        Ok(Token::stored(
            hash,
            row.try_get("user_id").map_err(column_error("user_id"))?,
            row.try_get::<DateTime<Utc>, _>("expiry")
                .map_err(column_error("expiry"))?,
            scope,
        ))
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn insert(&self, token: &Token) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO tokens (hash, user_id, expiry, scope)
            VALUES (?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(token.hash.as_bytes().as_slice())
            .bind(token.user_id)
            .bind(token.expiry)
            .bind(token.scope.as_str())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(TokenError::Conflict.into()),
            Err(e) => Err(storage_error("tokens.insert")(e)),
        }
    }

    async fn get_by_hash(&self, hash: &TokenHash) -> Result<Option<Token>, DomainError> {
        let query = r#"
            SELECT hash, user_id, expiry, scope
            FROM tokens
            WHERE hash = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(hash.as_bytes().as_slice())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("tokens.get_by_hash"))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_by_hash(&self, hash: &TokenHash) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM tokens WHERE hash = ?")
            .bind(hash.as_bytes().as_slice())
            .execute(&self.pool)
            .await
            .map_err(storage_error("tokens.delete_by_hash"))?;

        Ok(result.rows_affected())
    }

    async fn delete_all_for_user(&self, user_id: i64, scope: TokenScope) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM tokens WHERE user_id = ? AND scope = ?")
            .bind(user_id)
            .bind(scope.as_str())
            .execute(&self.pool)
            .await
            .map_err(storage_error("tokens.delete_all_for_user"))?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM tokens WHERE expiry < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(storage_error("tokens.delete_expired"))?;

        Ok(result.rows_affected())
    }

    async fn count_for_user(&self, user_id: i64, scope: TokenScope) -> Result<u64, DomainError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tokens WHERE user_id = ? AND scope = ?")
                .bind(user_id)
                .bind(scope.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(storage_error("tokens.count_for_user"))?;

        Ok(count.max(0) as u64)
    }
}
