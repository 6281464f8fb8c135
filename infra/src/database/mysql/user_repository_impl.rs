//! MySQL implementation of the UserRepository trait.
//!
//! The bcrypt hash is stored as raw bytes in `password_hash`. Usernames are
//! compared with a binary collation, so lookups are case-sensitive.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use sy_core::domain::entities::password::Password;
use sy_core::domain::entities::token::{TokenHash, TokenScope};
use sy_core::domain::entities::user::User;
use sy_core::errors::{AuthError, DomainError};
use sy_core::repositories::UserRepository;
use sy_shared::Pagination;

use super::{column_error, is_unique_violation, storage_error};

const USER_COLUMNS: &str =
    "u.id, u.username, u.password_hash, u.created_at, u.approved_at, u.approved_by, u.is_admin, u.status";

/// MySQL implementation of UserRepository
#[derive(Clone)]
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let password_hash: Vec<u8> = row
            .try_get("password_hash")
            .map_err(column_error("password_hash"))?;

        Ok(User {
            id: row.try_get("id").map_err(column_error("id"))?,
            username: row.try_get("username").map_err(column_error("username"))?,
            password: Password::from_hash(password_hash),
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(column_error("created_at"))?,
            approved_at: row
                .try_get::<Option<DateTime<Utc>>, _>("approved_at")
                .map_err(column_error("approved_at"))?,
            approved_by: row.try_get("approved_by").map_err(column_error("approved_by"))?,
            is_admin: row.try_get("is_admin").map_err(column_error("is_admin"))?,
            status: row.try_get("status").map_err(column_error("status"))?,
        })
    }

    fn rows_to_users(rows: &[sqlx::mysql::MySqlRow]) -> Result<Vec<User>, DomainError> {
        rows.iter().map(Self::row_to_user).collect()
    }

    async fn exists(&self, id: i64) -> Result<bool, DomainError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("users.exists"))?;

        Ok(found.is_some())
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, user: &User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                username, password_hash, created_at, approved_at, approved_by, is_admin, status
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(&user.username)
            .bind(user.password.hash())
            .bind(user.created_at)
            .bind(user.approved_at)
            .bind(user.approved_by)
            .bind(user.is_admin)
            .bind(&user.status)
            .execute(&self.pool)
            .await;

        let result = match result {
            Ok(result) => result,
            Err(e) if is_unique_violation(&e) => return Err(AuthError::UserAlreadyExists.into()),
            Err(e) => return Err(storage_error("users.create")(e)),
        };

        let mut created = user.clone();
        created.id = result.last_insert_id() as i64;
        created.password.clear_plain_text();
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users u WHERE u.id = ? LIMIT 1", USER_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("users.find_by_id"))?;

        result.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users u WHERE u.username = ? LIMIT 1",
            USER_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("users.find_by_username"))?;

        result.as_ref().map(Self::row_to_user).transpose()
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let query = r#"
            UPDATE users
            SET username = ?, password_hash = ?, approved_at = ?, approved_by = ?,
                is_admin = ?, status = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.username)
            .bind(user.password.hash())
            .bind(user.approved_at)
            .bind(user.approved_by)
            .bind(user.is_admin)
            .bind(&user.status)
            .bind(user.id)
            .execute(&self.pool)
            .await;

        let result = match result {
            Ok(result) => result,
            Err(e) if is_unique_violation(&e) => return Err(AuthError::UserAlreadyExists.into()),
            Err(e) => return Err(storage_error("users.update")(e)),
        };

        // An unchanged row can report zero affected rows
        if result.rows_affected() == 0 && !self.exists(user.id).await? {
            return Err(AuthError::UserNotFound.into());
        }
        Ok(())
    }

    async fn delete_by_username(&self, username: &str) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(storage_error("users.delete_by_username"))?;

        Ok(result.rows_affected())
    }

    async fn approve(
        &self,
        user_id: i64,
        approved_by: i64,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query("UPDATE users SET approved_at = ?, approved_by = ? WHERE id = ?")
            .bind(at)
            .bind(approved_by)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(storage_error("users.approve"))?;

        Ok(result.rows_affected())
    }

    async fn list(&self, page: Pagination) -> Result<Vec<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users u ORDER BY u.created_at DESC, u.id DESC LIMIT ? OFFSET ?",
            USER_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("users.list"))?;

        Self::rows_to_users(&rows)
    }

    async fn list_pending(&self, page: Pagination) -> Result<Vec<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users u WHERE u.approved_at IS NULL \
             ORDER BY u.created_at DESC, u.id DESC LIMIT ? OFFSET ?",
            USER_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("users.list_pending"))?;

        Self::rows_to_users(&rows)
    }

    async fn find_by_token(
        &self,
        scope: TokenScope,
        hash: &TokenHash,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users u \
             INNER JOIN tokens t ON t.user_id = u.id \
             WHERE t.hash = ? AND t.scope = ? AND t.expiry >= ? \
             LIMIT 1",
            USER_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(hash.as_bytes().as_slice())
            .bind(scope.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("users.find_by_token"))?;

        result.as_ref().map(Self::row_to_user).transpose()
    }

    async fn count_admins(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_admin = TRUE")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("users.count_admins"))?;

        Ok(count.max(0) as u64)
    }
}
