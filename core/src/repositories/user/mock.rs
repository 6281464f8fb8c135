//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use sy_shared::Pagination;
use tokio::sync::RwLock;

use crate::domain::entities::token::{TokenHash, TokenScope};
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};
use crate::repositories::token::MockTokenRepository;

use super::trait_::UserRepository;

#[derive(Default)]
struct UserTable {
    rows: BTreeMap<i64, User>,
    next_id: i64,
}

/// Mock user repository for testing
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<RwLock<UserTable>>,
    tokens: Option<MockTokenRepository>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `find_by_token` against the given token store
    pub fn with_tokens(mut self, tokens: MockTokenRepository) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Insert a user as-is, bypassing the service (test fixtures)
    pub async fn seed(&self, mut user: User) -> User {
        let mut table = self.users.write().await;
        table.next_id += 1;
        user.id = table.next_id;
        user.password.clear_plain_text();
        table.rows.insert(user.id, user.clone());
        user
    }

    fn page(mut users: Vec<User>, page: Pagination) -> Vec<User> {
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        users
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, user: &User) -> Result<User, DomainError> {
        let mut table = self.users.write().await;

        if table.rows.values().any(|u| u.username == user.username) {
            return Err(AuthError::UserAlreadyExists.into());
        }

        table.next_id += 1;
        let mut stored = user.clone();
        stored.id = table.next_id;
        stored.password.clear_plain_text();
        table.rows.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let table = self.users.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let table = self.users.read().await;
        Ok(table.rows.values().find(|u| u.username == username).cloned())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut table = self.users.write().await;

        if table
            .rows
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let row = table
            .rows
            .get_mut(&user.id)
            .ok_or(AuthError::UserNotFound)?;

        row.username = user.username.clone();
        row.password = user.password.clone();
        row.password.clear_plain_text();
        row.status = user.status.clone();
        row.is_admin = user.is_admin;
        row.approved_at = user.approved_at;
        row.approved_by = user.approved_by;
        Ok(())
    }

    async fn delete_by_username(&self, username: &str) -> Result<u64, DomainError> {
        let mut table = self.users.write().await;
        let id = table
            .rows
            .values()
            .find(|u| u.username == username)
            .map(|u| u.id);

        match id {
            Some(id) => {
                table.rows.remove(&id);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn approve(
        &self,
        user_id: i64,
        approved_by: i64,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let mut table = self.users.write().await;
        match table.rows.get_mut(&user_id) {
            Some(user) => {
                user.approve(approved_by, at);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn list(&self, page: Pagination) -> Result<Vec<User>, DomainError> {
        let table = self.users.read().await;
        Ok(Self::page(table.rows.values().cloned().collect(), page))
    }

    async fn list_pending(&self, page: Pagination) -> Result<Vec<User>, DomainError> {
        let table = self.users.read().await;
        let pending = table
            .rows
            .values()
            .filter(|u| !u.is_approved())
            .cloned()
            .collect();
        Ok(Self::page(pending, page))
    }

    async fn find_by_token(
        &self,
        scope: TokenScope,
        hash: &TokenHash,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DomainError> {
        let Some(tokens) = &self.tokens else {
            return Ok(None);
        };

        let owner = tokens
            .snapshot()
            .await
            .get(hash)
            .filter(|t| t.scope == scope && !t.is_expired_at(now))
            .map(|t| t.user_id);

        match owner {
            Some(user_id) => self.find_by_id(user_id).await,
            None => Ok(None),
        }
    }

    async fn count_admins(&self) -> Result<u64, DomainError> {
        let table = self.users.read().await;
        Ok(table.rows.values().filter(|u| u.is_admin).count() as u64)
    }
}
