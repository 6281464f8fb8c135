//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::entities::token::{Token, TokenHash, TokenScope};
use crate::errors::{DomainError, TokenError};

use super::r#trait::TokenRepository;

/// In-memory token store
///
/// Clones share the same underlying map, so a clone can be handed to
/// `MockUserRepository::with_tokens` for token-to-user lookups.
#[derive(Clone)]
pub struct MockTokenRepository {
    tokens: Arc<RwLock<HashMap<TokenHash, Token>>>,
    unavailable: Arc<AtomicBool>,
    latency_ms: Arc<AtomicU64>,
    rejected_scope: Arc<Mutex<Option<TokenScope>>>,
}

impl MockTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            unavailable: Arc::new(AtomicBool::new(false)),
            latency_ms: Arc::new(AtomicU64::new(0)),
            rejected_scope: Arc::new(Mutex::new(None)),
        }
    }

    /// Make every call fail with a storage error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delay every call by `latency`
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms.store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Make inserts of the given scope fail with a storage error
    pub fn reject_inserts_for(&self, scope: Option<TokenScope>) {
        *self.rejected_scope.lock().unwrap() = scope;
    }

    /// Snapshot of every stored token
    pub async fn all(&self) -> Vec<Token> {
        self.tokens.read().await.values().cloned().collect()
    }

    pub(crate) async fn snapshot(&self) -> HashMap<TokenHash, Token> {
        self.tokens.read().await.clone()
    }

    async fn enter(&self) -> Result<(), DomainError> {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::storage("token store unavailable"));
        }
        Ok(())
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn insert(&self, token: &Token) -> Result<(), DomainError> {
        self.enter().await?;

        if *self.rejected_scope.lock().unwrap() == Some(token.scope) {
            return Err(DomainError::storage("insert rejected"));
        }

        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.hash) {
            return Err(TokenError::Conflict.into());
        }

        // Storage never sees the plaintext
        let stored = Token::stored(token.hash, token.user_id, token.expiry, token.scope);
        tokens.insert(token.hash, stored);
        Ok(())
    }

    async fn get_by_hash(&self, hash: &TokenHash) -> Result<Option<Token>, DomainError> {
        self.enter().await?;
        let tokens = self.tokens.read().await;
        Ok(tokens.get(hash).cloned())
    }

    async fn delete_by_hash(&self, hash: &TokenHash) -> Result<u64, DomainError> {
        self.enter().await?;
        let mut tokens = self.tokens.write().await;
        Ok(tokens.remove(hash).map_or(0, |_| 1))
    }

    async fn delete_all_for_user(&self, user_id: i64, scope: TokenScope) -> Result<u64, DomainError> {
        self.enter().await?;
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();

        tokens.retain(|_, t| !(t.user_id == user_id && t.scope == scope));

        Ok((before - tokens.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        self.enter().await?;
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();

        tokens.retain(|_, t| t.expiry >= now);

        Ok((before - tokens.len()) as u64)
    }

    async fn count_for_user(&self, user_id: i64, scope: TokenScope) -> Result<u64, DomainError> {
        self.enter().await?;
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .filter(|t| t.user_id == user_id && t.scope == scope)
            .count() as u64)
    }
}
