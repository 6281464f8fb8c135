//! Main token service implementation

use std::future::Future;
use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::domain::entities::token::{Token, TokenHash, TokenScope};
use crate::domain::value_objects::TokenPair;
use crate::errors::{DomainResult, TokenError};
use crate::repositories::TokenRepository;
use crate::services::clock::{Clock, SystemClock};
use crate::services::deadline::with_deadline;

use super::config::TokenServiceConfig;
use super::generator::{OsRandom, RandomSource, TokenGenerator};

/// Service for issuing, validating and revoking opaque tokens
///
/// The service owns no locks. Eviction and insertion are separate
/// repository calls, so two concurrent issuances for the same user and
/// scope can both survive; the next issuance evicts them again.
pub struct TokenService<R: TokenRepository> {
    pub(crate) repository: R,
    config: TokenServiceConfig,
    generator: TokenGenerator,
    clock: Arc<dyn Clock>,
}

impl<R: TokenRepository> TokenService<R> {
    /// Creates a token service using the wall clock and the OS CSPRNG
    pub fn new(repository: R, config: TokenServiceConfig) -> Self {
        Self::with_sources(repository, config, Arc::new(SystemClock), Arc::new(OsRandom))
    }

    /// Creates a token service with explicit time and entropy sources
    ///
    /// # Arguments
    ///
    /// * `repository` - Token repository for persistence
    /// * `config` - Token lifetimes and call deadline
    /// * `clock` - Source of "now" for expiry stamping and validation
    /// * `random` - Entropy for token plaintexts
    pub fn with_sources(
        repository: R,
        config: TokenServiceConfig,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let generator = TokenGenerator::new(clock.clone(), random);
        Self {
            repository,
            config,
            generator,
            clock,
        }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Issues an authentication token, evicting the user's previous ones
    ///
    /// # Arguments
    ///
    /// * `user_id` - Owner of the new token
    /// * `ttl` - Lifetime of the new token
    ///
    /// # Returns
    ///
    /// * `Ok(Token)` - The new token, carrying its plaintext
    /// * `Err(DomainError)` - Generation or storage failed
    pub async fn create_auth_token(&self, user_id: i64, ttl: Duration) -> DomainResult<Token> {
        self.replace(user_id, ttl, TokenScope::Authentication).await
    }

    /// Issues an authentication token together with a refresh token
    ///
    /// Nothing is evicted. If storing the refresh token fails, the already
    /// stored authentication token is left in place and the error is
    /// returned.
    pub async fn create_auth_token_with_refresh(&self, user_id: i64) -> DomainResult<TokenPair> {
        let auth_token = self
            .issue(user_id, self.config.auth_ttl, TokenScope::Authentication)
            .await?;

        let refresh_token = match self
            .issue(user_id, self.config.refresh_ttl, TokenScope::Refresh)
            .await
        {
            Ok(token) => token,
            Err(e) => {
                warn!(
                    user_id,
                    auth_token = %auth_token.hash.short(),
                    error = %e,
                    "Refresh token issuance failed, authentication token remains active"
                );
                return Err(e);
            }
        };

        Ok(TokenPair::new(auth_token, refresh_token))
    }

    /// Issues a deployment token, evicting the user's previous ones
    pub async fn create_deploy_token(&self, user_id: i64) -> DomainResult<Token> {
        self.replace(user_id, self.config.deploy_ttl, TokenScope::Deployment).await
    }

    /// Checks a presented token
    ///
    /// Checks run in a fixed order: unknown hash is `NotFound`, then a
    /// token past its expiry is `Expired`, then a scope other than
    /// `expected_scope` is `InvalidScope`. Storage failures are returned
    /// as-is rather than reported as `NotFound`.
    ///
    /// # Returns
    ///
    /// * `Ok(Token)` - The stored token (without plaintext)
    /// * `Err(DomainError::Token(_))` - Token rejected
    /// * `Err(DomainError)` - Storage failure or timeout
    pub async fn validate_token(
        &self,
        plaintext: &str,
        expected_scope: TokenScope,
    ) -> DomainResult<Token> {
        let hash = TokenHash::from_plaintext(plaintext);

        let token = self
            .call("tokens.get_by_hash", self.repository.get_by_hash(&hash))
            .await?
            .ok_or(TokenError::NotFound)?;

        if token.is_expired_at(self.clock.now()) {
            debug!(token = %hash.short(), user_id = token.user_id, "Token expired");
            return Err(TokenError::Expired.into());
        }

        if token.scope != expected_scope {
            debug!(
                token = %hash.short(),
                expected = %expected_scope,
                actual = %token.scope,
                "Token scope mismatch"
            );
            return Err(TokenError::InvalidScope {
                expected: expected_scope,
                actual: token.scope,
            }
            .into());
        }

        Ok(token)
    }

    /// Trades a refresh token for a new authentication token
    ///
    /// The refresh token stays valid; the user's previous authentication
    /// tokens are evicted.
    pub async fn refresh_auth_token(&self, refresh_plaintext: &str) -> DomainResult<Token> {
        let refresh = self
            .validate_token(refresh_plaintext, TokenScope::Refresh)
            .await?;

        debug!(
            user_id = refresh.user_id,
            refresh_token = %refresh.hash.short(),
            "Refreshing authentication token"
        );
        self.create_auth_token(refresh.user_id, self.config.auth_ttl).await
    }

    /// Deletes a single token; unknown hashes are not an error
    pub async fn revoke_token(&self, hash: &TokenHash) -> DomainResult<u64> {
        let deleted = self
            .call("tokens.delete_by_hash", self.repository.delete_by_hash(hash))
            .await?;
        info!(token = %hash.short(), deleted, "Token revoked");
        Ok(deleted)
    }

    /// Deletes the token a client presents, e.g. on logout
    pub async fn revoke_token_plaintext(&self, plaintext: &str) -> DomainResult<u64> {
        self.revoke_token(&TokenHash::from_plaintext(plaintext)).await
    }

    /// Deletes every token a user holds in one scope
    pub async fn revoke_all_user_tokens(
        &self,
        user_id: i64,
        scope: TokenScope,
    ) -> DomainResult<u64> {
        let deleted = self
            .call(
                "tokens.delete_all_for_user",
                self.repository.delete_all_for_user(user_id, scope),
            )
            .await?;
        info!(user_id, scope = %scope, deleted, "User tokens revoked");
        Ok(deleted)
    }

    /// Evict every token of `scope`, then store a new one
    ///
    /// Generation happens before eviction; an entropy failure evicts nothing.
    async fn replace(&self, user_id: i64, ttl: Duration, scope: TokenScope) -> DomainResult<Token> {
        let token = self.generator.generate(user_id, ttl, scope)?;

        let evicted = self
            .call(
                "tokens.delete_all_for_user",
                self.repository.delete_all_for_user(user_id, scope),
            )
            .await?;
        if evicted > 0 {
            debug!(user_id, scope = %scope, evicted, "Evicted previous tokens");
        }

        self.store(token).await
    }

    /// Generate and store a token without evicting anything
    async fn issue(&self, user_id: i64, ttl: Duration, scope: TokenScope) -> DomainResult<Token> {
        let token = self.generator.generate(user_id, ttl, scope)?;
        self.store(token).await
    }

    async fn store(&self, token: Token) -> DomainResult<Token> {
        self.call("tokens.insert", self.repository.insert(&token)).await?;

        info!(
            user_id = token.user_id,
            scope = %token.scope,
            token = %token.hash.short(),
            expiry = %token.expiry,
            "Token issued"
        );
        Ok(token)
    }

    async fn call<T, F>(&self, operation: &'static str, future: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        with_deadline(self.config.call_timeout, operation, future).await
    }
}
