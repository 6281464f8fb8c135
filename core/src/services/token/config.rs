//! Configuration for the token service

use chrono::Duration;
use sy_shared::TokenConfig;

use crate::domain::entities::token::{
    AUTH_TOKEN_TTL_HOURS, DEPLOY_TOKEN_TTL_HOURS, REFRESH_TOKEN_TTL_DAYS,
};

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Lifetime of authentication tokens
    pub auth_ttl: Duration,
    /// Lifetime of deployment tokens
    pub deploy_ttl: Duration,
    /// Lifetime of refresh tokens
    pub refresh_ttl: Duration,
    /// Upper bound for each repository call; `None` waits indefinitely
    pub call_timeout: Option<std::time::Duration>,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            auth_ttl: Duration::hours(AUTH_TOKEN_TTL_HOURS),
            deploy_ttl: Duration::hours(DEPLOY_TOKEN_TTL_HOURS),
            refresh_ttl: Duration::days(REFRESH_TOKEN_TTL_DAYS),
            call_timeout: None,
        }
    }
}

impl From<&TokenConfig> for TokenServiceConfig {
    fn from(config: &TokenConfig) -> Self {
        Self {
            auth_ttl: config.auth_ttl(),
            deploy_ttl: config.deploy_ttl(),
            refresh_ttl: config.refresh_ttl(),
            call_timeout: config.call_timeout(),
        }
    }
}
