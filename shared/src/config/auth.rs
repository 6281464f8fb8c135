//! Authentication and authorization configuration

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Lowest bcrypt cost the hashing library accepts
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest bcrypt cost the hashing library accepts
pub const MAX_BCRYPT_COST: u32 = 31;

/// Longest configurable token lifetime (one year)
pub const MAX_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Opaque token lifetimes, in seconds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Lifetime of `authentication` tokens
    #[serde(default = "default_auth_ttl")]
    pub auth_ttl_seconds: i64,

    /// Lifetime of `deployment` tokens
    #[serde(default = "default_deploy_ttl")]
    pub deploy_ttl_seconds: i64,

    /// Lifetime of `refresh` tokens
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_seconds: i64,

    /// Upper bound for a single storage call made by the token service
    #[serde(default)]
    pub call_timeout_ms: Option<u64>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            auth_ttl_seconds: default_auth_ttl(),
            deploy_ttl_seconds: default_deploy_ttl(),
            refresh_ttl_seconds: default_refresh_ttl(),
            call_timeout_ms: None,
        }
    }
}

/// Lifetimes above `MAX_TTL_SECONDS` are capped here; `AuthConfig::validate`
/// rejects them outright.
impl TokenConfig {
    pub fn auth_ttl(&self) -> Duration {
        capped_ttl(self.auth_ttl_seconds)
    }

    pub fn deploy_ttl(&self) -> Duration {
        capped_ttl(self.deploy_ttl_seconds)
    }

    pub fn refresh_ttl(&self) -> Duration {
        capped_ttl(self.refresh_ttl_seconds)
    }

    pub fn call_timeout(&self) -> Option<std::time::Duration> {
        self.call_timeout_ms.map(std::time::Duration::from_millis)
    }
}

/// Password hashing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PasswordConfig {
    /// bcrypt work factor
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

/// Expired token sweeping
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CleanupConfig {
    /// Whether the background sweeper runs at all
    #[serde(default = "default_cleanup_enabled")]
    pub enabled: bool,

    /// Seconds between sweeps
    #[serde(default = "default_cleanup_interval")]
    pub interval_seconds: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: default_cleanup_enabled(),
            interval_seconds: default_cleanup_interval(),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token: TokenConfig,

    #[serde(default)]
    pub password: PasswordConfig,

    #[serde(default)]
    pub cleanup: CleanupConfig,
}

impl AuthConfig {
    /// Check lifetimes and cost are in range
    pub fn validate(&self) -> Result<(), String> {
        let ttls = [
            ("auth.token.auth_ttl_seconds", self.token.auth_ttl_seconds),
            ("auth.token.deploy_ttl_seconds", self.token.deploy_ttl_seconds),
            ("auth.token.refresh_ttl_seconds", self.token.refresh_ttl_seconds),
        ];
        for (name, ttl) in ttls {
            if ttl <= 0 {
                return Err(format!("{name} must be positive, got {ttl}"));
            }
            if ttl > MAX_TTL_SECONDS {
                return Err(format!(
                    "{name} must be at most {MAX_TTL_SECONDS} seconds, got {ttl}"
                ));
            }
        }

        let cost = self.password.bcrypt_cost;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(format!(
                "auth.password.bcrypt_cost must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}, got {cost}"
            ));
        }

        if self.cleanup.enabled && self.cleanup.interval_seconds == 0 {
            return Err("auth.cleanup.interval_seconds must be non-zero".to_string());
        }
        Ok(())
    }
}

fn capped_ttl(seconds: i64) -> Duration {
    Duration::seconds(seconds.min(MAX_TTL_SECONDS))
}

fn default_auth_ttl() -> i64 {
    2 * 60 * 60 // 2 hours
}

fn default_deploy_ttl() -> i64 {
    4 * 60 * 60 // 4 hours, deploys finish quickly
}

fn default_refresh_ttl() -> i64 {
    7 * 24 * 60 * 60 // 7 days
}

fn default_bcrypt_cost() -> u32 {
    12
}

fn default_cleanup_enabled() -> bool {
    true
}

fn default_cleanup_interval() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lifetimes() {
        let config = TokenConfig::default();
        assert_eq!(config.auth_ttl(), Duration::hours(2));
        assert_eq!(config.deploy_ttl(), Duration::hours(4));
        assert_eq!(config.refresh_ttl(), Duration::days(7));
        assert!(config.call_timeout().is_none());
    }

    #[test]
    fn test_validate_rejects_bad_cost() {
        let mut config = AuthConfig::default();
        config.password.bcrypt_cost = 3;
        assert!(config.validate().is_err());

        config.password.bcrypt_cost = 4;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_ttl() {
        let mut config = AuthConfig::default();
        config.token.refresh_ttl_seconds = 0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("refresh_ttl_seconds"));
    }

    #[test]
    fn test_validate_rejects_oversized_ttl() {
        let mut config = AuthConfig::default();
        config.token.auth_ttl_seconds = i64::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.contains("auth_ttl_seconds"));

        config.token.auth_ttl_seconds = MAX_TTL_SECONDS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oversized_ttl_is_capped_not_panicking() {
        let config = TokenConfig {
            deploy_ttl_seconds: i64::MAX,
            ..TokenConfig::default()
        };
        assert_eq!(config.deploy_ttl(), Duration::seconds(MAX_TTL_SECONDS));
    }
}
