//! Configuration for the user service

use sy_shared::AuthConfig;

use crate::domain::entities::password::DEFAULT_BCRYPT_COST;

/// Configuration for the user service
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,
    /// Upper bound for each repository call; `None` waits indefinitely
    pub call_timeout: Option<std::time::Duration>,
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            call_timeout: None,
        }
    }
}

impl From<&AuthConfig> for UserServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            bcrypt_cost: config.password.bcrypt_cost,
            call_timeout: config.token.call_timeout(),
        }
    }
}
