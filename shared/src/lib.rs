//! Shared utilities and common types for the Shipyard server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and loading
//! - Logging bootstrap
//! - Error response envelope
//! - Field validators and pagination

pub mod config;
pub mod errors;
pub mod logging;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use crate::config::{
    AppConfig, AuthConfig, CleanupConfig, ConfigError, DatabaseConfig, Environment,
    LogFormat, LoggingConfig, PasswordConfig, TokenConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use types::Pagination;
pub use utils::validation;
