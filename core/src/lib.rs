//! # Shipyard Core
//!
//! Core business logic for the Shipyard auth backend: user accounts with an
//! admin approval workflow, and opaque bearer tokens in three scopes
//! (authentication, deployment, refresh). Storage is reached only through
//! the repository traits; `sy_infra` provides the MySQL implementations.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{Password, Token, TokenHash, TokenPair, TokenScope, User};
pub use errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
pub use repositories::{TokenRepository, UserRepository};
pub use services::{
    Clock, SystemClock, TokenCleanupConfig, TokenCleanupService, TokenService,
    TokenServiceConfig, UserService, UserServiceConfig,
};
