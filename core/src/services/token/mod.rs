//! Token service module for opaque bearer tokens
//!
//! This module handles all token-related operations including:
//! - Token generation from an injected entropy source
//! - Issuance with per-scope eviction
//! - Validation, refresh and revocation
//! - Background cleanup of expired tokens

mod cleanup;
mod config;
mod generator;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use config::TokenServiceConfig;
pub use generator::{FixedRandom, OsRandom, RandomSource, TokenGenerator};
pub use service::TokenService;
