//! Domain-specific error types for accounts, tokens and input validation
//!
//! Each enum exposes a stable machine-readable code through `error_code()`.
//! Human-facing wording belongs to whatever presentation layer wraps the
//! services; the `Display` strings here are meant for logs.

use sy_shared::error_codes;
use thiserror::Error;

use crate::domain::entities::token::TokenScope;

/// Account and authorization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    /// Unknown password for an existing account
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Actor lacks the admin flag (or no longer exists)
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("User has not been approved")]
    NotApproved,

    #[error("User is already approved")]
    AlreadyApproved,

    #[error("Admins cannot revoke their own admin status")]
    CannotRevokeOwnAdmin,
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::UserNotFound => error_codes::USER_NOT_FOUND,
            AuthError::UserAlreadyExists => error_codes::USER_ALREADY_EXISTS,
            AuthError::InvalidCredentials => error_codes::UNAUTHORIZED,
            AuthError::InsufficientPermissions => error_codes::FORBIDDEN,
            AuthError::NotApproved => error_codes::USER_NOT_APPROVED,
            AuthError::AlreadyApproved => error_codes::USER_ALREADY_APPROVED,
            AuthError::CannotRevokeOwnAdmin => error_codes::FORBIDDEN,
        }
    }

    /// Whether the caller should be treated as unauthorized
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::InsufficientPermissions
        )
    }
}

/// Token lookup and issuance errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// No stored token has this hash (never issued, revoked, or swept)
    #[error("Token not found")]
    NotFound,

    #[error("Token expired")]
    Expired,

    #[error("Token scope mismatch: expected {expected}, got {actual}")]
    InvalidScope {
        expected: TokenScope,
        actual: TokenScope,
    },

    /// A token with the same hash is already stored
    #[error("Token already exists")]
    Conflict,

    #[error("Token generation failed: {reason}")]
    GenerationFailed { reason: String },

    /// The requested lifetime puts the expiry outside the representable range
    #[error("Token lifetime out of range: {ttl_seconds}s")]
    InvalidTtl { ttl_seconds: i64 },
}

impl TokenError {
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::NotFound => error_codes::TOKEN_NOT_FOUND,
            TokenError::Expired => error_codes::TOKEN_EXPIRED,
            TokenError::InvalidScope { .. } => error_codes::TOKEN_INVALID_SCOPE,
            TokenError::Conflict => error_codes::CONFLICT,
            TokenError::GenerationFailed { .. } => error_codes::TOKEN_GENERATION_FAILED,
            TokenError::InvalidTtl { .. } => error_codes::VALIDATION_ERROR,
        }
    }
}

/// Input validation errors
///
/// Raised before any persistence call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid username: {reason}")]
    InvalidUsername { reason: String },

    #[error("Invalid password: {reason}")]
    InvalidPassword { reason: String },

    #[error("Invalid status: {reason}")]
    InvalidStatus { reason: String },
}

impl ValidationError {
    pub fn username(reason: impl Into<String>) -> Self {
        ValidationError::InvalidUsername {
            reason: reason.into(),
        }
    }

    pub fn password(reason: impl Into<String>) -> Self {
        ValidationError::InvalidPassword {
            reason: reason.into(),
        }
    }

    pub fn status(reason: impl Into<String>) -> Self {
        ValidationError::InvalidStatus {
            reason: reason.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidUsername { .. } => error_codes::INVALID_USERNAME,
            ValidationError::InvalidPassword { .. } => error_codes::INVALID_PASSWORD,
            ValidationError::InvalidStatus { .. } => error_codes::VALIDATION_ERROR,
        }
    }
}
