//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{AuthError, TokenError, ValidationError};

use std::error::Error as StdError;

use sy_shared::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Opaque failure reported by a repository implementation
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn StdError + Send + Sync>),

    /// A repository call exceeded the configured per-call deadline
    #[error("Operation timed out")]
    Timeout,

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Wrap an infrastructure error
    pub fn storage<E>(error: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        DomainError::Storage(error.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
            DomainError::Storage(_) => error_codes::DATABASE_ERROR,
            DomainError::Timeout => error_codes::TIMEOUT,
            DomainError::Auth(e) => e.error_code(),
            DomainError::Token(e) => e.error_code(),
            DomainError::ValidationErr(e) => e.error_code(),
        }
    }

    /// Invalid credentials or missing privileges
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DomainError::Auth(e) if e.is_unauthorized())
    }

    /// Failures caused by the caller's input
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DomainError::ValidationErr(_) | DomainError::Token(TokenError::InvalidTtl { .. })
        )
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            // Infrastructure details stay in the logs
            DomainError::Storage(_) | DomainError::Internal { .. } => {
                ErrorResponse::new(self.error_code(), "Internal server error")
            }
            DomainError::Token(TokenError::InvalidScope { expected, actual }) => {
                ErrorResponse::new(self.error_code(), self.to_string())
                    .add_detail("expected", expected.as_str())
                    .add_detail("actual", actual.as_str())
            }
            _ => ErrorResponse::new(self.error_code(), self.to_string()),
        }
    }
}

impl From<DomainError> for ErrorResponse {
    fn from(error: DomainError) -> Self {
        error.to_error_response()
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
