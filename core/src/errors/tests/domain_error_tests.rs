//! Unit tests for the domain error taxonomy

use std::error::Error as _;

use sy_shared::{error_codes, ErrorResponse, IntoErrorResponse};

use crate::domain::entities::token::TokenScope;
use crate::errors::{AuthError, DomainError, TokenError, ValidationError};

#[test]
fn test_error_codes_are_bridged() {
    let err: DomainError = TokenError::Expired.into();
    assert_eq!(err.error_code(), error_codes::TOKEN_EXPIRED);

    let err: DomainError = AuthError::NotApproved.into();
    assert_eq!(err.error_code(), error_codes::USER_NOT_APPROVED);

    let err: DomainError = ValidationError::username("too short").into();
    assert_eq!(err.error_code(), error_codes::INVALID_USERNAME);
    assert!(err.is_invalid_input());

    assert_eq!(DomainError::Timeout.error_code(), error_codes::TIMEOUT);
}

#[test]
fn test_unauthorized_classification() {
    assert!(DomainError::from(AuthError::InvalidCredentials).is_unauthorized());
    assert!(DomainError::from(AuthError::InsufficientPermissions).is_unauthorized());
    assert!(!DomainError::from(AuthError::UserNotFound).is_unauthorized());
    assert!(!DomainError::from(TokenError::NotFound).is_unauthorized());
}

#[test]
fn test_storage_error_keeps_source_but_hides_it_from_response() {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset by peer");
    let err = DomainError::storage(io);

    assert!(err.source().is_some());
    assert!(err.to_string().contains("connection reset"));

    let response = err.to_error_response();
    assert_eq!(response.error, error_codes::DATABASE_ERROR);
    assert!(!response.message.contains("connection reset"));
}

#[test]
fn test_invalid_scope_response_details() {
    let err = DomainError::from(TokenError::InvalidScope {
        expected: TokenScope::Deployment,
        actual: TokenScope::Authentication,
    });
    assert_eq!(
        err.to_string(),
        "Token scope mismatch: expected deployment, got authentication"
    );

    let response: ErrorResponse = err.into();
    assert_eq!(response.error, error_codes::TOKEN_INVALID_SCOPE);
    let details = response.details.unwrap();
    assert_eq!(details["expected"], "deployment");
    assert_eq!(details["actual"], "authentication");
}
