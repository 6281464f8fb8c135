//! Username, password and status rules

use sy_shared::validation::validators;

use crate::errors::ValidationError;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 100;
pub const STATUS_MAX_LEN: usize = 32;

/// Check a username and return its trimmed form
///
/// After trimming it must be 3 to 50 characters of letters, digits,
/// underscores or hyphens.
pub fn validate_username(username: &str) -> Result<&str, ValidationError> {
    let username = username.trim();

    if !validators::length_between(username, USERNAME_MIN_LEN, USERNAME_MAX_LEN) {
        return Err(ValidationError::username(format!(
            "must be between {} and {} characters",
            USERNAME_MIN_LEN, USERNAME_MAX_LEN
        )));
    }
    if !validators::is_identifier(username) {
        return Err(ValidationError::username(
            "may only contain letters, digits, underscores and hyphens",
        ));
    }
    Ok(username)
}

/// Check password length and character classes
///
/// bcrypt only reads the first 72 bytes, so two long passwords sharing a
/// 72-byte prefix hash identically.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if !validators::length_between(password, PASSWORD_MIN_LEN, PASSWORD_MAX_LEN) {
        return Err(ValidationError::password(format!(
            "must be between {} and {} characters",
            PASSWORD_MIN_LEN, PASSWORD_MAX_LEN
        )));
    }
    if !(validators::has_uppercase(password)
        && validators::has_lowercase(password)
        && validators::has_digit(password))
    {
        return Err(ValidationError::password(
            "must contain an uppercase letter, a lowercase letter and a digit",
        ));
    }
    Ok(())
}

/// Statuses are free-form but must fit the storage column
pub fn validate_status(status: &str) -> Result<&str, ValidationError> {
    let status = status.trim();
    if !validators::not_empty(status) {
        return Err(ValidationError::status("must not be empty"));
    }
    if status.len() > STATUS_MAX_LEN {
        return Err(ValidationError::status(format!(
            "must be at most {} characters",
            STATUS_MAX_LEN
        )));
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("ab").is_err());
        assert_eq!(validate_username("user_name-1").unwrap(), "user_name-1");
        assert_eq!(validate_username("  alice  ").unwrap(), "alice");
        assert!(validate_username("  ab  ").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("émile").is_err());
        assert!(validate_username(&"a".repeat(50)).is_ok());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("alllowercase1").is_err());
        assert!(validate_password("ALLUPPERCASE1").is_err());
        assert!(validate_password("NoDigitsHere").is_err());
        assert!(validate_password("Sh0rt").is_err());
        assert!(validate_password("Valid1Pass").is_ok());

        let long = format!("Aa1{}", "x".repeat(97));
        assert_eq!(long.len(), 100);
        assert!(validate_password(&long).is_ok());
        assert!(validate_password(&format!("{}x", long)).is_err());
    }

    #[test]
    fn test_status_rules() {
        assert_eq!(validate_status(" suspended ").unwrap(), "suspended");
        assert!(validate_status("   ").is_err());
        assert!(validate_status(&"s".repeat(33)).is_err());
    }

    #[test]
    fn test_error_kinds() {
        assert!(matches!(
            validate_username("x"),
            Err(ValidationError::InvalidUsername { .. })
        ));
        assert!(matches!(
            validate_password("x"),
            Err(ValidationError::InvalidPassword { .. })
        ));
    }
}
