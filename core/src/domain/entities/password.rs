//! bcrypt-backed password credential.

use std::fmt;

use zeroize::Zeroize;

use crate::errors::{DomainError, DomainResult};

/// Work factor used when no cost is configured
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// A password hash, optionally paired with the plaintext it was built from
///
/// The plaintext is kept only until `clear_plain_text` is called (or the
/// value is dropped) and is zeroized at that point. Neither field is ever
/// printed by `Debug`.
#[derive(Clone, Default)]
pub struct Password {
    plain_text: Option<String>,
    hash: Vec<u8>,
}

impl Password {
    /// Wrap a hash loaded from storage
    pub fn from_hash(hash: Vec<u8>) -> Self {
        Self {
            plain_text: None,
            hash,
        }
    }

    /// Hash `plaintext` at the default cost
    pub fn set(&mut self, plaintext: &str) -> DomainResult<()> {
        self.set_with_cost(plaintext, DEFAULT_BCRYPT_COST)
    }

    /// Hash `plaintext` with an explicit bcrypt cost
    ///
    /// # Arguments
    /// * `plaintext` - The new password
    /// * `cost` - bcrypt work factor; values below 4 are rejected by bcrypt
    ///
    /// # Returns
    /// * `Ok(())` - Hash replaced, plaintext retained until cleared
    /// * `Err(DomainError::Internal)` - Hashing failed; the previous hash is kept
    pub fn set_with_cost(&mut self, plaintext: &str, cost: u32) -> DomainResult<()> {
        let hashed = bcrypt::hash(plaintext, cost)
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))?;

        self.clear_plain_text();
        self.plain_text = Some(plaintext.to_owned());
        self.hash = hashed.into_bytes();
        Ok(())
    }

    /// Compare a candidate against the stored hash
    ///
    /// A mismatch is `Ok(false)`. An empty or malformed stored hash is an
    /// error, so a corrupted row is never mistaken for a wrong password.
    pub fn matches(&self, candidate: &str) -> DomainResult<bool> {
        let hash = std::str::from_utf8(&self.hash)
            .map_err(|_| DomainError::internal("Stored password hash is not valid UTF-8"))?;

        bcrypt::verify(candidate, hash)
            .map_err(|e| DomainError::internal(format!("Failed to verify password: {}", e)))
    }

    /// Zeroize and forget the plaintext
    pub fn clear_plain_text(&mut self) {
        if let Some(mut plain) = self.plain_text.take() {
            plain.zeroize();
        }
    }

    pub fn plain_text(&self) -> Option<&str> {
        self.plain_text.as_deref()
    }

    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    pub fn is_set(&self) -> bool {
        !self.hash.is_empty()
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.clear_plain_text();
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Password")
            .field("plain_text", &self.plain_text.as_ref().map(|_| "<redacted>"))
            .field("is_set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lowest cost bcrypt accepts; keeps the tests fast
    const TEST_COST: u32 = 4;

    #[test]
    fn test_set_and_match() {
        let mut password = Password::default();
        password.set_with_cost("Valid1Pass", TEST_COST).unwrap();

        assert!(password.is_set());
        assert!(password.matches("Valid1Pass").unwrap());
        assert!(!password.matches("Valid1Pas").unwrap());
    }

    #[test]
    fn test_clear_plain_text() {
        let mut password = Password::default();
        password.set_with_cost("Valid1Pass", TEST_COST).unwrap();
        assert_eq!(password.plain_text(), Some("Valid1Pass"));

        password.clear_plain_text();
        assert!(password.plain_text().is_none());
        // Hash is untouched
        assert!(password.matches("Valid1Pass").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error_not_a_mismatch() {
        let password = Password::from_hash(b"not-a-bcrypt-hash".to_vec());
        assert!(password.matches("anything").is_err());

        let unset = Password::default();
        assert!(!unset.is_set());
        assert!(unset.matches("anything").is_err());
    }

    #[test]
    fn test_rejected_cost_keeps_previous_hash() {
        let mut password = Password::default();
        password.set_with_cost("Valid1Pass", TEST_COST).unwrap();
        let previous = password.hash().to_vec();

        assert!(password.set_with_cost("Other1Pass", 3).is_err());
        assert_eq!(password.hash(), previous.as_slice());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let mut password = Password::default();
        password.set_with_cost("Valid1Pass", TEST_COST).unwrap();

        let debug = format!("{:?}", password);
        assert!(!debug.contains("Valid1Pass"));
        assert!(!debug.contains("$2"));
    }
}
