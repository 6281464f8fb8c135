//! Opaque token generation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Duration;
use data_encoding::BASE32_NOPAD;
use rand::RngCore;
use zeroize::Zeroize;

use crate::domain::entities::token::{Token, TokenScope, TOKEN_ENTROPY_BYTES};
use crate::errors::{DomainResult, TokenError};
use crate::services::clock::Clock;

/// Source of token entropy
pub trait RandomSource: Send + Sync {
    /// Fill `dest` entirely or fail; partial output is never used
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error>;
}

/// Operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        rand::rngs::OsRng.try_fill_bytes(dest)
    }
}

/// Deterministic byte source for tests
///
/// Every call yields a different, predictable buffer. A failing source
/// reports an error on every call.
#[derive(Debug, Default)]
pub struct FixedRandom {
    calls: AtomicU64,
    failing: bool,
}

impl FixedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicU64::new(0),
            failing: true,
        }
    }
}

impl RandomSource for FixedRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        if self.failing {
            return Err(rand::Error::new("entropy source unavailable"));
        }
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as u8;
        for (i, byte) in dest.iter_mut().enumerate() {
            *byte = call.wrapping_mul(31).wrapping_add(i as u8);
        }
        Ok(())
    }
}

/// Builds tokens from a random source and a clock
#[derive(Clone)]
pub struct TokenGenerator {
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
}

impl TokenGenerator {
    pub fn new(clock: Arc<dyn Clock>, random: Arc<dyn RandomSource>) -> Self {
        Self { clock, random }
    }

    /// Generate a fresh token
    ///
    /// Draws 32 random bytes, encodes them as unpadded base-32 (52 chars),
    /// and stamps the token with `now + ttl`.
    ///
    /// # Returns
    /// * `Ok(Token)` - Token carrying its plaintext and SHA-256 hash
    /// * `Err(TokenError::GenerationFailed)` - The random source failed
    /// * `Err(TokenError::InvalidTtl)` - `now + ttl` overflows
    pub fn generate(&self, user_id: i64, ttl: Duration, scope: TokenScope) -> DomainResult<Token> {
        let expiry = self
            .clock
            .now()
            .checked_add_signed(ttl)
            .ok_or(TokenError::InvalidTtl {
                ttl_seconds: ttl.num_seconds(),
            })?;

        let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
        self.random
            .fill(&mut bytes)
            .map_err(|e| TokenError::GenerationFailed {
                reason: e.to_string(),
            })?;

        let plaintext = BASE32_NOPAD.encode(&bytes);
        bytes.zeroize();

        Ok(Token::issued(plaintext, user_id, expiry, scope))
    }
}
