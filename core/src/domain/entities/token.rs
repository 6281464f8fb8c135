//! Opaque bearer tokens.
//!
//! A token is a random string handed to the client once. Only its SHA-256
//! digest is stored, and the digest is the lookup key.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Authentication token lifetime (2 hours)
pub const AUTH_TOKEN_TTL_HOURS: i64 = 2;

/// Deployment token lifetime (4 hours)
pub const DEPLOY_TOKEN_TTL_HOURS: i64 = 4;

/// Refresh token lifetime (7 days)
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Random bytes drawn for each token
pub const TOKEN_ENTROPY_BYTES: usize = 32;

/// Length of a SHA-256 digest
pub const TOKEN_HASH_LEN: usize = 32;

/// What a token may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    Authentication,
    Deployment,
    Refresh,
}

impl TokenScope {
    pub const ALL: [TokenScope; 3] = [
        TokenScope::Authentication,
        TokenScope::Deployment,
        TokenScope::Refresh,
    ];

    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenScope::Authentication => "authentication",
            TokenScope::Deployment => "deployment",
            TokenScope::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authentication" => Ok(TokenScope::Authentication),
            "deployment" => Ok(TokenScope::Deployment),
            "refresh" => Ok(TokenScope::Refresh),
            other => Err(format!("Unknown token scope: {}", other)),
        }
    }
}

/// SHA-256 digest of a token's plaintext
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenHash([u8; TOKEN_HASH_LEN]);

impl TokenHash {
    /// Digest a plaintext token
    pub fn from_plaintext(plaintext: &str) -> Self {
        Self(Sha256::digest(plaintext.as_bytes()).into())
    }

    pub fn from_bytes(bytes: [u8; TOKEN_HASH_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TOKEN_HASH_LEN] {
        &self.0
    }

    /// First 8 hex characters, enough to correlate log lines
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for TokenHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenHash({}..)", self.short())
    }
}

impl TryFrom<&[u8]> for TokenHash {
    type Error = std::array::TryFromSliceError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(<[u8; TOKEN_HASH_LEN]>::try_from(bytes)?))
    }
}

/// Bearer token entity
///
/// Only `token` (the plaintext, when present) and `expiry` are serialized;
/// the hash, owner and scope are server-side details.
#[derive(Clone, Serialize)]
pub struct Token {
    /// Plaintext, present only on a freshly generated token
    #[serde(rename = "token", skip_serializing_if = "Option::is_none")]
    pub plaintext: Option<String>,

    #[serde(skip)]
    pub hash: TokenHash,

    #[serde(skip)]
    pub user_id: i64,

    pub expiry: DateTime<Utc>,

    #[serde(skip)]
    pub scope: TokenScope,
}

impl Token {
    /// Build a freshly issued token, deriving its hash from the plaintext
    pub fn issued(
        plaintext: String,
        user_id: i64,
        expiry: DateTime<Utc>,
        scope: TokenScope,
    ) -> Self {
        let hash = TokenHash::from_plaintext(&plaintext);
        Self {
            plaintext: Some(plaintext),
            hash,
            user_id,
            expiry,
            scope,
        }
    }

    /// Rebuild a token read back from storage (no plaintext)
    pub fn stored(hash: TokenHash, user_id: i64, expiry: DateTime<Utc>, scope: TokenScope) -> Self {
        Self {
            plaintext: None,
            hash,
            user_id,
            expiry,
            scope,
        }
    }

    /// A token is expired once `now` is strictly past its expiry
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expiry
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("plaintext", &self.plaintext.as_ref().map(|_| "<redacted>"))
            .field("hash", &self.hash)
            .field("user_id", &self.user_id)
            .field("expiry", &self.expiry)
            .field("scope", &self.scope)
            .finish()
    }
}
