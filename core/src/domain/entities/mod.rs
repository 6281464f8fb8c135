//! Domain entities representing core business objects.

pub mod password;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use password::{Password, DEFAULT_BCRYPT_COST};
pub use token::{
    Token, TokenHash, TokenScope,
    AUTH_TOKEN_TTL_HOURS, DEPLOY_TOKEN_TTL_HOURS, REFRESH_TOKEN_TTL_DAYS,
    TOKEN_ENTROPY_BYTES,
};
pub use user::{User, STATUS_ACTIVE, STATUS_PENDING};
