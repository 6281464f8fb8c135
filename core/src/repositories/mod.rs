//! Persistence interfaces consumed by the services.

pub mod token;
pub mod user;

pub use token::TokenRepository;
pub use user::UserRepository;

#[cfg(any(test, feature = "mock-repositories"))]
pub use token::MockTokenRepository;
#[cfg(any(test, feature = "mock-repositories"))]
pub use user::MockUserRepository;
