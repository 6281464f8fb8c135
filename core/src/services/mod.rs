//! Business services containing domain logic and use cases.

pub mod clock;
pub(crate) mod deadline;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use token::{
    CleanupResult, OsRandom, RandomSource, TokenCleanupConfig, TokenCleanupService,
    TokenService, TokenServiceConfig,
};
pub use user::{UserService, UserServiceConfig};
