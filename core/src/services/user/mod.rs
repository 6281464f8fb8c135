//! User service module
//!
//! Account registration, credential checks and the admin approval
//! workflow.

mod config;
mod service;
pub mod validation;


pub use config::UserServiceConfig;
pub use service::UserService;
