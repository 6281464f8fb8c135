//! Type definitions shared across crates
//!
//! - `pagination` - Limit/offset windows for list queries

pub mod pagination;

pub use pagination::{Pagination, DEFAULT_LIMIT, MAX_LIMIT};
