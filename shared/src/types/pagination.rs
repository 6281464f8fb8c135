//! Limit/offset pagination for list queries

use serde::{Deserialize, Serialize};

/// Page size used when the caller asks for zero or a negative limit
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size a caller may request
pub const MAX_LIMIT: u32 = 100;

/// A sanitized limit/offset window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of rows to return, always within `1..=MAX_LIMIT`
    pub limit: u32,

    /// Number of rows to skip
    pub offset: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    /// Build a window from raw caller input
    ///
    /// Non-positive limits fall back to `DEFAULT_LIMIT`, limits above
    /// `MAX_LIMIT` are capped, and negative offsets become zero.
    pub fn new(limit: i64, offset: i64) -> Self {
        let limit = if limit <= 0 {
            DEFAULT_LIMIT
        } else {
            limit.min(MAX_LIMIT as i64) as u32
        };

        Self {
            limit,
            offset: offset.max(0) as u64,
        }
    }
}
