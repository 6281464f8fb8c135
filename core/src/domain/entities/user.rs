//! User entity representing a registered account.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::password::Password;

/// Status assigned to accounts that have not been reviewed yet
pub const STATUS_PENDING: &str = "pending";

/// Status given to the bootstrap admin
pub const STATUS_ACTIVE: &str = "active";

/// User entity
///
/// The password and the approving admin are never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Storage-assigned identifier (0 until persisted)
    pub id: i64,

    /// Unique login name
    pub username: String,

    #[serde(skip)]
    pub password: Password,

    pub created_at: DateTime<Utc>,

    /// Set once an admin approves the account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,

    #[serde(skip)]
    pub approved_by: Option<i64>,

    pub is_admin: bool,

    /// Free-form account status
    pub status: String,
}

impl User {
    /// Creates a new, unapproved user that has not been persisted
    pub fn new(username: impl Into<String>, password: Password, created_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            username: username.into(),
            password,
            created_at,
            approved_at: None,
            approved_by: None,
            is_admin: false,
            status: STATUS_PENDING.to_string(),
        }
    }

    /// Only approved users may authenticate
    pub fn is_approved(&self) -> bool {
        self.approved_at.is_some()
    }

    /// Records an approval; `status` is managed separately by admins
    pub fn approve(&mut self, approved_by: i64, at: DateTime<Utc>) {
        self.approved_at = Some(at);
        self.approved_by = Some(approved_by);
    }
}
