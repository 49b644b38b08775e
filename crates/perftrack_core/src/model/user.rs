//! User account model and caller session value.
//!
//! # Responsibility
//! - Define the `User` record and its `Role`.
//! - Define the explicit `Session` value callers pass into every
//!   access-layer operation.
//!
//! # Invariants
//! - `username` is unique and non-empty.
//! - `role` is immutable after registration.
//! - The access layer holds no session state of its own; a `Session` is
//!   always supplied by the caller.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};

/// Stable identifier for a registered user.
pub type UserId = i64;

/// Account role deciding which operations a caller may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Works against goals assigned to them.
    Employee,
    /// Assigns goals, updates status and gives feedback.
    Manager,
}

impl Role {
    pub fn is_manager(self) -> bool {
        matches!(self, Self::Manager)
    }
}

/// Registered account as read back from storage.
///
/// The stored credential is intentionally absent from this shape; it never
/// leaves the repository layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
}

/// Authenticated caller identity passed into access-layer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
}

impl Session {
    /// Builds a session for an authenticated user record.
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Rejects empty or whitespace-only usernames before persistence.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    Ok(())
}
