//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes validate model fields before SQL mutations.
//! - Constraint breaches surface as typed `Constraint` failures with the
//!   violated constraint kind, never as a crash.
//! - Reads that match no row return `Ok(None)`/empty, not an error.

use crate::db::DbError;
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod goal_repo;
pub mod report_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Classified SQLite constraint breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Unique or primary-key constraint, e.g. a duplicate username.
    Unique,
    /// Foreign-key constraint, e.g. a goal referencing a missing user.
    ForeignKey,
    /// Any other constraint (NOT NULL, CHECK).
    Other,
}

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    Constraint {
        kind: ConstraintKind,
        message: String,
    },
    NotFound {
        entity: &'static str,
        id: i64,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Constraint { kind, message } => {
                let kind = match kind {
                    ConstraintKind::Unique => "unique",
                    ConstraintKind::ForeignKey => "foreign key",
                    ConstraintKind::Other => "other",
                };
                write!(f, "{kind} constraint violated: {message}")
            }
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Constraint { .. } | Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, ref message) = value {
            if code.code == rusqlite::ErrorCode::ConstraintViolation {
                let kind = match code.extended_code {
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => ConstraintKind::Unique,
                    rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
                    _ => ConstraintKind::Other,
                };
                let message = message
                    .clone()
                    .unwrap_or_else(|| "constraint violation".to_string());
                return Self::Constraint { kind, message };
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}
