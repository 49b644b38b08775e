//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Evaluate the authorization policy before every mutating operation.
//!
//! # Invariants
//! - Services hold no state beyond their repository; caller identity
//!   arrives as an explicit `Session` per call.
//! - No store failure escapes a service as a panic.

use crate::policy::PolicyViolation;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod auth_service;
pub mod goal_service;
pub mod report_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced at the access-layer boundary.
#[derive(Debug)]
pub enum ServiceError {
    /// The caller's session does not satisfy the action's ownership rule.
    Forbidden(PolicyViolation),
    /// Registration hit an existing username.
    AlreadyExists { username: String },
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forbidden(violation) => write!(f, "forbidden: {violation}"),
            Self::AlreadyExists { username } => {
                write!(f, "username already registered: {username}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Forbidden(violation) => Some(violation),
            Self::AlreadyExists { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<PolicyViolation> for ServiceError {
    fn from(value: PolicyViolation) -> Self {
        Self::Forbidden(value)
    }
}
