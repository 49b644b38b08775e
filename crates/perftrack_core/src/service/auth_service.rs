//! Registration and authentication use-cases.
//!
//! # Responsibility
//! - Register accounts with salted-hashed credentials.
//! - Authenticate submitted credentials into caller sessions.
//!
//! # Invariants
//! - Plaintext passwords never reach the repository layer.
//! - Unknown username and wrong password are indistinguishable to the
//!   caller; both yield an absent result.

use crate::auth::{encode_credential, verify_credential};
use crate::model::user::{Role, Session, UserId};
use crate::model::ValidationError;
use crate::repo::user_repo::UserRepository;
use crate::repo::{ConstraintKind, RepoError};
use crate::service::{ServiceError, ServiceResult};

/// Use-case service wrapper for account operations.
pub struct AuthService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> AuthService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new account and returns its id.
    ///
    /// # Contract
    /// - A username already present yields `ServiceError::AlreadyExists`
    ///   and leaves the store unchanged.
    /// - The submitted password is stored only as a salted hash.
    pub fn register(&self, username: &str, password: &str, role: Role) -> ServiceResult<UserId> {
        if password.is_empty() {
            return Err(RepoError::Validation(ValidationError::EmptyCredential).into());
        }

        let credential = encode_credential(password);
        match self.repo.create_user(username, &credential, role) {
            Ok(user_id) => Ok(user_id),
            Err(RepoError::Constraint {
                kind: ConstraintKind::Unique,
                ..
            }) => Err(ServiceError::AlreadyExists {
                username: username.to_string(),
            }),
            Err(other) => Err(other.into()),
        }
    }

    /// Checks submitted credentials and returns a session on success.
    ///
    /// Returns `Ok(None)` for unknown usernames and wrong passwords alike.
    pub fn authenticate(&self, username: &str, password: &str) -> ServiceResult<Option<Session>> {
        let record = match self.repo.credential_for(username)? {
            Some(record) => record,
            None => return Ok(None),
        };

        if !verify_credential(&record.credential, password) {
            return Ok(None);
        }

        Ok(Some(Session::for_user(&record.user)))
    }
}
