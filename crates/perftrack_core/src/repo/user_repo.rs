//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist registrations and read account rows back.
//! - Keep the stored credential inside the persistence boundary.
//!
//! # Invariants
//! - `create_user` receives an already-encoded credential, never plaintext.
//! - A duplicate username surfaces as a unique-constraint failure.

use crate::model::user::{validate_username, Role, User, UserId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const USER_SELECT_SQL: &str = "SELECT user_id, username, is_manager FROM users";

/// User row paired with its stored credential, for verification only.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub user: User,
    pub credential: String,
}

/// Repository interface for account rows.
pub trait UserRepository {
    /// Inserts a new user and returns its id.
    fn create_user(&self, username: &str, credential: &str, role: Role) -> RepoResult<UserId>;
    /// Loads the user and stored credential for a username, if present.
    fn credential_for(&self, username: &str) -> RepoResult<Option<CredentialRecord>>;
    /// Loads one user by id.
    fn get_user(&self, user_id: UserId) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, username: &str, credential: &str, role: Role) -> RepoResult<UserId> {
        validate_username(username)?;

        self.conn.execute(
            "INSERT INTO users (username, password, is_manager) VALUES (?1, ?2, ?3);",
            params![username, credential, role_to_db(role)],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn credential_for(&self, username: &str) -> RepoResult<Option<CredentialRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, username, is_manager, password
             FROM users
             WHERE username = ?1;",
        )?;

        let mut rows = stmt.query([username])?;
        if let Some(row) = rows.next()? {
            let user = parse_user_row(row)?;
            return Ok(Some(CredentialRecord {
                user,
                credential: row.get("password")?,
            }));
        }

        Ok(None)
    }

    fn get_user(&self, user_id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE user_id = ?1;"))?;

        let mut rows = stmt.query([user_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }

        Ok(None)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let role = match row.get::<_, i64>("is_manager")? {
        0 => Role::Employee,
        1 => Role::Manager,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_manager value `{other}` in users.is_manager"
            )));
        }
    };

    Ok(User {
        user_id: row.get("user_id")?,
        username: row.get("username")?,
        role,
    })
}

fn role_to_db(role: Role) -> i64 {
    if role.is_manager() {
        1
    } else {
        0
    }
}
