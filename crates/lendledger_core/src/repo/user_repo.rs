//! User repository contract and SQLite implementation.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::user::{Role, User};
use log::debug;
use rusqlite::{params, Connection, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    name,
    role,
    credential_hash
FROM users";

const USER_COLUMNS: &[&str] = &["id", "name", "role", "credential_hash"];

/// Repository interface for the user collection.
pub trait UserRepository {
    /// Inserts `user` unless its id exists. Returns `true` when inserted.
    fn add(&self, user: &User) -> RepoResult<bool>;
    fn find(&self, id: &str) -> RepoResult<Option<User>>;
    /// Full snapshot ordered by id.
    fn get_all(&self) -> RepoResult<Vec<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "users", USER_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn add(&self, user: &User) -> RepoResult<bool> {
        user.validate()?;

        let changed = self.conn.execute(
            "INSERT INTO users (id, name, role, credential_hash)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO NOTHING;",
            params![user.id, user.name, user.role.as_str(), user.credential_hash],
        )?;

        if changed == 0 {
            debug!(
                "event=user_add module=repo status=skipped reason=duplicate_id user_id={}",
                user.id
            );
        }
        Ok(changed == 1)
    }

    fn find(&self, id: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn get_all(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let role_text: String = row.get("role")?;
    let role = Role::parse(&role_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid user role `{role_text}` in users.role"))
    })?;

    let user = User {
        id: row.get("id")?,
        name: row.get("name")?,
        role,
        credential_hash: row.get("credential_hash")?,
    };
    user.validate()?;
    Ok(user)
}
