use anyhow::Result;
use rusqlite::{Connection, ErrorCode, params};

use timeline_types::models::Role;

use crate::models::UserRow;
use crate::{Database, DbError, OptionalExt};

impl Database {
    /// Insert a user. A duplicate username fails with `DbError::UsernameTaken`
    /// and leaves the existing row untouched.
    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        full_name: &str,
        role: Role,
    ) -> Result<UserRow> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (username, password, full_name, role) VALUES (?1, ?2, ?3, ?4)",
                params![username, password_hash, full_name, role.as_str()],
            );

            match inserted {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    return Err(DbError::UsernameTaken(username.to_string()).into());
                }
                Err(e) => return Err(e.into()),
            }

            let id = conn.last_insert_rowid();
            query_user(conn, "id = ?1", id)?.ok_or_else(|| DbError::NotFound.into())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username = ?1", username))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id = ?1", id))
    }

    /// Returns the updated row, or `None` if no such user.
    pub fn update_full_name(&self, id: i64, full_name: &str) -> Result<Option<UserRow>> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET full_name = ?1 WHERE id = ?2",
                params![full_name, id],
            )?;
            query_user(conn, "id = ?1", id)
        })
    }

    /// Returns the updated row, or `None` if no such user.
    pub fn update_role(&self, id: i64, role: Role) -> Result<Option<UserRow>> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET role = ?1 WHERE id = ?2",
                params![role.as_str(), id],
            )?;
            query_user(conn, "id = ?1", id)
        })
    }
}

fn query_user(
    conn: &Connection,
    condition: &str,
    value: impl rusqlite::ToSql,
) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {} FROM users WHERE {condition}", UserRow::COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    stmt.query_row([value], UserRow::from_row).optional()
}
