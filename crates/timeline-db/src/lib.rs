pub mod comments;
pub mod content;
pub mod filter;
pub mod migrations;
pub mod models;
pub mod posts;
pub mod users;

use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Result, anyhow};
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OpenFlags};
use tracing::{info, warn};

use timeline_policy::TransitionError;

pub const DEFAULT_READERS: usize = 4;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Store-level failures the API layer maps to specific responses. Anything
/// else coming out of this crate is an unexpected storage error.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("row not found")]
    NotFound,

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Connection pool: one writer plus a fixed set of read-only readers
/// (WAL lets them run alongside the writer).
///
/// A connection is acquired for the duration of a `with_conn` /
/// `with_conn_mut` closure and released when it returns. `close` is the
/// single teardown hook.
pub struct Database {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    reader_idx: AtomicUsize,
}

impl Database {
    pub fn open(path: &Path, reader_count: usize) -> Result<Self> {
        let writer = Connection::open(path)?;

        // WAL mode for concurrent reads
        writer.pragma_update(None, "journal_mode", "WAL")?;
        writer.pragma_update(None, "foreign_keys", "ON")?;
        writer.busy_timeout(BUSY_TIMEOUT)?;
        register_functions(&writer)?;

        migrations::run(&writer)?;

        let reader_count = reader_count.max(1);
        let mut readers = Vec::with_capacity(reader_count);
        for _ in 0..reader_count {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            conn.busy_timeout(BUSY_TIMEOUT)?;
            register_functions(&conn)?;
            readers.push(Mutex::new(conn));
        }

        info!(
            "Database opened at {} (1 writer + {} readers)",
            path.display(),
            reader_count
        );
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            reader_idx: AtomicUsize::new(0),
        })
    }

    /// Run `f` on the next reader, round-robin.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let idx = self.reader_idx.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[idx]
            .lock()
            .map_err(|e| anyhow!("Reader lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Run `f` on the writer. Writers are serialized by the lock.
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self
            .writer
            .lock()
            .map_err(|e| anyhow!("Writer lock poisoned: {}", e))?;
        f(&mut conn)
    }

    /// Checkpoint the WAL and close every connection.
    pub fn close(self) -> Result<()> {
        for reader in self.readers {
            let conn = reader
                .into_inner()
                .map_err(|e| anyhow!("Reader lock poisoned: {}", e))?;
            if let Err((_, e)) = conn.close() {
                warn!("Failed to close reader connection: {}", e);
            }
        }

        let writer = self
            .writer
            .into_inner()
            .map_err(|e| anyhow!("Writer lock poisoned: {}", e))?;
        writer.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        writer.close().map_err(|(_, e)| e)?;

        info!("Database closed");
        Ok(())
    }
}

/// `fold(text)`: Unicode lowercase, for case-insensitive matching beyond
/// ASCII. NULL in, NULL out.
fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "fold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text = ctx.get::<Option<String>>(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;
    Ok(())
}

/// Current time in the format every timestamp column uses.
pub(crate) const NOW_SQL: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use tempfile::TempDir;

    use timeline_types::models::Role;

    pub struct TestDb {
        pub db: Database,
        _dir: TempDir,
    }

    pub fn open() -> TestDb {
        let dir = TempDir::new().unwrap();
        let db = Database::open(&dir.path().join("test.db"), 2).unwrap();
        TestDb { db, _dir: dir }
    }

    pub fn user(db: &Database, username: &str, role: Role) -> i64 {
        db.create_user(username, "hash", "Test User", role).unwrap().id
    }
}
