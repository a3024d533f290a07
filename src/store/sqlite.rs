//! SQLite Store Transport
//!
//! Durable backend for the key-value table, built on rusqlite.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use crate::error::StoreError;
use crate::store::{Connector, StoreConnection};

/// Bootstrap DDL for the single key-value table.
const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS kv_store (
    key INTEGER PRIMARY KEY,
    value TEXT NOT NULL
)";

const UPSERT_SQL: &str = "INSERT INTO kv_store (key, value) VALUES (?1, ?2) \
     ON CONFLICT (key) DO UPDATE SET value = excluded.value";

const SELECT_SQL: &str = "SELECT value FROM kv_store WHERE key = ?1";

const DELETE_SQL: &str = "DELETE FROM kv_store WHERE key = ?1";

// == SQLite Connector ==
/// Opens connections to an SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteConnector {
    /// Creates a connector for the database at `path`.
    ///
    /// `busy_timeout` bounds how long a statement waits on another worker's
    /// write lock before failing.
    pub fn new(path: impl Into<PathBuf>, busy_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            busy_timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Connector for SqliteConnector {
    type Conn = SqliteConnection;

    fn connect(&self) -> Result<SqliteConnection, StoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags)
            .map_err(|err| StoreError::Connect(err.to_string()))?;

        apply_pragmas(&conn, self.busy_timeout)
            .map_err(|err| StoreError::Connect(err.to_string()))?;
        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|err| StoreError::Connect(err.to_string()))?;

        Ok(SqliteConnection { conn })
    }

    fn target(&self) -> String {
        self.path.display().to_string()
    }
}

/// WAL lets readers proceed alongside the single writer; FULL sync makes
/// every committed write durable before the call returns.
fn apply_pragmas(conn: &Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;
    let _mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "synchronous", "FULL")?;
    Ok(())
}

// == SQLite Connection ==
/// One open SQLite connection.
#[derive(Debug)]
pub struct SqliteConnection {
    conn: Connection,
}

impl StoreConnection for SqliteConnection {
    fn ping(&mut self) -> Result<(), StoreError> {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    fn upsert(&mut self, key: i64, value: &str) -> Result<(), StoreError> {
        let mut stmt = self.conn.prepare_cached(UPSERT_SQL)?;
        stmt.execute(params![key, value])?;
        Ok(())
    }

    fn read(&mut self, key: i64) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare_cached(SELECT_SQL)?;
        let value = stmt
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(value)
    }

    fn delete(&mut self, key: i64) -> Result<bool, StoreError> {
        let mut stmt = self.conn.prepare_cached(DELETE_SQL)?;
        let removed = stmt.execute(params![key])?;
        Ok(removed > 0)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn connector(dir: &TempDir) -> SqliteConnector {
        SqliteConnector::new(dir.path().join("kv.sqlite3"), Duration::from_secs(5))
    }

    #[test]
    fn test_connect_creates_table() {
        let dir = TempDir::new().unwrap();
        let mut conn = connector(&dir).connect().unwrap();

        conn.ping().unwrap();
        assert_eq!(conn.read(1).unwrap(), None);
    }

    #[test]
    fn test_upsert_inserts_then_overwrites() {
        let dir = TempDir::new().unwrap();
        let mut conn = connector(&dir).connect().unwrap();

        conn.upsert(1, "one").unwrap();
        assert_eq!(conn.read(1).unwrap(), Some("one".to_string()));

        conn.upsert(1, "uno").unwrap();
        assert_eq!(conn.read(1).unwrap(), Some("uno".to_string()));
    }

    #[test]
    fn test_delete_reports_existence() {
        let dir = TempDir::new().unwrap();
        let mut conn = connector(&dir).connect().unwrap();

        conn.upsert(-5, "negative").unwrap();

        assert!(conn.delete(-5).unwrap());
        assert!(!conn.delete(-5).unwrap());
        assert_eq!(conn.read(-5).unwrap(), None);
    }

    #[test]
    fn test_extreme_keys() {
        let dir = TempDir::new().unwrap();
        let mut conn = connector(&dir).connect().unwrap();

        conn.upsert(i64::MAX, "max").unwrap();
        conn.upsert(i64::MIN, "min").unwrap();

        assert_eq!(conn.read(i64::MAX).unwrap(), Some("max".to_string()));
        assert_eq!(conn.read(i64::MIN).unwrap(), Some("min".to_string()));
    }

    #[test]
    fn test_writes_visible_to_other_connections() {
        let dir = TempDir::new().unwrap();
        let connector = connector(&dir);
        let mut writer = connector.connect().unwrap();
        let mut reader = connector.connect().unwrap();

        writer.upsert(9, "shared").unwrap();

        assert_eq!(reader.read(9).unwrap(), Some("shared".to_string()));
    }

    #[test]
    fn test_connect_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let connector = SqliteConnector::new(
            dir.path().join("missing").join("kv.sqlite3"),
            Duration::from_secs(1),
        );

        assert!(matches!(connector.connect(), Err(StoreError::Connect(_))));
    }
}
