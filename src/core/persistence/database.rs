use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use rusqlite::{Connection, Transaction};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::migrations;

/// Shared handle to the SQLite database.
///
/// A single connection is serialised behind an async mutex. Work runs inside
/// closures so no statement or transaction is ever held across an `.await`.
#[derive(Clone)]
pub struct Database {
    path: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.as_os_str() == ":memory:" {
            return Self::open_in_memory();
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        Self::prepare(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::prepare(&conn)?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn prepare(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::initialize_schema(conn)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` with exclusive access to the connection.
    pub async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send,
        T: Send,
    {
        let conn = self.conn.lock().await;
        f(&conn)
    }

    /// Run `f` inside a transaction; commits when `f` returns `Ok`.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T> + Send,
        T: Send,
    {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    /// Row count for a table from the fixed schema list.
    pub async fn count_rows(&self, table: &'static str) -> Result<i64> {
        self.with_conn(move |conn| {
            let n = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;
            Ok(n)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_database_has_foreign_keys_enabled() {
        let db = Database::open_in_memory().unwrap();
        let fk: i64 = db
            .with_conn(|conn| Ok(conn.query_row("PRAGMA foreign_keys", [], |r| r.get(0))?))
            .await
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[tokio::test]
    async fn failed_transaction_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        let result: Result<()> = db
            .transaction(|tx| {
                tx.execute(
                    "INSERT INTO metadata (key, value) VALUES ('rolled_back', '1')",
                    [],
                )?;
                Err(anyhow::anyhow!("abort"))
            })
            .await;
        assert!(result.is_err());

        let count = db.count_rows("metadata").await.unwrap();
        // only schema_version remains
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("estate.db");
        let db = Database::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(db.path(), path.as_path());
    }
}
