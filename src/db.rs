//! SQLite access shared by the user and article stores.
//!
//! Every call opens its own connection on the blocking pool, so no lock or
//! connection is shared between requests and nothing blocks the async
//! workers.

use anyhow::{Context, Result};
use rusqlite::{Connection, ErrorCode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// A uniqueness or foreign-key constraint rejected the write.
#[derive(Debug, thiserror::Error)]
#[error("constraint violation: {0}")]
pub struct ConstraintViolation(pub String);

/// Handle to the on-disk database
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Open (creating if needed) the database file and ensure the schema exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Self {
            path: path.as_ref().to_path_buf(),
        };
        let conn = Self::connect(&db.path)?;
        Self::init_schema(&conn)?;
        info!("Database ready at {}", db.path.display());
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(path: &Path) -> Result<Connection> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL CHECK (role IN ('ADMIN', 'EDITOR', 'READER')),
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS articles (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                author_id TEXT NOT NULL,
                FOREIGN KEY (author_id) REFERENCES users(id)
            );
            CREATE INDEX IF NOT EXISTS idx_articles_author ON articles(author_id);",
        )
        .context("Failed to create schema")?;
        Ok(())
    }

    /// Run `f` against a fresh connection on the blocking pool
    pub async fn call<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Self::connect(&path)?;
            f(&conn)
        })
        .await
        .context("Database task failed")?
    }
}

/// Convert constraint failures into [`ConstraintViolation`] so callers can
/// tell them apart from I/O failures.
pub fn classify(err: rusqlite::Error) -> anyhow::Error {
    match &err {
        rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::ConstraintViolation => {
            ConstraintViolation(msg.clone().unwrap_or_else(|| e.to_string())).into()
        }
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_open_creates_schema() {
        let temp = NamedTempFile::new().unwrap();
        let db = Database::open(temp.path()).unwrap();

        let tables: Vec<String> = db
            .call(|conn| {
                let mut stmt = conn
                    .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .unwrap();

        assert_eq!(tables, vec!["articles".to_string(), "users".to_string()]);
    }

    #[tokio::test]
    async fn test_reopen_is_idempotent() {
        let temp = NamedTempFile::new().unwrap();
        Database::open(temp.path()).unwrap();
        assert!(Database::open(temp.path()).is_ok());
    }

    #[tokio::test]
    async fn test_constraint_violation_classified() {
        let temp = NamedTempFile::new().unwrap();
        let db = Database::open(temp.path()).unwrap();

        let err = db
            .call(|conn| {
                conn.execute(
                    "INSERT INTO articles (id, title, content, created_at, author_id)
                     VALUES ('a', 't', 'c', 'now', 'missing-user')",
                    [],
                )
                .map_err(classify)?;
                Ok(())
            })
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<ConstraintViolation>().is_some());
    }
}
