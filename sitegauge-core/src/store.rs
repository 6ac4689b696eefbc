use crate::model::AnalysisResult;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub url: String,
    pub result: AnalysisResult,
    pub analyzed_at: DateTime<Utc>,
}

/// Single-key overwrite store for analysis results. No guarantees beyond
/// last-write-wins on a URL.
pub trait ResultStore: Send + Sync {
    fn get(&self, url: &str) -> Result<Option<CacheEntry>, StoreError>;
    fn put(&self, url: &str, result: &AnalysisResult, requester: &str) -> Result<(), StoreError>;
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn drop(path: &Path) {
        let _ = fs::remove_file(path);
    }

    pub fn new(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS analyses (
                url TEXT PRIMARY KEY,
                requested_by TEXT,
                analyzed_at INTEGER NOT NULL,
                result TEXT NOT NULL
            );
            ",
        )?;

        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }
}

impl ResultStore for SqliteStore {
    fn get(&self, url: &str) -> Result<Option<CacheEntry>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT analyzed_at, result FROM analyses WHERE url = ?1")?;

        let row = stmt
            .query_row(params![url], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })
            .optional()?;

        let Some((timestamp, json)) = row else {
            return Ok(None);
        };

        let result: AnalysisResult = serde_json::from_str(&json)?;
        let analyzed_at =
            DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now);

        Ok(Some(CacheEntry {
            url: url.to_string(),
            result,
            analyzed_at,
        }))
    }

    fn put(&self, url: &str, result: &AnalysisResult, requester: &str) -> Result<(), StoreError> {
        let json = serde_json::to_string(result)?;
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO analyses (url, requested_by, analyzed_at, result)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(url) DO UPDATE SET
                requested_by = excluded.requested_by,
                analyzed_at = excluded.analyzed_at,
                result = excluded.result",
            params![url, requester, result.analyzed_at.timestamp(), json],
        )?;

        Ok(())
    }
}

/// In-memory store used by tests and one-shot runs with no database.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for MemoryStore {
    fn get(&self, url: &str) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self.entries.lock().unwrap().get(url).cloned())
    }

    fn put(&self, url: &str, result: &AnalysisResult, _requester: &str) -> Result<(), StoreError> {
        self.entries.lock().unwrap().insert(
            url.to_string(),
            CacheEntry {
                url: url.to_string(),
                result: result.clone(),
                analyzed_at: result.analyzed_at,
            },
        );
        Ok(())
    }
}
