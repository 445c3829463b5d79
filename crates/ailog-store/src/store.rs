//! SQLite-backed log table.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tracing::{error, warn};

use ailog_common::{AilogError, LogEntry, Result};

/// Local log store: one table keyed by entry id, with secondary indexes on
/// the fields the listing and stats paths scan by. The full entry is kept as
/// a JSON document so the table never needs a migration when the entry
/// gains optional fields.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Open or create the store at the given path. Safe to call repeatedly
    /// (schema setup uses IF NOT EXISTS).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let store = Self { path };
        let conn = store.connect()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS logs (
                id        TEXT PRIMARY KEY,
                timestamp TEXT NOT NULL,
                provider  TEXT NOT NULL,
                feature   TEXT NOT NULL,
                success   INTEGER NOT NULL,
                entry     TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_logs_timestamp ON logs(timestamp);
            CREATE INDEX IF NOT EXISTS idx_logs_provider  ON logs(provider);
            CREATE INDEX IF NOT EXISTS idx_logs_feature   ON logs(feature);
            CREATE INDEX IF NOT EXISTS idx_logs_success   ON logs(success);
            "#,
        )
        .map_err(|e| AilogError::Store(e.to_string()))?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn =
            Connection::open(&self.path).map_err(|e| AilogError::Store(e.to_string()))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| AilogError::Store(e.to_string()))?;
        conn.pragma_update(None, "busy_timeout", 5000)
            .map_err(|e| AilogError::Store(e.to_string()))?;
        Ok(conn)
    }

    /// Insert one entry. Returns false (and logs) on any failure, including
    /// a duplicate id: an existing entry is never overwritten.
    pub fn insert(&self, entry: &LogEntry) -> bool {
        match self.try_insert(entry) {
            Ok(()) => true,
            Err(e) => {
                warn!(id = %entry.id, "failed to insert log entry: {e}");
                false
            }
        }
    }

    fn try_insert(&self, entry: &LogEntry) -> Result<()> {
        let conn = self.connect()?;
        let json = serde_json::to_string(entry)?;
        conn.execute(
            "INSERT INTO logs (id, timestamp, provider, feature, success, entry)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.id,
                entry.timestamp,
                entry.provider,
                entry.feature,
                entry.success as i64,
                json
            ],
        )
        .map_err(|e| AilogError::Store(e.to_string()))?;
        Ok(())
    }

    /// Full reverse-chronological scan, newest first. Ties fall back to
    /// insertion order (rowid). Failures degrade to an empty listing.
    pub fn list_all(&self) -> Vec<LogEntry> {
        match self.try_list_all() {
            Ok(entries) => entries,
            Err(e) => {
                error!("failed to list log entries: {e}");
                Vec::new()
            }
        }
    }

    fn try_list_all(&self) -> Result<Vec<LogEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT entry FROM logs ORDER BY timestamp DESC, rowid DESC")
            .map_err(|e| AilogError::Store(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| AilogError::Store(e.to_string()))?;
        let mut entries = Vec::new();
        for row in rows {
            let json = row.map_err(|e| AilogError::Store(e.to_string()))?;
            match serde_json::from_str::<LogEntry>(&json) {
                Ok(entry) => entries.push(entry),
                // A bad row should not hide the rest of the listing.
                Err(e) => warn!("skipping undecodable log row: {e}"),
            }
        }
        Ok(entries)
    }

    /// Delete by id. Returns true iff a row was removed.
    pub fn delete(&self, id: &str) -> bool {
        let deleted = self
            .connect()
            .and_then(|conn| {
                conn.execute("DELETE FROM logs WHERE id = ?1", params![id])
                    .map_err(|e| AilogError::Store(e.to_string()))
            })
            .unwrap_or_else(|e| {
                error!(id, "failed to delete log entry: {e}");
                0
            });
        deleted > 0
    }

    /// Remove every entry. Returns false (and logs) on failure.
    pub fn clear(&self) -> bool {
        match self.connect().and_then(|conn| {
            conn.execute("DELETE FROM logs", [])
                .map_err(|e| AilogError::Store(e.to_string()))
        }) {
            Ok(_) => true,
            Err(e) => {
                error!("failed to clear log store: {e}");
                false
            }
        }
    }

    pub fn count(&self) -> usize {
        self.connect()
            .and_then(|conn| {
                conn.query_row("SELECT COUNT(*) FROM logs", [], |row| {
                    row.get::<_, i64>(0)
                })
                .map_err(|e| AilogError::Store(e.to_string()))
            })
            .map(|n| n as usize)
            .unwrap_or_else(|e| {
                error!("failed to count log entries: {e}");
                0
            })
    }
}
