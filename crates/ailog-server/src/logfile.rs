//! The on-disk log document.
//!
//! Storage is deliberately simple: one pretty-printed JSON file, read and
//! rewritten in full on every mutation. Small-team log volumes never make
//! that a bottleneck, and the whole-file model keeps rotation and export
//! trivial. Callers serialize mutations through the state-level mutex.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use ailog_common::{LogEntry, Result};

pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogDocument {
    pub logs: Vec<LogEntry>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub created: String,
    pub version: u32,
    /// Stamped when the store was last wiped via delete-all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared: Option<String>,
}

impl LogDocument {
    pub fn empty() -> Self {
        Self {
            logs: Vec::new(),
            metadata: Metadata {
                created: Utc::now().to_rfc3339(),
                version: DOCUMENT_VERSION,
                cleared: None,
            },
        }
    }
}

/// Handle on the log file. Operations re-read the file each time so an
/// operator can inspect or truncate it between requests without restarting.
#[derive(Debug)]
pub struct LogFile {
    dir: PathBuf,
    path: PathBuf,
    max_size: u64,
}

impl LogFile {
    /// Open the store, creating the directory and seeding an empty document
    /// if this is the first run.
    pub fn open(dir: impl Into<PathBuf>, file_name: &str, max_size: u64) -> Result<Self> {
        let dir = dir.into();
        let path = dir.join(file_name);
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
        }
        let file = Self { dir, path, max_size };
        if !file.path.exists() {
            file.write(&LogDocument::empty())?;
        }
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Current file size in bytes.
    pub fn size(&self) -> u64 {
        std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    /// Read the full document. An unreadable or corrupt file degrades to an
    /// empty document so listing keeps working; the error is logged for the
    /// operator.
    pub fn read(&self) -> LogDocument {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(doc) => doc,
                Err(e) => {
                    error!(path = %self.path.display(), "log file is corrupt: {e}");
                    LogDocument::empty()
                }
            },
            Err(e) => {
                error!(path = %self.path.display(), "failed to read log file: {e}");
                LogDocument::empty()
            }
        }
    }

    /// Rewrite the full document.
    pub fn write(&self, doc: &LogDocument) -> Result<()> {
        let data = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }

    /// Archive the current file and reseed when it has outgrown the
    /// threshold. Failures are logged and swallowed: a rotation problem must
    /// not block the append that triggered it.
    pub fn rotate_if_needed(&self) {
        match std::fs::metadata(&self.path) {
            Ok(meta) if meta.len() > self.max_size => {
                let stamp = Utc::now().to_rfc3339().replace([':', '.'], "-");
                let stem = self
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("ai-logs");
                let archive = self.dir.join(format!("{stem}-{stamp}.json"));
                if let Err(e) = std::fs::rename(&self.path, &archive) {
                    error!("log rotation failed: {e}");
                    return;
                }
                if let Err(e) = self.write(&LogDocument::empty()) {
                    error!("failed to reseed log file after rotation: {e}");
                    return;
                }
                info!(archive = %archive.display(), "log rotated");
            }
            Ok(_) => {}
            Err(e) => warn!("could not stat log file for rotation: {e}"),
        }
    }
}
