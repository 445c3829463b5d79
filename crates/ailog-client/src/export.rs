//! Download-ready serialization of the log store.
//!
//! Prefers the server's export endpoints when the mode includes it (so the
//! document reflects the shared store), falling back to rendering the local
//! store with the same column layout and escaping.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::warn;

use ailog_common::{export::csv_export, Result};

use crate::facade::LogFacade;
use crate::settings::StorageMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl LogFacade {
    /// Render the full log listing in the given format.
    pub async fn export_logs(&self, format: ExportFormat) -> Result<String> {
        if let Some(remote) = self.remote() {
            let result = match format {
                ExportFormat::Json => remote.export_json().await,
                ExportFormat::Csv => remote.export_csv().await,
            };
            match result {
                Ok(document) => return Ok(document),
                Err(e) if self.settings().mode == StorageMode::Server => return Err(e),
                Err(e) => warn!("server export failed, using local store: {e}"),
            }
        }
        let all = self.local().map(|l| l.list_all()).unwrap_or_default();
        Ok(match format {
            ExportFormat::Json => serde_json::to_string_pretty(&all)?,
            ExportFormat::Csv => csv_export(&all),
        })
    }

    /// Export into `dir` as `ai-logs-<date>.<ext>` and return the path.
    pub async fn download_logs(
        &self,
        format: ExportFormat,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let content = self.export_logs(format).await?;
        let dir = dir.as_ref();
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
        let filename = format!(
            "ai-logs-{}.{}",
            Utc::now().format("%Y-%m-%d"),
            format.extension()
        );
        let path = dir.join(filename);
        std::fs::write(&path, content)?;
        Ok(path)
    }
}
