//! The two log store backends behind one trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;

use ailog_common::{AilogError, LogEntry, LogStats, Page, Result};
use ailog_store::LocalStore;

const REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

/// One log store. The façade iterates every active backend for writes and
/// picks one by priority for reads.
#[async_trait]
pub trait LogBackend: Send + Sync {
    fn name(&self) -> &'static str;
    async fn append(&self, entry: &LogEntry) -> Result<()>;
    async fn list_page(&self, page: usize, page_size: usize) -> Result<Page>;
    async fn delete_one(&self, id: &str) -> Result<()>;
    async fn delete_all(&self) -> Result<()>;
    /// Keep the newest `keep_count` entries; returns how many were removed.
    async fn trim(&self, keep_count: usize) -> Result<usize>;
    async fn stats(&self) -> Result<LogStats>;
}

// ========================================
// Remote backend (ailog-server)
// ========================================

/// Client for the shared file-backed log server.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REMOTE_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Raw JSON export document from the server.
    pub async fn export_json(&self) -> Result<String> {
        let text = self
            .client
            .get(self.url("/api/logs/export/json"))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }

    /// BOM-prefixed CSV export document from the server.
    pub async fn export_csv(&self) -> Result<String> {
        let text = self
            .client
            .get(self.url("/api/logs/export/csv"))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}

#[async_trait]
impl LogBackend for RemoteBackend {
    fn name(&self) -> &'static str {
        "server"
    }

    async fn append(&self, entry: &LogEntry) -> Result<()> {
        self.client
            .post(self.url("/api/logs"))
            .json(entry)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn list_page(&self, page: usize, page_size: usize) -> Result<Page> {
        let page = self
            .client
            .get(self.url("/api/logs"))
            .query(&[
                ("page", page.to_string()),
                ("pageSize", page_size.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<Page>()
            .await?;
        Ok(page)
    }

    async fn delete_one(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/logs/{id}")))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AilogError::NotFound(id.to_string()));
        }
        response.error_for_status()?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        self.client
            .delete(self.url("/api/logs"))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn trim(&self, keep_count: usize) -> Result<usize> {
        let body: serde_json::Value = self
            .client
            .post(self.url("/api/logs/cleanup"))
            .json(&json!({ "keepCount": keep_count }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body["deleted"].as_u64().unwrap_or(0) as usize)
    }

    async fn stats(&self) -> Result<LogStats> {
        let stats = self
            .client
            .get(self.url("/api/logs/stats"))
            .send()
            .await?
            .error_for_status()?
            .json::<LogStats>()
            .await?;
        Ok(stats)
    }
}

// ========================================
// Local backend (ailog-store)
// ========================================

/// Embedded store wrapper. The store itself already swallows and logs its
/// failures; this wrapper surfaces them as errors so the façade can decide
/// (skip silently for writes, report for management actions).
#[derive(Debug, Clone)]
pub struct LocalBackend {
    store: LocalStore,
}

impl LocalBackend {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Full reverse-chronological listing, used by the export fallback.
    pub fn list_all(&self) -> Vec<LogEntry> {
        self.store.list_all()
    }
}

#[async_trait]
impl LogBackend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn append(&self, entry: &LogEntry) -> Result<()> {
        if self.store.insert(entry) {
            Ok(())
        } else {
            Err(AilogError::Store(
                "log entry was not stored (duplicate id or store failure)".into(),
            ))
        }
    }

    async fn list_page(&self, page: usize, page_size: usize) -> Result<Page> {
        Ok(Page::slice(&self.store.list_all(), page, page_size))
    }

    async fn delete_one(&self, id: &str) -> Result<()> {
        if self.store.delete(id) {
            Ok(())
        } else {
            Err(AilogError::NotFound(id.to_string()))
        }
    }

    async fn delete_all(&self) -> Result<()> {
        if self.store.clear() {
            Ok(())
        } else {
            Err(AilogError::Store("failed to clear local log store".into()))
        }
    }

    async fn trim(&self, keep_count: usize) -> Result<usize> {
        let all = self.store.list_all();
        let mut deleted = 0;
        for entry in all.iter().skip(keep_count) {
            if self.store.delete(&entry.id) {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn stats(&self) -> Result<LogStats> {
        let all = self.store.list_all();
        // No real file to stat; approximate usage by serialized length.
        let approx_size: u64 = all
            .iter()
            .map(|e| serde_json::to_string(e).map(|s| s.len() as u64).unwrap_or(0))
            .sum();
        Ok(LogStats::collect(&all).with_file_size(approx_size))
    }
}
