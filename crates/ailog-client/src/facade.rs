//! The mode-aware store façade.
//!
//! Writes are best effort: every active backend is attempted independently
//! and a failure in one neither blocks nor rolls back the other. The two
//! stores may therefore drift after a partial failure; nothing reconciles
//! them. Reads prefer the server's view and fall back to the local store
//! when the server page comes back empty (or unreachable) outside pure
//! server mode. The visible view can therefore switch backends mid-session
//! as data volumes change; no merging is done.

use std::path::Path;
use std::time::Duration;

use tracing::warn;

use ailog_common::{format_bytes, AilogError, LogEntry, LogStats, Page, Result};
use ailog_store::LocalStore;

use crate::backend::{LocalBackend, LogBackend, RemoteBackend};
use crate::settings::{Settings, SettingsStore, StorageMode};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct StorageUsage {
    pub used: u64,
    pub formatted: String,
    pub mode: StorageMode,
    pub server_connected: bool,
}

pub struct LogFacade {
    settings: Settings,
    remote: Option<RemoteBackend>,
    local: Option<LocalBackend>,
}

impl LogFacade {
    /// Build the façade for the given settings. The local store is only
    /// opened when the mode actually uses it.
    pub fn new(settings: Settings, local_db_path: impl AsRef<Path>) -> Result<Self> {
        let remote = if settings.mode.includes_server() {
            Some(RemoteBackend::new(&settings.server_url)?)
        } else {
            None
        };
        let local = if settings.mode.includes_local() {
            Some(LocalBackend::new(LocalStore::open(local_db_path)?))
        } else {
            None
        };
        Ok(Self {
            settings,
            remote,
            local,
        })
    }

    /// Build from persisted settings, with defaults when nothing was saved.
    pub fn from_settings_store(
        store: &dyn SettingsStore,
        local_db_path: impl AsRef<Path>,
    ) -> Result<Self> {
        Self::new(store.load()?, local_db_path)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn remote(&self) -> Option<&RemoteBackend> {
        self.remote.as_ref()
    }

    pub(crate) fn local(&self) -> Option<&LocalBackend> {
        self.local.as_ref()
    }

    fn active_backends(&self) -> Vec<&dyn LogBackend> {
        let mut backends: Vec<&dyn LogBackend> = Vec::new();
        if let Some(remote) = &self.remote {
            backends.push(remote);
        }
        if let Some(local) = &self.local {
            backends.push(local);
        }
        backends
    }

    /// Write one entry to every active backend. Fire and forget: failures
    /// are logged, never surfaced, so log persistence cannot break the
    /// feature that produced the entry.
    pub async fn save_log(&self, entry: &LogEntry) {
        for backend in self.active_backends() {
            if let Err(e) = backend.append(entry).await {
                warn!(backend = backend.name(), id = %entry.id, "log write failed: {e}");
            }
        }
    }

    /// Paged read with the server-first fallback described at module level.
    pub async fn get_logs_paginated(&self, page: usize, page_size: usize) -> Page {
        if let Some(remote) = &self.remote {
            match remote.list_page(page, page_size).await {
                Ok(result)
                    if !result.logs.is_empty()
                        || self.settings.mode == StorageMode::Server =>
                {
                    return result;
                }
                Ok(_) => {} // empty server page, show local data instead
                Err(e) => {
                    warn!("server log listing failed: {e}");
                    if self.settings.mode == StorageMode::Server {
                        return Page::empty(page, page_size);
                    }
                }
            }
        }
        match &self.local {
            Some(local) => local
                .list_page(page, page_size)
                .await
                .unwrap_or_else(|_| Page::empty(page, page_size)),
            None => Page::empty(page, page_size),
        }
    }

    /// Delete one entry from every active backend. Succeeds when at least
    /// one backend removed it; after a dual-write partial failure the entry
    /// may legitimately exist on only one side.
    pub async fn delete_log(&self, id: &str) -> Result<()> {
        let mut any_ok = false;
        let mut last_err = None;
        for backend in self.active_backends() {
            match backend.delete_one(id).await {
                Ok(()) => any_ok = true,
                Err(e) => {
                    warn!(backend = backend.name(), id, "log delete failed: {e}");
                    last_err = Some(e);
                }
            }
        }
        finish(any_ok, last_err)
    }

    /// Wipe every active backend.
    pub async fn clear_logs(&self) -> Result<()> {
        let mut any_ok = false;
        let mut last_err = None;
        for backend in self.active_backends() {
            match backend.delete_all().await {
                Ok(()) => any_ok = true,
                Err(e) => {
                    warn!(backend = backend.name(), "log clear failed: {e}");
                    last_err = Some(e);
                }
            }
        }
        finish(any_ok, last_err)
    }

    /// Retention trim: keep the newest `keep_count` entries on every active
    /// backend. Reports the largest per-backend deletion count, which is
    /// what the confirmation UI shows.
    pub async fn delete_old_logs(&self, keep_count: usize) -> Result<usize> {
        let mut any_ok = false;
        let mut last_err = None;
        let mut deleted = 0usize;
        for backend in self.active_backends() {
            match backend.trim(keep_count).await {
                Ok(n) => {
                    any_ok = true;
                    deleted = deleted.max(n);
                }
                Err(e) => {
                    warn!(backend = backend.name(), "log cleanup failed: {e}");
                    last_err = Some(e);
                }
            }
        }
        finish(any_ok, last_err).map(|()| deleted)
    }

    /// Aggregate stats, preferring the server's view when the mode includes
    /// it.
    pub async fn get_log_stats(&self) -> Result<LogStats> {
        if let Some(remote) = &self.remote {
            match remote.stats().await {
                Ok(stats) => return Ok(stats),
                Err(e) if self.settings.mode == StorageMode::Server => return Err(e),
                Err(e) => warn!("server stats failed, using local store: {e}"),
            }
        }
        match &self.local {
            Some(local) => local.stats().await,
            None => Ok(LogStats::default()),
        }
    }

    pub async fn get_storage_usage(&self) -> StorageUsage {
        let stats = self.get_log_stats().await.unwrap_or_default();
        let used = stats.file_size.unwrap_or(0);
        let formatted = stats
            .file_size_formatted
            .unwrap_or_else(|| format_bytes(used));
        let server_connected = if self.settings.mode.includes_server() {
            self.test_server_connection().await.connected
        } else {
            false
        };
        StorageUsage {
            used,
            formatted,
            mode: self.settings.mode,
            server_connected,
        }
    }

    pub async fn test_server_connection(&self) -> ConnectionStatus {
        test_server_connection(&self.settings.server_url).await
    }
}

fn finish(any_ok: bool, last_err: Option<AilogError>) -> Result<()> {
    if any_ok {
        Ok(())
    } else {
        Err(last_err.unwrap_or_else(|| AilogError::Store("no active log backend".into())))
    }
}

/// Liveness probe against a log server, with a short timeout so settings
/// validation never hangs.
pub async fn test_server_connection(url: &str) -> ConnectionStatus {
    let url = url.trim_end_matches('/');
    let request = reqwest::Client::new()
        .get(format!("{url}/api/health"))
        .timeout(PROBE_TIMEOUT);
    match request.send().await {
        Ok(response) if response.status().is_success() => {
            let log_file = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v["logFile"].as_str().map(String::from))
                .unwrap_or_default();
            ConnectionStatus {
                connected: true,
                message: format!("Server connection OK: {log_file}"),
            }
        }
        Ok(response) => ConnectionStatus {
            connected: false,
            message: format!("Server error: {}", response.status().as_u16()),
        },
        Err(e) => ConnectionStatus {
            connected: false,
            message: format!("Connection failed: {e}"),
        },
    }
}
