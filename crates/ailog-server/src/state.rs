//! Shared application state for the log server.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::logfile::LogFile;

/// Shared state injected into every Axum handler. The mutex serializes the
/// read-modify-rewrite cycle within this process; there is no cross-process
/// locking (single-writer operation is an operating assumption).
pub struct AppState {
    pub log_file: Mutex<LogFile>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let log_file = LogFile::open(
            config.log_dir.clone(),
            &config.log_file_name,
            config.max_log_size,
        )?;
        Ok(Self {
            log_file: Mutex::new(log_file),
            config,
        })
    }
}

pub type SharedState = Arc<AppState>;
