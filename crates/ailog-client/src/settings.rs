//! Client settings: storage mode and log server address.
//!
//! The settings object is explicit and injected into the façade; persistence
//! goes through the [`SettingsStore`] trait so tests can run against an
//! in-memory store instead of a file.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use ailog_common::{AilogError, Result};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3001";

/// Which backend(s) log writes go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Local embedded store only; no network dependency.
    #[default]
    Browser,
    /// Shared log server only.
    Server,
    /// Dual-write to both, independently and best effort.
    Both,
}

impl StorageMode {
    pub fn includes_server(self) -> bool {
        matches!(self, StorageMode::Server | StorageMode::Both)
    }

    pub fn includes_local(self) -> bool {
        matches!(self, StorageMode::Browser | StorageMode::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub mode: StorageMode,
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: StorageMode::default(),
            server_url: default_server_url(),
        }
    }
}

/// Persistence adapter for [`Settings`]. `load` falls back to defaults when
/// nothing has been saved yet.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Settings in a TOML file, the usual choice for an installed client.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        toml::from_str(&data).map_err(|e| AilogError::Config(e.to_string()))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let data =
            toml::to_string_pretty(settings).map_err(|e| AilogError::Config(e.to_string()))?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}

/// In-memory settings, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: Mutex<Option<Settings>>,
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings> {
        Ok(self
            .inner
            .lock()
            .expect("settings lock poisoned")
            .clone()
            .unwrap_or_default())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.inner.lock().expect("settings lock poisoned") = Some(settings.clone());
        Ok(())
    }
}
