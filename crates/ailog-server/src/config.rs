//! Server configuration from environment variables.

use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_LOG_FILE_NAME: &str = "ai-logs.json";
const DEFAULT_MAX_LOG_SIZE: u64 = 100 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub log_dir: PathBuf,
    pub log_file_name: String,
    /// Rotation threshold in bytes. The file is archived and reseeded once
    /// it grows past this.
    pub max_log_size: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_file_name: DEFAULT_LOG_FILE_NAME.to_string(),
            max_log_size: DEFAULT_MAX_LOG_SIZE,
        }
    }
}

impl ServerConfig {
    /// Read `LOG_SERVER_PORT`, `LOG_DIR`, `LOG_FILE_NAME` and `MAX_LOG_SIZE`,
    /// falling back to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_parsed("LOG_SERVER_PORT").unwrap_or(defaults.port),
            log_dir: std::env::var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_file_name: std::env::var("LOG_FILE_NAME").unwrap_or(defaults.log_file_name),
            max_log_size: env_parsed("MAX_LOG_SIZE").unwrap_or(defaults.max_log_size),
        }
    }

    pub fn log_file_path(&self) -> PathBuf {
        self.log_dir.join(&self.log_file_name)
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
