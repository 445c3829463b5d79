//! ailog-client — Mode-switchable client for the AI log stores.
//!
//! Presents one API over two interchangeable backends: the shared file-backed
//! log server (ailog-server) and a local embedded store (ailog-store).
//! Depending on the configured [`settings::StorageMode`], writes go to one or
//! both backends (best effort, independently), while reads prefer the server
//! and fall back to the local store.

pub mod backend;
pub mod export;
pub mod facade;
pub mod query;
pub mod settings;

pub use backend::{LocalBackend, LogBackend, RemoteBackend};
pub use export::ExportFormat;
pub use facade::{ConnectionStatus, LogFacade, StorageUsage};
pub use query::{LogFilter, OutcomeFilter};
pub use settings::{Settings, SettingsStore, StorageMode};
