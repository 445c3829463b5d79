//! ailog-common — Shared types, errors, and helpers used across all ailog crates.

pub mod entry;
pub mod error;
pub mod export;
pub mod page;
pub mod stats;

// Re-export commonly used types
pub use entry::{LogEntry, LogInput, LogOutput, NewLogEntry};
pub use error::{AilogError, Result};
pub use page::Page;
pub use stats::{format_bytes, LogStats};
