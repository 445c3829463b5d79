//! ailog-store — Embedded local log storage.
//!
//! A network-free SQLite table for AI log entries, used by clients that log
//! locally instead of (or alongside) the shared log server. Log persistence
//! must never break the feature that produced the log, so every operation
//! here catches its own failures and degrades to an empty/false result.

pub mod store;

pub use store::LocalStore;
