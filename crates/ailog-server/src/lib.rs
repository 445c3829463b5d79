//! ailog-server — File-backed AI log service
//! Provides the shared log store for a team running the dashboard locally:
//!   - Paged, filtered log listing
//!   - Append with size-based file rotation
//!   - Delete one / delete all / retention cleanup
//!   - Aggregate stats and JSON/CSV export
//!   - Health check

pub mod config;
pub mod error;
pub mod handlers;
pub mod logfile;
pub mod router;
pub mod state;
