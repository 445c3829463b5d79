//! Aggregate statistics over a set of log entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entry::LogEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    pub total: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub by_provider: BTreeMap<String, usize>,
    pub by_feature: BTreeMap<String, usize>,
    /// Real file size for the file-backed server; the local store reports an
    /// approximation by serialized length instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size_formatted: Option<String>,
}

impl LogStats {
    /// Tally counts over a full listing.
    pub fn collect<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> Self {
        let mut stats = LogStats::default();
        for entry in entries {
            stats.total += 1;
            if entry.success {
                stats.success_count += 1;
            } else {
                stats.error_count += 1;
            }
            *stats.by_provider.entry(entry.provider.clone()).or_insert(0) += 1;
            *stats.by_feature.entry(entry.feature.clone()).or_insert(0) += 1;
        }
        stats
    }

    pub fn with_file_size(mut self, bytes: u64) -> Self {
        self.file_size = Some(bytes);
        self.file_size_formatted = Some(format_bytes(bytes));
        self
    }
}

/// Human-readable binary units: raw bytes, one decimal for KB/MB, two for GB.
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;
    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < MIB {
        format!("{:.1} KB", b / KIB)
    } else if b < GIB {
        format!("{:.1} MB", b / MIB)
    } else {
        format!("{:.2} GB", b / GIB)
    }
}
