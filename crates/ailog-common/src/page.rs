//! Pagination over reverse-chronological log listings.

use serde::{Deserialize, Serialize};

use crate::entry::LogEntry;

/// One page of a listing. `total` counts the post-filter set, not the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub logs: Vec<LogEntry>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
}

impl Page {
    /// Slice an already-sorted listing into a 1-based page. Page numbers
    /// come straight from query strings, so the index arithmetic saturates
    /// instead of trusting the caller to stay in range.
    pub fn slice(all: &[LogEntry], page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        let total = all.len();
        let start = page.saturating_sub(1).saturating_mul(page_size);
        let logs = all
            .iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();
        Page {
            logs,
            total,
            page,
            page_size,
            has_more: start.saturating_add(page_size) < total,
        }
    }

    pub fn empty(page: usize, page_size: usize) -> Self {
        Page {
            logs: Vec::new(),
            total: 0,
            page,
            page_size,
            has_more: false,
        }
    }
}
