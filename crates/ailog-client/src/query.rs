//! Client-side refinement of a fetched page.
//!
//! These filters narrow whatever page the façade returned; they are not a
//! global search across all pages.

use ailog_common::LogEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutcomeFilter {
    #[default]
    All,
    Success,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Exact provider match; None means all.
    pub provider: Option<String>,
    pub outcome: OutcomeFilter,
    /// Case-insensitive substring over feature, model, prompt and response.
    pub search: Option<String>,
}

impl LogFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(provider) = &self.provider {
            if &entry.provider != provider {
                return false;
            }
        }
        match self.outcome {
            OutcomeFilter::Success if !entry.success => return false,
            OutcomeFilter::Error if entry.success => return false,
            _ => {}
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = entry.feature.to_lowercase().contains(&needle)
                || entry.model.to_lowercase().contains(&needle)
                || entry.input.prompt.to_lowercase().contains(&needle)
                || entry
                    .output
                    .response
                    .as_deref()
                    .is_some_and(|r| r.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, entries: &[LogEntry]) -> Vec<LogEntry> {
        entries
            .iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect()
    }
}
