//! The log entry record: one AI call, immutable once written.

use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One logged AI interaction. Written once at call completion, never mutated;
/// deletion is the only mutation-like operation the stores support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    /// RFC 3339 creation time; primary sort key for all listings.
    pub timestamp: String,
    /// AI backend that served the call. Open string, not an enum: new
    /// providers must not require a schema change.
    pub provider: String,
    pub model: String,
    /// Application feature that triggered the call (e.g. "meeting-summary").
    pub feature: String,
    pub input: LogInput,
    pub output: LogOutput,
    /// Elapsed call time in milliseconds.
    pub duration: u64,
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogInput {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

/// Exactly one of `response` (success) or `error` (failure) is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A log entry under construction: identity and input are fixed at call
/// start, outcome and timing are filled in when the call resolves.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub id: String,
    pub timestamp: String,
    pub provider: String,
    pub model: String,
    pub feature: String,
    pub input: LogInput,
}

impl LogEntry {
    /// Start a new entry with a fresh id and timestamp. The caller completes
    /// it with [`NewLogEntry::finish_ok`] or [`NewLogEntry::finish_err`]
    /// once the AI call resolves.
    pub fn begin(
        provider: impl Into<String>,
        model: impl Into<String>,
        feature: impl Into<String>,
        prompt: impl Into<String>,
        parameters: Option<Map<String, Value>>,
    ) -> NewLogEntry {
        NewLogEntry {
            id: new_log_id(),
            timestamp: Utc::now().to_rfc3339(),
            provider: provider.into(),
            model: model.into(),
            feature: feature.into(),
            input: LogInput {
                prompt: prompt.into(),
                parameters,
            },
        }
    }

    /// Parsed timestamp, or None for entries written by foreign clients with
    /// a malformed timestamp.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

impl NewLogEntry {
    pub fn finish_ok(
        self,
        response: impl Into<String>,
        parsed: Option<Value>,
        duration: u64,
    ) -> LogEntry {
        self.finish(
            LogOutput {
                response: Some(response.into()),
                parsed,
                error: None,
            },
            duration,
            true,
        )
    }

    pub fn finish_err(self, error: impl Into<String>, duration: u64) -> LogEntry {
        self.finish(
            LogOutput {
                response: None,
                parsed: None,
                error: Some(error.into()),
            },
            duration,
            false,
        )
    }

    fn finish(self, output: LogOutput, duration: u64, success: bool) -> LogEntry {
        LogEntry {
            id: self.id,
            timestamp: self.timestamp,
            provider: self.provider,
            model: self.model,
            feature: self.feature,
            input: self.input,
            output,
            duration,
            success,
        }
    }
}

/// Generate a collision-resistant log id: wall-clock millis plus a 9-char
/// random alphanumeric suffix. No global sequence counter needed.
pub fn new_log_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!("log-{}-{}", Utc::now().timestamp_millis(), suffix.to_lowercase())
}

/// Sort newest first by timestamp. The sort is stable, so same-timestamp
/// entries keep their insertion order.
pub fn sort_newest_first(entries: &mut [LogEntry]) {
    entries.sort_by(|a, b| match (a.parsed_timestamp(), b.parsed_timestamp()) {
        (Some(ta), Some(tb)) => tb.cmp(&ta),
        _ => b.timestamp.cmp(&a.timestamp),
    });
}
