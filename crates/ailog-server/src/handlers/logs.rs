//! Log CRUD: list, append, delete, cleanup, stats.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use ailog_common::{entry::sort_newest_first, LogEntry, LogStats, Page};

use crate::error::ApiError;
use crate::logfile::LogDocument;
use crate::state::SharedState;

const DEFAULT_PAGE_SIZE: usize = 50;
const DEFAULT_KEEP_COUNT: usize = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub provider: Option<String>,
    /// "true" / "false"; anything else (or absent) means all.
    pub success: Option<String>,
}

/// GET /api/logs - paged, filtered listing, newest first
pub async fn list_logs(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let doc = state.log_file.lock().await.read();
    let mut logs = doc.logs;

    if let Some(provider) = query.provider.as_deref().filter(|p| *p != "all") {
        logs.retain(|l| l.provider == provider);
    }
    match query.success.as_deref() {
        Some("true") => logs.retain(|l| l.success),
        Some("false") => logs.retain(|l| !l.success),
        _ => {}
    }
    sort_newest_first(&mut logs);

    let page = Page::slice(
        &logs,
        query.page.unwrap_or(1),
        query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    );
    Ok(Json(page))
}

/// POST /api/logs - append one entry
pub async fn append_log(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let file = state.log_file.lock().await;

    // Rotation check runs before the append; a rotation failure is logged
    // inside and the append proceeds against whatever file state resulted.
    file.rotate_if_needed();

    let value: serde_json::Value =
        serde_json::from_slice(&body).map_err(|_| ApiError::bad_request("Invalid JSON"))?;
    let has = |key: &str| {
        value
            .get(key)
            .and_then(|v| v.as_str())
            .is_some_and(|s| !s.is_empty())
    };
    if !has("id") || !has("timestamp") {
        return Err(ApiError::bad_request(
            "Invalid log entry: id and timestamp required",
        ));
    }
    let entry: LogEntry = serde_json::from_value(value)
        .map_err(|e| ApiError::bad_request(format!("Invalid log entry: {e}")))?;
    let id = entry.id.clone();

    let mut doc = file.read();
    doc.logs.push(entry);
    file.write(&doc)
        .map_err(|e| ApiError::internal(format!("Failed to save log: {e}")))?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "id": id }))))
}

/// DELETE /api/logs/:id - delete one entry
pub async fn delete_log(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let file = state.log_file.lock().await;
    let mut doc = file.read();
    let before = doc.logs.len();
    doc.logs.retain(|l| l.id != id);
    if doc.logs.len() == before {
        return Err(ApiError::not_found("Log not found"));
    }
    file.write(&doc)
        .map_err(|e| ApiError::internal(format!("Failed to save log: {e}")))?;
    Ok(Json(json!({ "success": true, "deleted": 1 })))
}

/// DELETE /api/logs - delete everything
pub async fn clear_logs(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let file = state.log_file.lock().await;
    let mut doc = LogDocument::empty();
    doc.metadata.cleared = Some(Utc::now().to_rfc3339());
    file.write(&doc)
        .map_err(|e| ApiError::internal(format!("Failed to clear logs: {e}")))?;
    info!("log store cleared");
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupBody {
    pub keep_count: Option<usize>,
}

/// POST /api/logs/cleanup - retain the newest N entries
pub async fn cleanup_logs(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    // Tolerant body handling: a missing or malformed keepCount means the
    // default, matching how callers use this endpoint.
    let keep_count = serde_json::from_slice::<CleanupBody>(&body)
        .ok()
        .and_then(|b| b.keep_count)
        .unwrap_or(DEFAULT_KEEP_COUNT);

    let file = state.log_file.lock().await;
    let mut doc = file.read();
    sort_newest_first(&mut doc.logs);
    let deleted = doc.logs.len().saturating_sub(keep_count);
    doc.logs.truncate(keep_count);
    file.write(&doc)
        .map_err(|e| ApiError::internal(format!("Failed to save log: {e}")))?;

    if deleted > 0 {
        info!(deleted, keep_count, "old logs cleaned up");
    }
    Ok(Json(json!({ "success": true, "deleted": deleted })))
}

/// GET /api/logs/stats - counts, per-provider/per-feature tallies, file size
pub async fn log_stats(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let file = state.log_file.lock().await;
    let doc = file.read();
    let stats = LogStats::collect(&doc.logs).with_file_size(file.size());
    Ok(Json(stats))
}
