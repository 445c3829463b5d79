//! Download endpoints: the raw logs array as JSON, or BOM-prefixed CSV.

use axum::{extract::State, http::header, response::IntoResponse};
use chrono::Utc;

use ailog_common::export::csv_export_with_bom;

use crate::error::ApiError;
use crate::state::SharedState;

/// GET /api/logs/export/json
pub async fn export_json(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let doc = state.log_file.lock().await.read();
    let body = serde_json::to_string_pretty(&doc.logs)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok((attachment_headers("application/json", "json"), body))
}

/// GET /api/logs/export/csv
pub async fn export_csv(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let doc = state.log_file.lock().await.read();
    let body = csv_export_with_bom(&doc.logs);
    Ok((attachment_headers("text/csv; charset=utf-8", "csv"), body))
}

fn attachment_headers(content_type: &str, ext: &str) -> [(header::HeaderName, String); 2] {
    let date = Utc::now().format("%Y-%m-%d");
    [
        (header::CONTENT_TYPE, content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"ai-logs-{date}.{ext}\""),
        ),
    ]
}
