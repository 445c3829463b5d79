//! Liveness endpoint; also what the client's connectivity probe hits.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

use crate::state::SharedState;

/// GET /api/health
pub async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    let file = state.log_file.lock().await;
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "logFile": file.path().display().to_string(),
        "logDir": file.dir().display().to_string(),
    }))
}
