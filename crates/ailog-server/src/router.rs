//! Axum router — maps all URL paths to handlers.

use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};

use crate::handlers::{
    export::{export_csv, export_json},
    health::health,
    logs::{append_log, cleanup_logs, clear_logs, delete_log, list_logs, log_stats},
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    // Any browser origin may talk to the log API; the service is only ever
    // bound on a trusted local network.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/logs", get(list_logs).post(append_log).delete(clear_logs))
        .route("/api/logs/cleanup", post(cleanup_logs))
        .route("/api/logs/stats", get(log_stats))
        .route("/api/logs/export/json", get(export_json))
        .route("/api/logs/export/csv", get(export_csv))
        .route("/api/logs/{id}", delete(delete_log))
        .route("/api/health", get(health))
        .layer(cors)
        .layer(middleware::from_fn(preflight_no_content))
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

// CorsLayer answers preflights with an empty 200; the API contract is an
// empty 204. Rewrite the status and leave the CORS headers untouched.
async fn preflight_no_content(req: Request, next: Next) -> Response {
    let preflight = req.method() == Method::OPTIONS;
    let mut res = next.run(req).await;
    if preflight && res.status() == StatusCode::OK {
        *res.status_mut() = StatusCode::NO_CONTENT;
    }
    res
}
