//! End-to-end tests of the log API, driven through the router in-process.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use ailog_server::{config::ServerConfig, router::build_router, state::AppState};

fn test_app(dir: &tempfile::TempDir) -> Router {
    let config = ServerConfig {
        log_dir: dir.path().to_path_buf(),
        ..ServerConfig::default()
    };
    build_router(AppState::new(config).unwrap())
}

fn entry(id: &str, timestamp: &str, provider: &str, success: bool) -> Value {
    json!({
        "id": id,
        "timestamp": timestamp,
        "provider": provider,
        "model": "gemini-2.0-flash",
        "feature": "hiyari-analysis",
        "input": { "prompt": "analyze this near-miss" },
        "output": if success {
            json!({ "response": "looks risky" })
        } else {
            json!({ "error": "quota exceeded" })
        },
        "duration": 321,
        "success": success
    })
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, body)
}

fn post_json(path: &str, body: &Value) -> Request<Body> {
    Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn append(app: &Router, value: &Value) {
    let (status, body) = send(app, post_json("/api/logs", value)).await;
    assert_eq!(status, StatusCode::CREATED, "append failed: {body}");
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn test_append_then_list_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    let original = entry("log-1-aaaaaaaaa", "2026-08-01T10:00:00+00:00", "gemini", true);
    append(&app, &original).await;

    let (status, body) = send(&app, Request::get("/api/logs?page=1&pageSize=10").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["hasMore"], json!(false));
    let got = &body["logs"][0];
    assert_eq!(got["id"], original["id"]);
    assert_eq!(got["timestamp"], original["timestamp"]);
    assert_eq!(got["provider"], original["provider"]);
    assert_eq!(got["model"], original["model"]);
    assert_eq!(got["feature"], original["feature"]);
    assert_eq!(got["input"]["prompt"], original["input"]["prompt"]);
    assert_eq!(got["output"]["response"], original["output"]["response"]);
    assert_eq!(got["duration"], original["duration"]);
    assert_eq!(got["success"], original["success"]);
}

#[tokio::test]
async fn test_append_rejects_missing_id_and_bad_json() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let mut no_id = entry("x", "2026-08-01T10:00:00Z", "gemini", true);
    no_id["id"] = json!("");
    let (status, body) = send(&app, post_json("/api/logs", &no_id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("id and timestamp"));

    let req = Request::post("/api/logs")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid JSON"));

    // Nothing was stored
    let (_, body) = send(&app, Request::get("/api/logs").body(Body::empty()).unwrap()).await;
    assert_eq!(body["total"], json!(0));
}

#[tokio::test]
async fn test_pagination_and_provider_filter_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    // T1 < T2 < T3 with providers a, b, a
    append(&app, &entry("t1", "2026-08-01T10:00:00+00:00", "a", true)).await;
    append(&app, &entry("t2", "2026-08-01T11:00:00+00:00", "b", true)).await;
    append(&app, &entry("t3", "2026-08-01T12:00:00+00:00", "a", true)).await;

    let (_, body) = send(&app, Request::get("/api/logs?page=1&pageSize=2").body(Body::empty()).unwrap()).await;
    assert_eq!(body["total"], json!(3));
    assert_eq!(body["hasMore"], json!(true));
    assert_eq!(body["logs"][0]["id"], json!("t3"));
    assert_eq!(body["logs"][1]["id"], json!("t2"));

    let (_, body) = send(&app, Request::get("/api/logs?page=2&pageSize=2").body(Body::empty()).unwrap()).await;
    assert_eq!(body["hasMore"], json!(false));
    assert_eq!(body["logs"][0]["id"], json!("t1"));
    assert_eq!(body["logs"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, Request::get("/api/logs?provider=a").body(Body::empty()).unwrap()).await;
    assert_eq!(body["total"], json!(2));
    assert_eq!(body["logs"][0]["id"], json!("t3"));
    assert_eq!(body["logs"][1]["id"], json!("t1"));
}

#[tokio::test]
async fn test_success_filter_intersects_with_provider() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    append(&app, &entry("ok-a", "2026-08-01T10:00:00Z", "a", true)).await;
    append(&app, &entry("err-a", "2026-08-01T11:00:00Z", "a", false)).await;
    append(&app, &entry("ok-b", "2026-08-01T12:00:00Z", "b", true)).await;

    let (_, body) = send(&app, Request::get("/api/logs?success=false").body(Body::empty()).unwrap()).await;
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["logs"][0]["id"], json!("err-a"));

    let (_, body) = send(&app, Request::get("/api/logs?provider=a&success=true").body(Body::empty()).unwrap()).await;
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["logs"][0]["id"], json!("ok-a"));

    // provider=all is a no-op filter
    let (_, body) = send(&app, Request::get("/api/logs?provider=all").body(Body::empty()).unwrap()).await;
    assert_eq!(body["total"], json!(3));
}

#[tokio::test]
async fn test_delete_semantics() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    append(&app, &entry("keep", "2026-08-01T10:00:00Z", "a", true)).await;
    append(&app, &entry("gone", "2026-08-01T11:00:00Z", "a", true)).await;

    let (status, body) = send(&app, Request::delete("/api/logs/missing").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Log not found"));

    let (status, body) = send(&app, Request::delete("/api/logs/gone").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], json!(1));

    // Double delete reports not found and changes nothing
    let (status, _) = send(&app, Request::delete("/api/logs/gone").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Request::get("/api/logs").body(Body::empty()).unwrap()).await;
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["logs"][0]["id"], json!("keep"));
}

#[tokio::test]
async fn test_clear_all() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    append(&app, &entry("a", "2026-08-01T10:00:00Z", "a", true)).await;

    let (status, body) = send(&app, Request::delete("/api/logs").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (_, body) = send(&app, Request::get("/api/logs").body(Body::empty()).unwrap()).await;
    assert_eq!(body["total"], json!(0));

    // The document records when it was wiped
    let raw = std::fs::read_to_string(dir.path().join("ai-logs.json")).unwrap();
    let doc: Value = serde_json::from_str(&raw).unwrap();
    assert!(doc["metadata"]["cleared"].is_string());
}

#[tokio::test]
async fn test_cleanup_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    for i in 0..5 {
        append(&app, &entry(&format!("e{i}"), &format!("2026-08-01T10:00:0{i}Z"), "a", true)).await;
    }

    let (status, body) = send(&app, post_json("/api/logs/cleanup", &json!({ "keepCount": 3 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], json!(2));

    let (_, body) = send(&app, post_json("/api/logs/cleanup", &json!({ "keepCount": 3 }))).await;
    assert_eq!(body["deleted"], json!(0));

    // The newest three survived
    let (_, body) = send(&app, Request::get("/api/logs").body(Body::empty()).unwrap()).await;
    assert_eq!(body["total"], json!(3));
    assert_eq!(body["logs"][0]["id"], json!("e4"));
    assert_eq!(body["logs"][2]["id"], json!("e2"));
}

#[tokio::test]
async fn test_stats() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    append(&app, &entry("a1", "2026-08-01T10:00:00Z", "gemini", true)).await;
    append(&app, &entry("a2", "2026-08-01T11:00:00Z", "gemini", false)).await;
    append(&app, &entry("b1", "2026-08-01T12:00:00Z", "satellite", true)).await;

    let (status, body) = send(&app, Request::get("/api/logs/stats").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(3));
    assert_eq!(body["successCount"], json!(2));
    assert_eq!(body["errorCount"], json!(1));
    assert_eq!(body["byProvider"]["gemini"], json!(2));
    assert_eq!(body["byProvider"]["satellite"], json!(1));
    assert_eq!(body["byFeature"]["hiyari-analysis"], json!(3));
    assert!(body["fileSize"].as_u64().unwrap() > 0);
    assert!(body["fileSizeFormatted"].as_str().is_some());
}

#[tokio::test]
async fn test_exports() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    let mut e = entry("csv-1", "2026-08-01T10:00:00Z", "gemini", true);
    e["input"]["prompt"] = json!("say \"hello\",\nplease");
    append(&app, &e).await;

    let response = app
        .clone()
        .oneshot(Request::get("/api/logs/export/csv").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"ai-logs-"));
    let csv = String::from_utf8(
        response.into_body().collect().await.unwrap().to_bytes().to_vec(),
    )
    .unwrap();
    assert!(csv.starts_with('\u{feff}'));
    assert!(csv.contains("\"say \"\"hello\"\",\nplease\""));

    let (status, body) = send(&app, Request::get("/api/logs/export/json").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], json!("csv-1"));
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    let (status, body) = send(&app, Request::get("/api/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert!(body["logFile"].as_str().unwrap().ends_with("ai-logs.json"));
    assert!(body["logDir"].as_str().is_some());
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_preflight_answers_empty_204_with_cors_headers() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    let req = Request::options("/api/logs")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let allow_methods = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(allow_methods.contains("POST"));
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_out_of_range_page_query_is_answered_empty() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    append(&app, &entry("log-1-aaaaaaaaa", "2026-08-01T10:00:00+00:00", "gemini", true)).await;

    let path = format!("/api/logs?page={}&pageSize=50", usize::MAX);
    let (status, body) = send(&app, Request::get(path.as_str()).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["logs"].as_array().unwrap().len(), 0);
    assert_eq!(body["hasMore"], json!(false));
}
