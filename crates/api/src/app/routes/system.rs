//! Liveness probe.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

pub async fn health() -> axum::response::Response {
    (StatusCode::OK, Json(json!({"status": "ok"}))).into_response()
}
