//! Maps engine and store errors onto HTTP responses.
//!
//! Every error body has the shape `{"error": code, "message": text}` so
//! clients can branch on the stable `error` code and show the message as-is.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shopfloor_infra::engine::EngineError;
use shopfloor_infra::insight::InsightError;
use shopfloor_infra::store::StoreError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({"error": code, "message": message.into()})),
    )
        .into_response()
}

pub fn engine_error_to_response(err: EngineError) -> axum::response::Response {
    match err {
        EngineError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        EngineError::InvalidLocation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_location", msg)
        }
        EngineError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        EngineError::InsufficientStock(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_stock", msg)
        }
        EngineError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        EngineError::Store(StoreError::DuplicateBarcode(barcode)) => json_error(
            StatusCode::CONFLICT,
            "duplicate_barcode",
            format!("Product already exists: {barcode}"),
        ),
        EngineError::Store(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", format!("{e}"))
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", format!("{err}"))
}

pub fn insight_error_to_response(err: InsightError) -> axum::response::Response {
    match err {
        InsightError::Summary(e) => {
            json_error(StatusCode::BAD_GATEWAY, "upstream_failure", e.to_string())
        }
        InsightError::Store(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", format!("{e}"))
        }
    }
}
