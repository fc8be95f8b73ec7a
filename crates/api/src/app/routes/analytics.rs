//! Insight report endpoint.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/insights", get(get_insights))
}

pub async fn get_insights(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.insights().await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::insight_error_to_response(e),
    }
}
