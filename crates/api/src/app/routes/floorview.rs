//! Floor view projection endpoint.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};

use crate::app::errors;
use crate::app::services::AppServices;

pub async fn get_floor_view(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.floor_view().await {
        Ok(tiles) => (StatusCode::OK, Json(tiles)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
