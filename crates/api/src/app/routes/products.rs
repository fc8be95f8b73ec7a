//! Product registration and catalog lookups.

use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};

use shopfloor_inventory::NewProduct;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(register_product))
        .route("/:barcode", get(get_product))
}

pub async fn register_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterProductRequest>,
) -> axum::response::Response {
    let input = NewProduct {
        barcode: body.barcode,
        name: body.name,
        front_quantity: body.front_quantity,
        back_quantity: body.back_quantity,
        reorder_threshold: body.reorder_threshold,
    };
    match services.register_product(input).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.products().await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(barcode): Path<String>,
) -> axum::response::Response {
    match services.product(&barcode).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}
