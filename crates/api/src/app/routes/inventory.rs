//! Stock movement endpoints and ledger queries.
//!
//! The four mutation routes share one response shape, a receipt with the
//! updated product, the ledger entry just appended, the waste side-log entry
//! when one was written, and the advisory alert when a threshold tripped.

use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/checkout", post(checkout))
        .route("/restock", post(restock))
        .route("/shipment", post(receive_shipment))
        .route("/waste", post(log_waste))
        .route("/transactions", get(list_transactions))
        .route("/transactions/:barcode", get(transactions_for_barcode))
        .route("/waste-log", get(waste_log))
        .route("/waste-log/:barcode", get(waste_log_for_barcode))
}

pub async fn checkout(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::MovementRequest>,
) -> axum::response::Response {
    match services.checkout(&body.barcode, body.quantity).await {
        Ok(receipt) => {
            let message = format!(
                "Checkout successful. Sold {} of {}",
                body.quantity,
                receipt.product.name()
            );
            (StatusCode::OK, Json(dto::receipt_to_json(&receipt, message))).into_response()
        }
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn restock(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::MovementRequest>,
) -> axum::response::Response {
    match services.restock(&body.barcode, body.quantity).await {
        Ok(receipt) => {
            let message = format!(
                "Restocked {} of '{}' from Back to Front.",
                body.quantity,
                receipt.product.name()
            );
            (StatusCode::OK, Json(dto::receipt_to_json(&receipt, message))).into_response()
        }
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn receive_shipment(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::MovementRequest>,
) -> axum::response::Response {
    match services.receive_shipment(&body.barcode, body.quantity).await {
        Ok(receipt) => {
            let message = format!(
                "Received shipment: Added {} of '{}' to back stock.",
                body.quantity,
                receipt.product.name()
            );
            (StatusCode::OK, Json(dto::receipt_to_json(&receipt, message))).into_response()
        }
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn log_waste(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::WasteRequest>,
) -> axum::response::Response {
    match services
        .log_waste(&body.barcode, body.quantity, &body.location)
        .await
    {
        Ok(receipt) => {
            // A successful waste movement always carries its side-log entry;
            // the receipt field is optional only because the other three
            // movements share the type.
            let message = match &receipt.waste {
                Some(waste) => format!(
                    "Logged {} waste for '{}' from {}.",
                    waste.quantity,
                    receipt.product.name(),
                    waste.side.as_str()
                ),
                None => format!("Logged waste for '{}'.", receipt.product.name()),
            };
            (StatusCode::OK, Json(dto::receipt_to_json(&receipt, message))).into_response()
        }
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn list_transactions(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.recent_transactions().await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn transactions_for_barcode(
    Extension(services): Extension<Arc<AppServices>>,
    Path(barcode): Path<String>,
) -> axum::response::Response {
    match services.transactions_for(&barcode).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn waste_log(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.waste_log().await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn waste_log_for_barcode(
    Extension(services): Extension<Arc<AppServices>>,
    Path(barcode): Path<String>,
) -> axum::response::Response {
    match services.waste_log_for(&barcode).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}
