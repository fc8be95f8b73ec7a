//! Application assembly for the HTTP surface.
//!
//! This folder is structured like:
//! - `services.rs`: backend selection (in-memory vs. Postgres) and wiring
//! - `routes/`: route tables and handlers (one file per area)
//! - `dto.rs`: request payloads and response shaping
//! - `errors.rs`: consistent error responses

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

/// Builds the full application router with its backing services attached.
///
/// Backend selection happens in [`services::build_services`]; the returned
/// router is ready to be passed to `axum::serve`.
pub async fn build_app() -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services().await?);

    let app = Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services)));

    Ok(app)
}
