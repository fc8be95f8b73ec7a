//! Route tables for the HTTP surface, grouped by area.

use axum::{Router, routing::get};

pub mod analytics;
pub mod floorview;
pub mod inventory;
pub mod products;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/inventory", inventory::router())
        .route("/floorview", get(floorview::get_floor_view))
        .nest("/analytics", analytics::router())
}
