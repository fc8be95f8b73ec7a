//! HTTP surface for the shopfloor inventory engine.
//!
//! The binary in `main.rs` wires configuration, logging, and the Axum
//! router defined under [`app`]. Everything behind the routes lives in the
//! domain and infrastructure crates; this crate only translates HTTP
//! requests into engine calls and engine outcomes into JSON responses.

pub mod app;
