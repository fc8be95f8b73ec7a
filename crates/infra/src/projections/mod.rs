//! Read-model projections derived from store state.
//!
//! Projections are rebuilt on demand from the products table and the
//! ledger; nothing here is cached or incrementally maintained.

pub mod floor_view;

pub use floor_view::FloorViewProjector;
