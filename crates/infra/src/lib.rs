//! Infrastructure for the shopfloor inventory system.
//!
//! This crate wires the pure domain crates to the outside world: the
//! inventory store (in-memory and PostgreSQL), the guarded mutation
//! engine, the floor layout store and its default-grid seeder, the floor
//! view projector, and the HTTP summarizer adapter behind the insight
//! service.

pub mod engine;
pub mod insight;
pub mod layout;
pub mod projections;
pub mod store;
pub mod summarizer;

#[cfg(test)]
mod integration_tests;

pub use engine::{EngineError, InventoryEngine, MovementReceipt};
pub use insight::{InsightError, InsightService};
pub use layout::{InMemoryLayoutStore, LayoutStore, PostgresLayoutStore, seed_default_layout};
pub use projections::FloorViewProjector;
pub use store::{
    InMemoryInventoryStore, InventoryStore, PostgresInventoryStore, StockCommit, StoreError,
    ensure_schema,
};
pub use summarizer::HttpSummarizer;
