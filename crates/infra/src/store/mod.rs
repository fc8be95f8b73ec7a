//! Inventory store implementations.
//!
//! The store is the single authority for durable product state, the
//! transaction ledger, and the waste side-log. Two backends exist:
//!
//! - [`InMemoryInventoryStore`] for tests and ephemeral deployments
//! - [`PostgresInventoryStore`] for production use
//!
//! Both enforce the same contract: barcode uniqueness on insert and an
//! optimistic version guard on [`InventoryStore::commit`].

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryInventoryStore;
pub use postgres::{PostgresInventoryStore, ensure_schema};
pub use r#trait::{InventoryStore, StockCommit};

use thiserror::Error;

/// Inventory store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The optimistic version guard failed: the product row moved on
    /// between read and commit.
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    /// A product with the same barcode already exists.
    #[error("duplicate barcode: {0}")]
    DuplicateBarcode(String),

    /// The backing storage failed (connection, pool, corrupt row).
    #[error("store backend failure: {0}")]
    Backend(String),
}
