//! Stock mutation pipeline (application-level orchestration).
//!
//! This module implements the guarded-mutation loop for per-product stock.
//! It orchestrates the full lifecycle: loading the product, handling the
//! command, recording the ledger entry, and committing atomically under an
//! optimistic version guard.
//!
//! ## Mutation Execution Flow
//!
//! The `InventoryEngine` implements this pipeline:
//!
//! ```text
//! Command (barcode, quantity[, location])
//!   ↓
//! 1. Parse the barcode
//!   ↓
//! 2. Load the product by barcode (capture its version)
//!   ↓
//! 3. Handle the command (pure decision logic, produces a movement)
//!   ↓
//! 4. Record ledger entry + optional waste entry from the movement
//!   ↓
//! 5. Commit product + entries atomically, guarded by the read version
//!   ↓
//! 6. On version conflict: reload and retry from step 2
//! ```
//!
//! ## Retry Semantics
//!
//! A commit that loses the version race is indistinguishable from having
//! arrived a moment later, so the engine transparently reloads and
//! re-decides. Deterministic rejections (validation, insufficient stock,
//! unknown barcode) are returned to the caller immediately and are never
//! retried; only [`StoreError::Concurrency`] loops. Each retry re-handles
//! the command against fresh state, so a checkout that no longer fits
//! after a competing writer drained the shelf fails with
//! `InsufficientStock` rather than overdrawing.
//!
//! ## Error Semantics
//!
//! - Domain rejections map to [`EngineError::Validation`],
//!   [`EngineError::InsufficientStock`] and [`EngineError::InvalidLocation`]
//! - Unknown barcodes map to [`EngineError::NotFound`]
//! - Store failures other than the retried conflict map to
//!   [`EngineError::Store`]
//!
//! This module contains no IO itself; it composes the store trait.

use chrono::Utc;
use tracing::instrument;

use shopfloor_core::{DomainError, ExpectedVersion, ProductId};
use shopfloor_inventory::{
    Barcode, Checkout, LogWaste, NewProduct, Product, ReceiveShipment, Restock, StockAlert,
    StockCommand, TransactionEntry, WasteLogEntry,
};

use crate::store::{InventoryStore, StockCommit, StoreError};

#[derive(Debug)]
pub enum EngineError {
    /// Input failed validation (deterministic).
    Validation(String),
    /// No product matches the requested barcode.
    NotFound(String),
    /// The mutation would overdraw the relevant stock counter.
    InsufficientStock(String),
    /// The supplied location tag is not FRONT or BACK.
    InvalidLocation(String),
    /// A conflicting write was reported outside the retried commit path.
    Conflict(String),
    /// The underlying store failed.
    Store(StoreError),
}

impl From<DomainError> for EngineError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => EngineError::Validation(msg),
            DomainError::InvariantViolation(msg) => EngineError::Validation(msg),
            DomainError::InvalidId(msg) => EngineError::Validation(msg),
            DomainError::NotFound => EngineError::NotFound("Product not found".to_string()),
            DomainError::InsufficientStock(msg) => EngineError::InsufficientStock(msg),
            DomainError::InvalidLocation(msg) => EngineError::InvalidLocation(msg),
            DomainError::Conflict(msg) => EngineError::Conflict(msg),
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(value: StoreError) -> Self {
        match &value {
            StoreError::Concurrency(msg) => EngineError::Conflict(msg.clone()),
            _ => EngineError::Store(value),
        }
    }
}

/// Outcome of a successfully committed stock mutation.
///
/// Carries everything the caller needs to respond without a second read:
/// the post-commit product, the ledger entry just appended, the waste
/// side-log entry when the mutation was a waste, and the threshold alert
/// the new state tripped, if any.
#[derive(Debug, Clone)]
pub struct MovementReceipt {
    pub product: Product,
    pub entry: TransactionEntry,
    pub waste: Option<WasteLogEntry>,
    pub alert: Option<StockAlert>,
}

/// Guarded mutation engine for per-product stock.
///
/// ## Architecture Role
///
/// The engine sits between the API layer (HTTP handlers) and the store.
/// It owns the read-decide-commit loop so that handlers stay thin and the
/// domain crate stays free of IO.
///
/// ## Execution Guarantees
///
/// - **Atomicity**: the product update, the ledger entry and the waste
///   entry land in one [`InventoryStore::commit`] or not at all
/// - **Isolation**: the version guard admits at most one writer per
///   product per version; losers reload and re-decide
/// - **No partial effects**: a rejected command leaves no trace in the
///   product or either log
///
/// ## Generic Parameters
///
/// - `S`: store implementation ([`InMemoryInventoryStore`] in tests,
///   [`PostgresInventoryStore`] in production)
///
/// [`InMemoryInventoryStore`]: crate::store::InMemoryInventoryStore
/// [`PostgresInventoryStore`]: crate::store::PostgresInventoryStore
#[derive(Debug)]
pub struct InventoryEngine<S> {
    store: S,
}

impl<S> InventoryEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> InventoryEngine<S>
where
    S: InventoryStore,
{
    /// Register a new product with its opening quantities.
    ///
    /// Registration writes no ledger entry; the opening quantities are
    /// the baseline later entries are replayed against.
    #[instrument(skip(self, input), fields(barcode = %input.barcode), err(Debug))]
    pub async fn register_product(&self, input: NewProduct) -> Result<Product, EngineError> {
        let product = Product::register(input)?;
        self.store.insert_product(&product).await?;
        tracing::info!(barcode = %product.barcode(), name = product.name(), "registered product");
        Ok(product)
    }

    /// Sell quantity from front stock.
    pub async fn checkout(
        &self,
        barcode: &str,
        quantity: i64,
    ) -> Result<MovementReceipt, EngineError> {
        let command = StockCommand::Checkout(Checkout {
            quantity,
            occurred_at: Utc::now(),
        });
        self.execute(barcode, command).await
    }

    /// Move quantity from back stock onto the shelf.
    pub async fn restock(
        &self,
        barcode: &str,
        quantity: i64,
    ) -> Result<MovementReceipt, EngineError> {
        let command = StockCommand::Restock(Restock {
            quantity,
            occurred_at: Utc::now(),
        });
        self.execute(barcode, command).await
    }

    /// Receive a supplier shipment into back stock.
    pub async fn receive_shipment(
        &self,
        barcode: &str,
        quantity: i64,
    ) -> Result<MovementReceipt, EngineError> {
        let command = StockCommand::ReceiveShipment(ReceiveShipment {
            quantity,
            occurred_at: Utc::now(),
        });
        self.execute(barcode, command).await
    }

    /// Discard quantity from the given side (`FRONT` or `BACK`).
    ///
    /// The location tag is validated against the loaded product, so an
    /// unknown barcode wins over a bad tag.
    pub async fn log_waste(
        &self,
        barcode: &str,
        quantity: i64,
        location: &str,
    ) -> Result<MovementReceipt, EngineError> {
        let command = StockCommand::LogWaste(LogWaste {
            quantity,
            location: location.to_string(),
            occurred_at: Utc::now(),
        });
        self.execute(barcode, command).await
    }

    #[instrument(skip(self, command), fields(barcode = barcode), err(Debug))]
    async fn execute(
        &self,
        barcode: &str,
        command: StockCommand,
    ) -> Result<MovementReceipt, EngineError> {
        // 1) Parse the barcode once; retries reuse it.
        let barcode = Barcode::new(barcode)?;

        let mut attempt = 1u32;
        loop {
            // 2) Load current state and capture the guard version.
            let product = self
                .store
                .product_by_barcode(&barcode)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("Product not found: {barcode}")))?;
            let read_version = product.version();

            // 3) Decide (no mutation; deterministic rejections exit here).
            let movement = product.handle(&command)?;

            // 4) Apply and derive the records to append.
            let mut updated = product;
            updated.apply(&movement);
            let entry = TransactionEntry::record(&updated, &movement);
            let waste = WasteLogEntry::record(&updated, &movement);
            let alert = updated.alert_after(&movement);

            // 5) Commit atomically under the version guard.
            let commit = StockCommit {
                product: updated.clone(),
                expected_version: ExpectedVersion::Exact(read_version),
                entry: entry.clone(),
                waste: waste.clone(),
            };
            match self.store.commit(commit).await {
                Ok(()) => {
                    if let Some(alert) = &alert {
                        tracing::info!(barcode = %updated.barcode(), "{alert}");
                    }
                    return Ok(MovementReceipt {
                        product: updated,
                        entry,
                        waste,
                        alert,
                    });
                }
                // 6) Lost the version race: reload and re-decide.
                Err(StoreError::Concurrency(msg)) => {
                    tracing::debug!(attempt, "commit conflict, retrying: {msg}");
                    attempt += 1;
                }
                Err(other) => return Err(other.into()),
            }
        }
    }

    /// Look up one product by barcode.
    pub async fn product(&self, barcode: &str) -> Result<Product, EngineError> {
        let barcode = Barcode::new(barcode)?;
        self.store
            .product_by_barcode(&barcode)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("Product not found: {barcode}")))
    }

    /// All registered products, ordered by barcode.
    pub async fn products(&self) -> Result<Vec<Product>, EngineError> {
        Ok(self.store.products().await?)
    }

    /// Most recent ledger entries across all products, newest first.
    pub async fn recent_transactions(
        &self,
        limit: usize,
    ) -> Result<Vec<TransactionEntry>, EngineError> {
        Ok(self.store.recent_entries(limit).await?)
    }

    /// Full ledger history for one barcode, newest first.
    pub async fn transactions_for(
        &self,
        barcode: &str,
    ) -> Result<Vec<TransactionEntry>, EngineError> {
        let barcode = Barcode::new(barcode)?;
        Ok(self.store.entries_for_barcode(&barcode).await?)
    }

    /// Full ledger history for one product id, newest first.
    pub async fn transactions_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<TransactionEntry>, EngineError> {
        Ok(self.store.entries_for_product(product_id).await?)
    }

    /// The whole waste side-log, newest first.
    pub async fn waste_log(&self) -> Result<Vec<WasteLogEntry>, EngineError> {
        Ok(self.store.waste_entries().await?)
    }

    /// Waste side-log for one barcode, newest first.
    pub async fn waste_log_for(&self, barcode: &str) -> Result<Vec<WasteLogEntry>, EngineError> {
        let barcode = Barcode::new(barcode)?;
        Ok(self.store.waste_entries_for_barcode(&barcode).await?)
    }
}
