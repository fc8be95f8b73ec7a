//! Storage abstraction for products, the transaction ledger, and the
//! waste side-log.

use async_trait::async_trait;
use shopfloor_core::{ExpectedVersion, ProductId};
use shopfloor_inventory::{Barcode, Product, TransactionEntry, WasteLogEntry};
use std::sync::Arc;

use super::StoreError;

/// Atomic unit persisted by a successful stock mutation.
///
/// `product` carries the post-apply state, version already bumped.
/// `expected_version` is the version the writer read before deciding;
/// the stored row must still be at it for the commit to land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockCommit {
    pub product: Product,
    pub expected_version: ExpectedVersion,
    pub entry: TransactionEntry,
    pub waste: Option<WasteLogEntry>,
}

/// Port for inventory persistence.
///
/// Reads never block behind writers. Writes to a single product are
/// serialized by the version guard in [`InventoryStore::commit`].
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Insert a newly registered product.
    ///
    /// Fails with [`StoreError::DuplicateBarcode`] when the barcode is
    /// already taken. Registration writes no ledger entry; the opening
    /// quantities are the replay baseline.
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError>;

    async fn product_by_barcode(&self, barcode: &Barcode) -> Result<Option<Product>, StoreError>;

    /// All registered products, ordered by barcode.
    async fn products(&self) -> Result<Vec<Product>, StoreError>;

    /// Atomically persist one mutation: update the product row guarded
    /// by `expected_version`, append the ledger entry, and append the
    /// waste entry when present. All or nothing.
    ///
    /// Fails with [`StoreError::Concurrency`] when the guard misses.
    async fn commit(&self, commit: StockCommit) -> Result<(), StoreError>;

    /// Most recent ledger entries across all products, newest first.
    async fn recent_entries(&self, limit: usize) -> Result<Vec<TransactionEntry>, StoreError>;

    /// Full ledger history for one barcode, newest first.
    async fn entries_for_barcode(&self, barcode: &Barcode)
    -> Result<Vec<TransactionEntry>, StoreError>;

    /// Full ledger history for one product id, newest first.
    async fn entries_for_product(&self, product_id: &ProductId)
    -> Result<Vec<TransactionEntry>, StoreError>;

    /// The whole waste side-log, newest first.
    async fn waste_entries(&self) -> Result<Vec<WasteLogEntry>, StoreError>;

    /// Waste side-log for one barcode, newest first.
    async fn waste_entries_for_barcode(&self, barcode: &Barcode)
    -> Result<Vec<WasteLogEntry>, StoreError>;
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        (**self).insert_product(product).await
    }

    async fn product_by_barcode(&self, barcode: &Barcode) -> Result<Option<Product>, StoreError> {
        (**self).product_by_barcode(barcode).await
    }

    async fn products(&self) -> Result<Vec<Product>, StoreError> {
        (**self).products().await
    }

    async fn commit(&self, commit: StockCommit) -> Result<(), StoreError> {
        (**self).commit(commit).await
    }

    async fn recent_entries(&self, limit: usize) -> Result<Vec<TransactionEntry>, StoreError> {
        (**self).recent_entries(limit).await
    }

    async fn entries_for_barcode(
        &self,
        barcode: &Barcode,
    ) -> Result<Vec<TransactionEntry>, StoreError> {
        (**self).entries_for_barcode(barcode).await
    }

    async fn entries_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<TransactionEntry>, StoreError> {
        (**self).entries_for_product(product_id).await
    }

    async fn waste_entries(&self) -> Result<Vec<WasteLogEntry>, StoreError> {
        (**self).waste_entries().await
    }

    async fn waste_entries_for_barcode(
        &self,
        barcode: &Barcode,
    ) -> Result<Vec<WasteLogEntry>, StoreError> {
        (**self).waste_entries_for_barcode(barcode).await
    }
}
