//! Thread-safe in-memory inventory store for tests and ephemeral
//! deployments.

use async_trait::async_trait;
use shopfloor_core::ProductId;
use shopfloor_inventory::{Barcode, Product, TransactionEntry, WasteLogEntry};
use std::collections::HashMap;
use std::sync::RwLock;

use super::StoreError;
use super::r#trait::{InventoryStore, StockCommit};

/// In-memory implementation of [`InventoryStore`].
///
/// Products are keyed by barcode; ledger and waste entries live in
/// append-order vectors, so "newest first" is reverse iteration.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    products: HashMap<Barcode, Product>,
    entries: Vec<TransactionEntry>,
    waste: Vec<WasteLogEntry>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        if inner.products.contains_key(product.barcode()) {
            return Err(StoreError::DuplicateBarcode(product.barcode().to_string()));
        }
        inner
            .products
            .insert(product.barcode().clone(), product.clone());
        Ok(())
    }

    async fn product_by_barcode(&self, barcode: &Barcode) -> Result<Option<Product>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner.products.get(barcode).cloned())
    }

    async fn products(&self) -> Result<Vec<Product>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        let mut products: Vec<Product> = inner.products.values().cloned().collect();
        products.sort_by(|a, b| a.barcode().cmp(b.barcode()));
        Ok(products)
    }

    async fn commit(&self, commit: StockCommit) -> Result<(), StoreError> {
        let StockCommit {
            product,
            expected_version,
            entry,
            waste,
        } = commit;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let stored = inner.products.get_mut(product.barcode()).ok_or_else(|| {
            StoreError::Backend(format!("no product stored for barcode {}", product.barcode()))
        })?;
        if !expected_version.matches(stored.version()) {
            return Err(StoreError::Concurrency(format!(
                "expected {:?}, found {}",
                expected_version,
                stored.version()
            )));
        }
        *stored = product;

        inner.entries.push(entry);
        if let Some(waste) = waste {
            inner.waste.push(waste);
        }
        Ok(())
    }

    async fn recent_entries(&self, limit: usize) -> Result<Vec<TransactionEntry>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner.entries.iter().rev().take(limit).cloned().collect())
    }

    async fn entries_for_barcode(
        &self,
        barcode: &Barcode,
    ) -> Result<Vec<TransactionEntry>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner
            .entries
            .iter()
            .rev()
            .filter(|entry| &entry.barcode == barcode)
            .cloned()
            .collect())
    }

    async fn entries_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<TransactionEntry>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner
            .entries
            .iter()
            .rev()
            .filter(|entry| &entry.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn waste_entries(&self) -> Result<Vec<WasteLogEntry>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner.waste.iter().rev().cloned().collect())
    }

    async fn waste_entries_for_barcode(
        &self,
        barcode: &Barcode,
    ) -> Result<Vec<WasteLogEntry>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner
            .waste
            .iter()
            .rev()
            .filter(|entry| &entry.barcode == barcode)
            .cloned()
            .collect())
    }
}
