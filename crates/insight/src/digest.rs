//! Deterministic inventory digest.

use core::fmt::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopfloor_inventory::{ActivityWindow, Product, TransactionEntry, TransactionKind};

/// How many products the digest ranks in its top-active section.
const TOP_PRODUCTS: usize = 5;

/// Plain-text digest of current inventory state and recent ledger activity.
///
/// This is the sole input handed to the summarizer, so it must be
/// deterministic for a given snapshot: kinds print in canonical order, the
/// product ranking breaks ties by name, and the inventory status section is
/// sorted by product name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryDigest {
    text: String,
    transaction_count: usize,
    product_count: usize,
}

impl InventoryDigest {
    /// Build the digest from a product snapshot and a recent ledger slice.
    pub fn build(products: &[Product], entries: &[TransactionEntry]) -> Self {
        let window = ActivityWindow::from_entries(entries);
        let mut text = String::new();

        let _ = writeln!(text, "=== TRANSACTION HISTORY ===");
        let _ = writeln!(text, "Total Transactions: {}", entries.len());
        for kind in TransactionKind::ALL {
            let count = window.kind_count(kind);
            if count > 0 {
                let _ = writeln!(text, "{kind}: {count}");
            }
        }

        let _ = writeln!(text, "\n=== TOP ACTIVE PRODUCTS ===");
        for (name, count) in window.top_products(TOP_PRODUCTS) {
            let _ = writeln!(text, "{name}: {count} transactions");
        }

        let _ = writeln!(text, "\n=== CURRENT INVENTORY STATUS ===");
        let mut by_name: Vec<&Product> = products.iter().collect();
        by_name.sort_by(|a, b| a.name().cmp(b.name()));
        for product in by_name {
            let _ = writeln!(
                text,
                "{} - Front: {}, Back: {}, Waste: {}, Threshold: {}",
                product.name(),
                product.front_quantity(),
                product.back_quantity(),
                product.waste_quantity(),
                product.reorder_threshold()
            );
        }

        let _ = writeln!(text, "\n=== WASTE ANALYSIS ===");
        let _ = writeln!(text, "Total Waste: {} units", window.waste_units());
        let _ = writeln!(text, "Total Sales: {} units", window.checkout_units());
        match window.waste_percentage() {
            Some(pct) => {
                let _ = writeln!(text, "Waste Percentage: {pct:.2}%");
            }
            None => {
                let _ = writeln!(text, "Waste Percentage: undefined");
            }
        }

        Self {
            text,
            transaction_count: entries.len(),
            product_count: products.len(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }

    pub fn product_count(&self) -> usize {
        self.product_count
    }
}

/// Result of a full insight run: the summarizer's prose plus the digest
/// counts it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightReport {
    pub analysis: String,
    pub generated_at: DateTime<Utc>,
    pub transaction_count: usize,
    pub product_count: usize,
}
