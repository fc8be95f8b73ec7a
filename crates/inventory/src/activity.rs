//! Recent-activity aggregation over a slice of the transaction ledger.

use std::collections::BTreeMap;

use crate::barcode::Barcode;
use crate::ledger::TransactionEntry;
use crate::movement::TransactionKind;

/// How many of the most recent ledger entries feed activity-based signals
/// (floor view zones, insight digest). The window is system-wide, not
/// per-product: a busy neighbour dilutes a product's share of it.
pub const RECENT_ACTIVITY_LIMIT: usize = 50;

/// Aggregated counts over a recent slice of the transaction ledger.
///
/// One fold feeds both the floor view's zone detection and the insight
/// digest, so the two consumers can never disagree about the same window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityWindow {
    total_entries: u64,
    kind_counts: BTreeMap<TransactionKind, u64>,
    checkouts_by_barcode: BTreeMap<Barcode, u64>,
    waste_events_by_barcode: BTreeMap<Barcode, u64>,
    entries_by_name: BTreeMap<String, u64>,
    checkout_units: i64,
    waste_units: i64,
}

impl ActivityWindow {
    /// Fold ledger entries (any order) into per-kind and per-product counts.
    pub fn from_entries(entries: &[TransactionEntry]) -> Self {
        let mut window = Self::default();
        for entry in entries {
            window.total_entries += 1;
            *window.kind_counts.entry(entry.kind).or_default() += 1;
            *window
                .entries_by_name
                .entry(entry.product_name.clone())
                .or_default() += 1;

            match entry.kind {
                TransactionKind::Checkout => {
                    *window
                        .checkouts_by_barcode
                        .entry(entry.barcode.clone())
                        .or_default() += 1;
                    window.checkout_units += entry.delta.abs();
                }
                TransactionKind::Waste => {
                    *window
                        .waste_events_by_barcode
                        .entry(entry.barcode.clone())
                        .or_default() += 1;
                    window.waste_units += entry.delta.abs();
                }
                TransactionKind::Restock | TransactionKind::ShipmentReceived => {}
            }
        }
        window
    }

    pub fn total_entries(&self) -> u64 {
        self.total_entries
    }

    pub fn kind_count(&self, kind: TransactionKind) -> u64 {
        self.kind_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Number of CHECKOUT entries for a barcode within the window.
    pub fn checkouts_for(&self, barcode: &Barcode) -> u64 {
        self.checkouts_by_barcode.get(barcode).copied().unwrap_or(0)
    }

    /// Number of WASTE entries for a barcode within the window.
    pub fn waste_events_for(&self, barcode: &Barcode) -> u64 {
        self.waste_events_by_barcode
            .get(barcode)
            .copied()
            .unwrap_or(0)
    }

    /// Units sold within the window (absolute deltas of CHECKOUT entries).
    pub fn checkout_units(&self) -> i64 {
        self.checkout_units
    }

    /// Units discarded within the window (absolute deltas of WASTE entries).
    pub fn waste_units(&self) -> i64 {
        self.waste_units
    }

    /// Products ranked by entry count, descending; ties break by name so the
    /// ranking is stable across runs.
    pub fn top_products(&self, limit: usize) -> Vec<(String, u64)> {
        let mut ranked: Vec<(String, u64)> = self
            .entries_by_name
            .iter()
            .map(|(name, count)| (name.clone(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Waste as a share of all units that left the shelves, in percent.
    ///
    /// `None` when the window saw neither waste nor checkout units, so
    /// callers never divide by zero.
    pub fn waste_percentage(&self) -> Option<f64> {
        let denominator = self.waste_units + self.checkout_units;
        if denominator == 0 {
            None
        } else {
            Some(self.waste_units as f64 * 100.0 / denominator as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::{Checkout, LogWaste, StockCommand};
    use crate::product::{NewProduct, Product};
    use chrono::Utc;

    fn test_product(barcode: &str, name: &str) -> Product {
        Product::register(NewProduct {
            barcode: barcode.to_string(),
            name: name.to_string(),
            front_quantity: 100,
            back_quantity: 100,
            reorder_threshold: 5,
        })
        .unwrap()
    }

    fn checkout_entry(product: &mut Product, quantity: i64) -> TransactionEntry {
        let movement = product
            .handle(&StockCommand::Checkout(Checkout {
                quantity,
                occurred_at: Utc::now(),
            }))
            .unwrap();
        let entry = TransactionEntry::record(product, &movement);
        product.apply(&movement);
        entry
    }

    fn waste_entry(product: &mut Product, quantity: i64) -> TransactionEntry {
        let movement = product
            .handle(&StockCommand::LogWaste(LogWaste {
                quantity,
                location: "FRONT".to_string(),
                occurred_at: Utc::now(),
            }))
            .unwrap();
        let entry = TransactionEntry::record(product, &movement);
        product.apply(&movement);
        entry
    }

    #[test]
    fn counts_checkouts_and_waste_per_barcode() {
        let mut milk = test_product("X1", "Whole Milk");
        let mut bread = test_product("X2", "Rye Bread");

        let entries = vec![
            checkout_entry(&mut milk, 2),
            checkout_entry(&mut milk, 1),
            waste_entry(&mut milk, 3),
            checkout_entry(&mut bread, 5),
        ];

        let window = ActivityWindow::from_entries(&entries);
        assert_eq!(window.total_entries(), 4);
        assert_eq!(window.kind_count(TransactionKind::Checkout), 3);
        assert_eq!(window.kind_count(TransactionKind::Waste), 1);
        assert_eq!(window.checkouts_for(milk.barcode()), 2);
        assert_eq!(window.checkouts_for(bread.barcode()), 1);
        assert_eq!(window.waste_events_for(milk.barcode()), 1);
        assert_eq!(window.waste_events_for(bread.barcode()), 0);
        assert_eq!(window.checkout_units(), 8);
        assert_eq!(window.waste_units(), 3);
    }

    #[test]
    fn top_products_rank_by_count_then_name() {
        let mut milk = test_product("X1", "Whole Milk");
        let mut bread = test_product("X2", "Rye Bread");
        let mut eggs = test_product("X3", "Eggs");

        let entries = vec![
            checkout_entry(&mut milk, 1),
            checkout_entry(&mut milk, 1),
            checkout_entry(&mut bread, 1),
            checkout_entry(&mut bread, 1),
            checkout_entry(&mut eggs, 1),
        ];

        let window = ActivityWindow::from_entries(&entries);
        let ranked = window.top_products(5);
        // Milk and bread tie at 2; "Rye Bread" sorts before "Whole Milk".
        assert_eq!(
            ranked,
            vec![
                ("Rye Bread".to_string(), 2),
                ("Whole Milk".to_string(), 2),
                ("Eggs".to_string(), 1),
            ]
        );

        assert_eq!(window.top_products(1).len(), 1);
    }

    #[test]
    fn waste_percentage_is_undefined_without_units() {
        let window = ActivityWindow::from_entries(&[]);
        assert_eq!(window.waste_percentage(), None);

        let mut milk = test_product("X1", "Whole Milk");
        let entries = vec![waste_entry(&mut milk, 1), checkout_entry(&mut milk, 3)];
        let window = ActivityWindow::from_entries(&entries);
        assert_eq!(window.waste_percentage(), Some(25.0));
    }
}
