//! Append-only ledger record types.
//!
//! Every successful stock mutation produces exactly one `TransactionEntry`;
//! waste mutations additionally produce a `WasteLogEntry`. Entries are
//! immutable once written and ordered by creation time, ties broken by
//! insertion order (the store's responsibility).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopfloor_core::{EntryId, ProductId, WasteLogId};

use crate::barcode::Barcode;
use crate::movement::{MovementLocation, StockMovement, StockSide, TransactionKind};
use crate::product::Product;

/// Immutable ledger record of one stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEntry {
    pub id: EntryId,
    pub product_id: ProductId,
    /// Denormalized so history can be queried by barcode without a join.
    pub barcode: Barcode,
    /// Display name snapshot at write time.
    pub product_name: String,
    pub kind: TransactionKind,
    /// Signed quantity change: negative for removals, positive for additions.
    pub delta: i64,
    pub location: MovementLocation,
    pub recorded_at: DateTime<Utc>,
}

impl TransactionEntry {
    /// Record a decided movement against a product.
    pub fn record(product: &Product, movement: &StockMovement) -> Self {
        Self {
            id: EntryId::new(),
            product_id: product.id(),
            barcode: product.barcode().clone(),
            product_name: product.name().to_string(),
            kind: movement.kind(),
            delta: movement.ledger_delta(),
            location: movement.location(),
            recorded_at: movement.occurred_at(),
        }
    }

    /// Contribution of this entry to the product's total on-hand count.
    ///
    /// A RESTOCK entry records its moved quantity as a positive delta but is
    /// an internal back-to-front move, so it contributes zero here.
    pub fn on_hand_delta(&self) -> i64 {
        match self.kind {
            TransactionKind::Restock => 0,
            _ => self.delta,
        }
    }
}

/// Immutable record of discarded stock, written in the same atomic unit as
/// its WASTE ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasteLogEntry {
    pub id: WasteLogId,
    pub barcode: Barcode,
    pub product_name: String,
    /// Positive magnitude of the discarded quantity.
    pub quantity: i64,
    /// Which side of the store the stock was discarded from.
    pub side: StockSide,
    pub recorded_at: DateTime<Utc>,
}

impl WasteLogEntry {
    /// Record the waste side-entry for a movement, if it is a waste
    /// movement. Other movements produce no waste record.
    pub fn record(product: &Product, movement: &StockMovement) -> Option<Self> {
        match movement {
            StockMovement::Wasted(e) => Some(Self {
                id: WasteLogId::new(),
                barcode: product.barcode().clone(),
                product_name: product.name().to_string(),
                quantity: e.quantity,
                side: e.side,
                recorded_at: e.occurred_at,
            }),
            _ => None,
        }
    }
}

/// Sum the on-hand contribution of `entries`.
///
/// Replaying a product's full history yields
/// `(front_quantity + back_quantity) - registered initial total`.
pub fn replay_on_hand(entries: &[TransactionEntry]) -> i64 {
    entries.iter().map(TransactionEntry::on_hand_delta).sum()
}
