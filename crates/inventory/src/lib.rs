//! Inventory domain module.
//!
//! This crate contains the business rules for per-product stock tracking,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage): the product record with its guarded front/back/waste counters,
//! the commands and movements that change them, the append-only ledger record
//! types, and the recent-activity aggregation consumed by the floor view and
//! the insight digest.

pub mod activity;
pub mod barcode;
pub mod ledger;
pub mod movement;
pub mod product;

pub use activity::{ActivityWindow, RECENT_ACTIVITY_LIMIT};
pub use barcode::Barcode;
pub use ledger::{TransactionEntry, WasteLogEntry, replay_on_hand};
pub use movement::{
    Checkout, LogWaste, MovementLocation, ReceiveShipment, Restock, StockCommand, StockMovement,
    StockSide, TransactionKind,
};
pub use product::{NewProduct, Product, StockAlert};
