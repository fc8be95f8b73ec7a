//! Floor view domain module.
//!
//! Pure projection logic mapping products, their floor positions, and recent
//! ledger activity onto per-product floor tiles (stock pressure, restock
//! flags, zone detection, advisory annotations). No IO; the data-fetching
//! projector lives in the infrastructure crate.

pub mod layout;
pub mod tile;

pub use layout::LayoutAssignment;
pub use tile::{FloorAnnotation, FloorTile};
