//! Floor layout assignments.

use serde::{Deserialize, Serialize};

use shopfloor_core::ProductId;

/// Placement of a product on the store floor: an aisle label plus an (x, y)
/// coordinate on the 0-1000 grid the floor plan is drawn on.
///
/// Assignments are static reference data. A product without one simply does
/// not appear in the floor view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutAssignment {
    pub product_id: ProductId,
    pub aisle: String,
    pub x: i32,
    pub y: i32,
}

impl LayoutAssignment {
    pub fn new(product_id: ProductId, aisle: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            product_id,
            aisle: aisle.into(),
            x,
            y,
        }
    }
}
