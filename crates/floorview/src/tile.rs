//! Per-product floor tile projection.

use serde::Serialize;

use shopfloor_core::ProductId;
use shopfloor_inventory::{ActivityWindow, Barcode, Product};

use crate::layout::LayoutAssignment;

/// A product flagged as a waste hot spot when it has more than this many
/// WASTE entries in the recent-activity window.
const HIGH_WASTE_ZONE_EVENTS: u64 = 2;
/// A product flagged as high traffic when it has more than this many
/// CHECKOUT entries in the recent-activity window.
const HIGH_TRAFFIC_ZONE_CHECKOUTS: u64 = 5;

const CRITICAL_RATIO: f64 = 0.3;
const CRITICAL_CHECKOUTS: u64 = 5;
const LOW_RATIO: f64 = 0.5;
const HIGH_WASTE_EVENTS: u64 = 3;
const HIGH_VELOCITY_CHECKOUTS: u64 = 10;
const OVERSTOCK_RATIO: f64 = 2.0;

/// Advisory annotation for a floor tile. At most one per tile; rules are
/// evaluated in priority order and the first match wins.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FloorAnnotation {
    CriticalLowStock,
    RestockSoon,
    HighWaste,
    HighVelocity,
    Overstocked,
}

impl FloorAnnotation {
    fn derive(stock_ratio: f64, checkouts: u64, waste_events: u64) -> Option<Self> {
        if stock_ratio < CRITICAL_RATIO && checkouts > CRITICAL_CHECKOUTS {
            Some(FloorAnnotation::CriticalLowStock)
        } else if stock_ratio < LOW_RATIO {
            Some(FloorAnnotation::RestockSoon)
        } else if waste_events > HIGH_WASTE_EVENTS {
            Some(FloorAnnotation::HighWaste)
        } else if checkouts > HIGH_VELOCITY_CHECKOUTS {
            Some(FloorAnnotation::HighVelocity)
        } else if stock_ratio > OVERSTOCK_RATIO {
            Some(FloorAnnotation::Overstocked)
        } else {
            None
        }
    }
}

impl core::fmt::Display for FloorAnnotation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            FloorAnnotation::CriticalLowStock => "critical: high demand + low stock",
            FloorAnnotation::RestockSoon => "restock recommended soon",
            FloorAnnotation::HighWaste => "high waste, review ordering",
            FloorAnnotation::HighVelocity => "high velocity item",
            FloorAnnotation::Overstocked => "overstocked",
        };
        f.write_str(text)
    }
}

impl Serialize for FloorAnnotation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// One product's slot in the floor view: position, stock pressure, and
/// activity-derived flags, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloorTile {
    pub product_id: ProductId,
    pub name: String,
    pub barcode: Barcode,
    pub aisle: String,
    pub x: i32,
    pub y: i32,
    pub front_quantity: i64,
    pub back_quantity: i64,
    pub reorder_threshold: i64,
    /// `front_quantity / reorder_threshold`, or 0.0 when the threshold is
    /// zero (ratio undefined, reported as 0).
    pub stock_ratio: f64,
    pub restock_needed: bool,
    pub backroom_reorder_needed: bool,
    pub high_waste_zone: bool,
    pub high_traffic_zone: bool,
    pub annotation: Option<FloorAnnotation>,
}

impl FloorTile {
    /// Project a product onto its floor tile using the shared
    /// recent-activity window.
    pub fn project(
        product: &Product,
        assignment: &LayoutAssignment,
        window: &ActivityWindow,
    ) -> Self {
        let threshold = product.reorder_threshold();
        let stock_ratio = if threshold > 0 {
            product.front_quantity() as f64 / threshold as f64
        } else {
            0.0
        };

        let checkouts = window.checkouts_for(product.barcode());
        let waste_events = window.waste_events_for(product.barcode());

        Self {
            product_id: product.id(),
            name: product.name().to_string(),
            barcode: product.barcode().clone(),
            aisle: assignment.aisle.clone(),
            x: assignment.x,
            y: assignment.y,
            front_quantity: product.front_quantity(),
            back_quantity: product.back_quantity(),
            reorder_threshold: threshold,
            stock_ratio,
            restock_needed: product.front_quantity() <= threshold,
            backroom_reorder_needed: product.back_quantity() <= threshold,
            high_waste_zone: waste_events > HIGH_WASTE_ZONE_EVENTS,
            high_traffic_zone: checkouts > HIGH_TRAFFIC_ZONE_CHECKOUTS,
            annotation: FloorAnnotation::derive(stock_ratio, checkouts, waste_events),
        }
    }
}
