//! Request payloads and response shaping for the HTTP surface.

use serde::Deserialize;
use serde_json::json;

use shopfloor_infra::engine::MovementReceipt;

// -------------------------
// Products
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterProductRequest {
    pub barcode: String,
    pub name: String,
    #[serde(default)]
    pub front_quantity: i64,
    #[serde(default)]
    pub back_quantity: i64,
    #[serde(default)]
    pub reorder_threshold: i64,
}

// -------------------------
// Stock movements
// -------------------------

#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    pub barcode: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct WasteRequest {
    pub barcode: String,
    pub quantity: i64,
    pub location: String,
}

// -------------------------
// Receipts
// -------------------------

/// Renders a movement receipt as the response body shared by all four
/// mutation endpoints. The waste side-log entry and the advisory alert are
/// present only when the movement produced them.
pub fn receipt_to_json(receipt: &MovementReceipt, message: String) -> serde_json::Value {
    let mut body = json!({
        "message": message,
        "product": receipt.product,
        "transaction": receipt.entry,
    });
    if let Some(waste) = &receipt.waste {
        body["waste_log"] = json!(waste);
    }
    if let Some(alert) = &receipt.alert {
        body["alert"] = json!(alert.to_string());
    }
    body
}
