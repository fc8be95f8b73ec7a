//! Stock commands, movements, and the closed kind/location enumerations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopfloor_core::{DomainError, DomainResult};

/// Kind of ledger entry produced by a stock operation.
///
/// Closed enumeration: every consumer matches exhaustively, so adding a kind
/// is a compile-time visible change at each fold site.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Checkout,
    Restock,
    Waste,
    ShipmentReceived,
}

impl TransactionKind {
    /// All kinds, in canonical reporting order.
    pub const ALL: [TransactionKind; 4] = [
        TransactionKind::Checkout,
        TransactionKind::Restock,
        TransactionKind::Waste,
        TransactionKind::ShipmentReceived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Checkout => "CHECKOUT",
            TransactionKind::Restock => "RESTOCK",
            TransactionKind::Waste => "WASTE",
            TransactionKind::ShipmentReceived => "SHIPMENT_RECEIVED",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical side of the store holding sellable or discardable quantity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockSide {
    Front,
    Back,
}

impl StockSide {
    /// Parse a caller-supplied location tag. Case-insensitive; anything
    /// outside FRONT/BACK is rejected with the offending (uppercased) input
    /// echoed back.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        match raw.trim().to_uppercase().as_str() {
            "FRONT" => Ok(StockSide::Front),
            "BACK" => Ok(StockSide::Back),
            other => Err(DomainError::invalid_location(format!(
                "Invalid location: {other}. Must be FRONT or BACK."
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockSide::Front => "FRONT",
            StockSide::Back => "BACK",
        }
    }
}

impl core::fmt::Display for StockSide {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location tag recorded on a ledger entry.
///
/// A restock moves quantity between the two sides of the store, so its
/// entries carry the dedicated `BackToFront` tag rather than either side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementLocation {
    Front,
    Back,
    BackToFront,
}

impl MovementLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementLocation::Front => "FRONT",
            MovementLocation::Back => "BACK",
            MovementLocation::BackToFront => "BACK_TO_FRONT",
        }
    }
}

impl core::fmt::Display for MovementLocation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<StockSide> for MovementLocation {
    fn from(side: StockSide) -> Self {
        match side {
            StockSide::Front => MovementLocation::Front,
            StockSide::Back => MovementLocation::Back,
        }
    }
}

/// Command: Checkout (sell quantity from front stock).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Restock (move quantity from the backroom onto the floor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restock {
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReceiveShipment (add delivered quantity to back stock).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveShipment {
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: LogWaste (discard quantity from one side of the store).
///
/// Carries the caller's location tag verbatim; it is parsed while the
/// command is handled, so an unknown barcode is reported before a bad
/// location tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogWaste {
    pub quantity: i64,
    pub location: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockCommand {
    Checkout(Checkout),
    Restock(Restock),
    ReceiveShipment(ReceiveShipment),
    LogWaste(LogWaste),
}

/// Event: stock was sold off the floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedOut {
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: stock moved from the backroom onto the floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restocked {
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a supplier delivery landed in the backroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentReceived {
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: stock was discarded from one side of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wasted {
    pub quantity: i64,
    pub side: StockSide,
    pub occurred_at: DateTime<Utc>,
}

/// A decided stock movement: the outcome of handling a `StockCommand`
/// against a product's current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockMovement {
    CheckedOut(CheckedOut),
    Restocked(Restocked),
    ShipmentReceived(ShipmentReceived),
    Wasted(Wasted),
}

impl StockMovement {
    pub fn kind(&self) -> TransactionKind {
        match self {
            StockMovement::CheckedOut(_) => TransactionKind::Checkout,
            StockMovement::Restocked(_) => TransactionKind::Restock,
            StockMovement::Wasted(_) => TransactionKind::Waste,
            StockMovement::ShipmentReceived(_) => TransactionKind::ShipmentReceived,
        }
    }

    pub fn location(&self) -> MovementLocation {
        match self {
            StockMovement::CheckedOut(_) => MovementLocation::Front,
            StockMovement::Restocked(_) => MovementLocation::BackToFront,
            StockMovement::ShipmentReceived(_) => MovementLocation::Back,
            StockMovement::Wasted(e) => e.side.into(),
        }
    }

    pub fn quantity(&self) -> i64 {
        match self {
            StockMovement::CheckedOut(e) => e.quantity,
            StockMovement::Restocked(e) => e.quantity,
            StockMovement::ShipmentReceived(e) => e.quantity,
            StockMovement::Wasted(e) => e.quantity,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StockMovement::CheckedOut(e) => e.occurred_at,
            StockMovement::Restocked(e) => e.occurred_at,
            StockMovement::ShipmentReceived(e) => e.occurred_at,
            StockMovement::Wasted(e) => e.occurred_at,
        }
    }

    /// Signed delta recorded on the ledger entry.
    ///
    /// Removals (checkout, waste) are negative; additions (restock,
    /// shipment) are positive.
    pub fn ledger_delta(&self) -> i64 {
        match self {
            StockMovement::CheckedOut(e) => -e.quantity,
            StockMovement::Restocked(e) => e.quantity,
            StockMovement::ShipmentReceived(e) => e.quantity,
            StockMovement::Wasted(e) => -e.quantity,
        }
    }

    /// Contribution to the product's total on-hand count (front + back).
    ///
    /// A restock moves quantity between the two sides without changing the
    /// total, so it contributes zero despite its positive ledger delta.
    pub fn on_hand_delta(&self) -> i64 {
        match self {
            StockMovement::Restocked(_) => 0,
            other => other.ledger_delta(),
        }
    }
}
