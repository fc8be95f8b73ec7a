//! Product stock record and its guarded state transitions.

use serde::{Deserialize, Serialize};

use shopfloor_core::{DomainError, DomainResult, ProductId};

use crate::barcode::Barcode;
use crate::movement::{
    CheckedOut, Checkout, LogWaste, ReceiveShipment, Restock, Restocked, ShipmentReceived,
    StockCommand, StockMovement, StockSide, Wasted,
};

/// Input for registering a new product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub barcode: String,
    pub name: String,
    pub front_quantity: i64,
    pub back_quantity: i64,
    pub reorder_threshold: i64,
}

/// A tracked product with its stock split across the two sides of the store.
///
/// `front_quantity` is what shoppers see, `back_quantity` is the backroom
/// reserve, and `waste_quantity` accumulates everything discarded over the
/// product's lifetime. All counters stay non-negative at every observable
/// point; mutations go through `handle` (decide) and `apply` (evolve) so
/// every guard is enforced before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    barcode: Barcode,
    name: String,
    front_quantity: i64,
    back_quantity: i64,
    waste_quantity: i64,
    reorder_threshold: i64,
    version: u64,
}

impl Product {
    /// Register a new product with its opening stock split.
    pub fn register(input: NewProduct) -> DomainResult<Self> {
        let barcode = Barcode::new(input.barcode)?;
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if input.front_quantity < 0 || input.back_quantity < 0 {
            return Err(DomainError::validation("opening quantities cannot be negative"));
        }
        if input.reorder_threshold < 0 {
            return Err(DomainError::validation("reorder threshold cannot be negative"));
        }

        Ok(Self {
            id: ProductId::new(),
            barcode,
            name,
            front_quantity: input.front_quantity,
            back_quantity: input.back_quantity,
            waste_quantity: 0,
            reorder_threshold: input.reorder_threshold,
            version: 1,
        })
    }

    /// Rebuild a product from stored state. Callers are trusted to pass
    /// values that were previously produced by this type.
    #[allow(clippy::too_many_arguments)]
    pub fn from_stored(
        id: ProductId,
        barcode: Barcode,
        name: String,
        front_quantity: i64,
        back_quantity: i64,
        waste_quantity: i64,
        reorder_threshold: i64,
        version: u64,
    ) -> Self {
        Self {
            id,
            barcode,
            name,
            front_quantity,
            back_quantity,
            waste_quantity,
            reorder_threshold,
            version,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn barcode(&self) -> &Barcode {
        &self.barcode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn front_quantity(&self) -> i64 {
        self.front_quantity
    }

    pub fn back_quantity(&self) -> i64 {
        self.back_quantity
    }

    pub fn waste_quantity(&self) -> i64 {
        self.waste_quantity
    }

    pub fn reorder_threshold(&self) -> i64 {
        self.reorder_threshold
    }

    /// Total sellable quantity across both sides.
    pub fn on_hand(&self) -> i64 {
        self.front_quantity + self.back_quantity
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Decide the movement a command produces, without mutating state.
    pub fn handle(&self, command: &StockCommand) -> DomainResult<StockMovement> {
        match command {
            StockCommand::Checkout(cmd) => self.handle_checkout(cmd),
            StockCommand::Restock(cmd) => self.handle_restock(cmd),
            StockCommand::ReceiveShipment(cmd) => self.handle_receive(cmd),
            StockCommand::LogWaste(cmd) => self.handle_waste(cmd),
        }
    }

    /// Evolve stock counters from a decided movement.
    pub fn apply(&mut self, movement: &StockMovement) {
        match movement {
            StockMovement::CheckedOut(e) => {
                self.front_quantity -= e.quantity;
            }
            StockMovement::Restocked(e) => {
                self.back_quantity -= e.quantity;
                self.front_quantity += e.quantity;
            }
            StockMovement::ShipmentReceived(e) => {
                self.back_quantity += e.quantity;
            }
            StockMovement::Wasted(e) => {
                match e.side {
                    StockSide::Front => self.front_quantity -= e.quantity,
                    StockSide::Back => self.back_quantity -= e.quantity,
                }
                self.waste_quantity += e.quantity;
            }
        }

        // Deterministic version tracking: +1 per applied movement.
        self.version += 1;
    }

    /// Advisory signal for the state a movement left behind, if any.
    ///
    /// Evaluated against post-`apply` state. Threshold comparisons use `<=`
    /// so a side sitting exactly at its threshold is already flagged.
    pub fn alert_after(&self, movement: &StockMovement) -> Option<StockAlert> {
        match movement {
            StockMovement::CheckedOut(_) if self.front_quantity <= self.reorder_threshold => {
                Some(StockAlert::RestockFront {
                    name: self.name.clone(),
                    remaining: self.front_quantity,
                })
            }
            StockMovement::Restocked(_) if self.back_quantity <= self.reorder_threshold => {
                Some(StockAlert::ReorderFromSupplier {
                    name: self.name.clone(),
                    remaining: self.back_quantity,
                })
            }
            _ => None,
        }
    }

    fn handle_checkout(&self, cmd: &Checkout) -> DomainResult<StockMovement> {
        ensure_positive(cmd.quantity)?;
        if self.front_quantity < cmd.quantity {
            return Err(DomainError::insufficient_stock(format!(
                "Not enough front stock. Available: {}",
                self.front_quantity
            )));
        }
        Ok(StockMovement::CheckedOut(CheckedOut {
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        }))
    }

    fn handle_restock(&self, cmd: &Restock) -> DomainResult<StockMovement> {
        ensure_positive(cmd.quantity)?;
        if self.back_quantity < cmd.quantity {
            return Err(DomainError::insufficient_stock(format!(
                "Not enough back stock. Available: {}",
                self.back_quantity
            )));
        }
        Ok(StockMovement::Restocked(Restocked {
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        }))
    }

    fn handle_receive(&self, cmd: &ReceiveShipment) -> DomainResult<StockMovement> {
        ensure_positive(cmd.quantity)?;
        Ok(StockMovement::ShipmentReceived(ShipmentReceived {
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        }))
    }

    fn handle_waste(&self, cmd: &LogWaste) -> DomainResult<StockMovement> {
        ensure_positive(cmd.quantity)?;
        let side = StockSide::parse(&cmd.location)?;
        let available = match side {
            StockSide::Front => self.front_quantity,
            StockSide::Back => self.back_quantity,
        };
        if available < cmd.quantity {
            let side_name = match side {
                StockSide::Front => "front",
                StockSide::Back => "back",
            };
            return Err(DomainError::insufficient_stock(format!(
                "Not enough {side_name} stock to waste. Available: {available}"
            )));
        }
        Ok(StockMovement::Wasted(Wasted {
            quantity: cmd.quantity,
            side,
            occurred_at: cmd.occurred_at,
        }))
    }
}

fn ensure_positive(quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::validation("quantity must be positive"));
    }
    Ok(())
}

/// Advisory raised when a movement leaves a stock side at or below the
/// product's reorder threshold. Never fatal: the movement itself succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockAlert {
    /// Front stock needs replenishing from the backroom.
    RestockFront { name: String, remaining: i64 },
    /// Backroom stock needs a supplier order.
    ReorderFromSupplier { name: String, remaining: i64 },
}

impl core::fmt::Display for StockAlert {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StockAlert::RestockFront { name, remaining } => write!(
                f,
                "RESTOCK NEEDED: Front stock for '{name}' is low ({remaining} remaining)."
            ),
            StockAlert::ReorderFromSupplier { name, remaining } => write!(
                f,
                "ORDER FROM SUPPLIER: Back stock for '{name}' is low ({remaining} remaining)."
            ),
        }
    }
}
