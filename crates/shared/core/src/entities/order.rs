use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderStatus, Side};
use crate::values::{PositionId, Price, Quantity, Timestamp};

/// Why an order was refused at submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Requested quantity was zero or negative
    NonPositiveQuantity,
    /// The admission window was already at capacity
    RateLimited,
    /// quantity x price fell below the per-asset minimum notional
    BelowMinimumNotional,
    /// The position id is already present in the ledger
    DuplicatePositionId,
    /// The target index does not exist
    UnknownIndex,
}

/// A buy order against an index, keyed by caller-assigned `position_id`.
///
/// Created PENDING or REJECTED at submission; transitions to FILLED,
/// PARTIALLY_FILLED, or CANCELLED. Terminal orders are immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub position_id: PositionId,
    pub index_id: String,
    pub side: Side,
    pub quantity: Quantity,
    pub price: Price,
    pub submitted_at: Timestamp,
    pub status: OrderStatus,
    pub filled_quantity: Quantity,
    pub filled_price: Price,
    pub realized_loss: Decimal,
}

impl Order {
    /// Create a new pending buy order
    pub fn pending_buy(
        position_id: PositionId,
        index_id: impl Into<String>,
        quantity: Quantity,
        price: Price,
        submitted_at: Timestamp,
    ) -> Self {
        Self {
            position_id,
            index_id: index_id.into(),
            side: Side::Buy,
            quantity,
            price,
            submitted_at,
            status: OrderStatus::Pending,
            filled_quantity: Decimal::ZERO,
            filled_price: Decimal::ZERO,
            realized_loss: Decimal::ZERO,
        }
    }

    /// Create an order rejected at submission time
    pub fn rejected_buy(
        position_id: PositionId,
        index_id: impl Into<String>,
        quantity: Quantity,
        price: Price,
        submitted_at: Timestamp,
    ) -> Self {
        Self {
            status: OrderStatus::Rejected,
            ..Self::pending_buy(position_id, index_id, quantity, price, submitted_at)
        }
    }

    /// Requested notional value of the order
    pub fn notional(&self) -> Decimal {
        self.quantity * self.price
    }

    /// Fraction of the requested quantity actually filled, in [0, 1].
    /// Zero-quantity orders never reach execution; guard the division anyway.
    pub fn fill_fraction(&self) -> Decimal {
        self.filled_quantity
            .checked_div(self.quantity)
            .unwrap_or(Decimal::ZERO)
    }
}
