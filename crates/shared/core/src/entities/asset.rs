use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::values::{Price, Quantity, Symbol};

/// A constituent holding of an index.
///
/// Owned exclusively by exactly one [`Index`](super::Index). `current_price`
/// moves with price updates; `quantity` and `price_at_last_rebalance` move
/// only during a rebalance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: Symbol,
    pub quantity: Quantity,
    pub price_at_last_rebalance: Price,
    pub current_price: Price,
}

impl Asset {
    pub fn new(
        symbol: impl Into<Symbol>,
        quantity: Quantity,
        price_at_last_rebalance: Price,
        current_price: Price,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            price_at_last_rebalance,
            current_price,
        }
    }

    /// Market value of this holding at the current price
    pub fn market_value(&self) -> Decimal {
        self.quantity * self.current_price
    }
}
