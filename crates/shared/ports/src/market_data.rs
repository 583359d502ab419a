use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MarketDataError;
use basketsim_core::{Price, Quantity, Symbol};

/// One price level of an order book ladder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    pub price: Price,
    pub quantity: Quantity,
}

/// Order book depth for a single asset, best price first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDepth {
    pub symbol: Symbol,
    pub levels: Vec<DepthLevel>,
}

impl MarketDepth {
    /// Total notional available at or under `limit_price`
    pub fn fillable_notional(&self, limit_price: Price) -> Decimal {
        self.levels
            .iter()
            .take_while(|level| level.price <= limit_price)
            .map(|level| level.price * level.quantity)
            .sum()
    }
}

/// Port for the external market data collaborator.
///
/// Supplies current order-book depth per asset symbol on request; the
/// engine never fetches this itself.
pub trait MarketDataSource: Send + Sync {
    fn depth(&self, symbol: &str) -> Result<MarketDepth, MarketDataError>;
}
