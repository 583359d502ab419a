use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Liquidity cap for a single constituent asset, supplied externally by the
/// market data collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquidityConstraint {
    /// Largest notional value of this asset executable in one order
    pub max_fillable_notional: Decimal,
    /// Predicted per-unit price impact of trading through this asset
    pub price_impact: Decimal,
}

impl LiquidityConstraint {
    pub fn new(max_fillable_notional: Decimal, price_impact: Decimal) -> Self {
        Self {
            max_fillable_notional,
            price_impact,
        }
    }
}
