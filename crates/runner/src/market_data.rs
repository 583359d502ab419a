//! Static market data source
//!
//! Serves fixture order-book ladders through the [`MarketDataSource`]
//! port and folds depth into the engine's liquidity constraints. The
//! engine never sees this directly - constraints are derived here and
//! handed over via `set_liquidity_constraints`.

use std::collections::HashMap;

use basketsim_core::{LiquidityConstraint, Price, Symbol};
use basketsim_ports::{DepthLevel, MarketDataError, MarketDataSource, MarketDepth};
use rust_decimal::Decimal;

/// In-memory depth per symbol
#[derive(Debug, Default)]
pub struct StaticDepthSource {
    books: HashMap<Symbol, MarketDepth>,
}

impl StaticDepthSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_depth(mut self, symbol: impl Into<Symbol>, levels: Vec<DepthLevel>) -> Self {
        let symbol = symbol.into();
        self.books.insert(
            symbol.clone(),
            MarketDepth {
                symbol,
                levels,
            },
        );
        self
    }
}

impl MarketDataSource for StaticDepthSource {
    fn depth(&self, symbol: &str) -> Result<MarketDepth, MarketDataError> {
        self.books
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }
}

/// Fold an order-book ladder into a liquidity constraint: everything
/// priced at or under `limit_price` is fillable notional.
pub fn constraints_from_depth(
    depth: &MarketDepth,
    limit_price: Price,
    price_impact: Decimal,
) -> LiquidityConstraint {
    LiquidityConstraint::new(depth.fillable_notional(limit_price), price_impact)
}
