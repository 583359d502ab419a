use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Asset;
use crate::CoreError;
use crate::values::{Symbol, Timestamp, WeightMap};

/// A basket-index product: an ordered sequence of constituent assets.
///
/// Asset symbols within an index are unique (enforced at construction).
/// NAV is always recomputed on demand - `current_price` can change between
/// calls, so caching it would serve stale values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub id: String,
    assets: Vec<Asset>,
    pub last_rebalance_time: Timestamp,
    pub creation_time: Timestamp,
}

impl Index {
    /// Create a new index. Fails on an empty basket or duplicate symbols.
    pub fn new(
        id: impl Into<String>,
        assets: Vec<Asset>,
        created_at: Timestamp,
    ) -> Result<Self, CoreError> {
        if assets.is_empty() {
            return Err(CoreError::EmptyIndex);
        }
        let mut seen = std::collections::HashSet::new();
        for asset in &assets {
            if !seen.insert(asset.symbol.clone()) {
                return Err(CoreError::DuplicateSymbol(asset.symbol.clone()));
            }
        }
        Ok(Self {
            id: id.into(),
            assets,
            last_rebalance_time: created_at,
            creation_time: created_at,
        })
    }

    /// Constituent assets, in basket order
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut [Asset] {
        &mut self.assets
    }

    pub fn asset(&self, symbol: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.symbol == symbol)
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Net Asset Value: sum of quantity x current_price over all holdings.
    /// Recomputed on every call, never cached.
    pub fn nav(&self) -> Decimal {
        let nav: Decimal = self.assets.iter().map(Asset::market_value).sum();
        debug_assert!(nav >= Decimal::ZERO, "negative NAV for index {}", self.id);
        nav
    }

    /// Current weight of each holding as a share of NAV.
    /// Returns zero weights for a zero-NAV basket rather than dividing.
    pub fn weights(&self) -> HashMap<Symbol, Decimal> {
        let nav = self.nav();
        self.assets
            .iter()
            .map(|a| {
                let w = if nav.is_zero() {
                    Decimal::ZERO
                } else {
                    a.market_value() / nav
                };
                (a.symbol.clone(), w)
            })
            .collect()
    }

    /// Cost of moving to `new_weights`, priced against the current NAV:
    /// sum of |target_value - current_value| x fee_rate over the symbols
    /// named in `new_weights`. A named symbol with no matching holding
    /// contributes a current value of zero.
    pub fn rebalance_cost(&self, new_weights: &WeightMap, fee_rate: Decimal) -> Decimal {
        let nav = self.nav();
        new_weights
            .iter()
            .map(|(symbol, weight)| {
                let current_value = self
                    .asset(symbol)
                    .map(Asset::market_value)
                    .unwrap_or(Decimal::ZERO);
                let target_value = nav * weight;
                (target_value - current_value).abs() * fee_rate
            })
            .sum()
    }
}
