//! Rebalancer
//!
//! Moves an index's constituent quantities to new target weights. Both the
//! old weights and the target values are priced against the pre-rebalance
//! NAV, so the report reads off one consistent baseline. Symbols absent
//! from the target weights are left untouched: their quantity does not
//! change even though their weight share of NAV implicitly shifts.
//!
//! Stateless - operates on an index borrowed from the engine.

use basketsim_core::{Index, RebalanceReport, Timestamp, WeightMap};
use chrono::Duration;
use rust_decimal::Decimal;

pub struct Rebalancer;

impl Rebalancer {
    /// Rebalance `index` to `new_weights`, returning the composition move.
    /// The fee-rated cost is reported, not subtracted from NAV.
    pub fn rebalance(
        index: &mut Index,
        new_weights: &WeightMap,
        fee_rate: Decimal,
        now: Timestamp,
    ) -> RebalanceReport {
        let old_weights = index.weights();
        let nav = index.nav();
        let total_cost = index.rebalance_cost(new_weights, fee_rate);

        for asset in index.assets_mut() {
            let Some(weight) = new_weights.get(&asset.symbol) else {
                continue;
            };
            debug_assert!(
                !asset.current_price.is_zero(),
                "rebalance against zero price for {}",
                asset.symbol
            );
            if let Some(quantity) = (nav * weight).checked_div(asset.current_price) {
                asset.quantity = quantity;
                asset.price_at_last_rebalance = asset.current_price;
            }
        }
        index.last_rebalance_time = now;

        RebalanceReport {
            index_id: index.id.clone(),
            old_weights,
            new_weights: new_weights.clone(),
            total_cost,
            timestamp: now,
        }
    }

    /// Advisory cadence check: has `interval` elapsed since the last
    /// rebalance? Rebalancing itself stays on-demand.
    pub fn is_due(index: &Index, interval: Duration, now: Timestamp) -> bool {
        now - index.last_rebalance_time >= interval
    }
}
