//! Liquidity Evaluator
//!
//! Computes how much of a basket order is executable under per-asset
//! liquidity caps. An index order cannot be partially filled per-asset
//! without breaking the basket ratio, so the worst-case constituent gates
//! the entire order.
//!
//! Stateless - constraints are owned by the engine and passed in.

use basketsim_core::{Asset, ConstraintMap, Index, Quantity};
use rust_decimal::Decimal;

pub struct LiquidityEvaluator;

impl LiquidityEvaluator {
    /// Fraction of `quantity` fillable for `index`, in [0, 1].
    ///
    /// For each constrained asset, the required notional is
    /// `quantity x current_price x asset.quantity`; exceeding the asset's
    /// cap limits the whole order to `cap / required`. The order's fillable
    /// fraction is the minimum over constrained assets. Assets without a
    /// constraint entry impose no limit.
    pub fn fillable_fraction(
        index: &Index,
        quantity: Quantity,
        constraints: &ConstraintMap,
    ) -> Decimal {
        if constraints.is_empty() {
            return Decimal::ONE;
        }

        let mut min_fraction = Decimal::ONE;
        for asset in index.assets() {
            let Some(constraint) = constraints.get(&asset.symbol) else {
                continue;
            };

            let asset_notional = quantity * asset.current_price * asset.quantity;
            if asset_notional > constraint.max_fillable_notional {
                let fraction = constraint
                    .max_fillable_notional
                    .checked_div(asset_notional)
                    .unwrap_or(Decimal::ZERO);
                min_fraction = min_fraction.min(fraction);
            }
        }

        min_fraction.clamp(Decimal::ZERO, Decimal::ONE)
    }

    /// Predicted market impact of executing an order against `index`:
    /// sum of `price_impact x current_price` over constrained assets.
    /// Zero when the index is unconstrained. Lower impact executes first
    /// at drain time.
    pub fn liquidity_impact(index: &Index, constraints: &ConstraintMap) -> Decimal {
        index
            .assets()
            .iter()
            .filter_map(|asset: &Asset| {
                constraints
                    .get(&asset.symbol)
                    .map(|c| c.price_impact * asset.current_price)
            })
            .sum()
    }
}
