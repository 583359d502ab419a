use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::entities::LiquidityConstraint;

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Quantity value - uses Decimal for precision
pub type Quantity = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Symbol identifier for a constituent asset
pub type Symbol = String;

/// Caller-assigned unique key for an order
pub type PositionId = u64;

/// Per-index liquidity constraints, keyed by asset symbol.
/// An absent entry means the asset is unconstrained.
pub type ConstraintMap = HashMap<Symbol, LiquidityConstraint>;

/// Target weights for a rebalance, keyed by asset symbol
pub type WeightMap = HashMap<Symbol, Decimal>;
