//! Scenario fixtures
//!
//! JSON test fixtures describing an initial index, optional liquidity
//! constraints, and a timeline of engine operations. The fixture format
//! belongs to the runner, not the engine - the loader converts into the
//! engine's input types at the boundary.

use std::collections::HashMap;
use std::path::Path;

use basketsim_core::{ConstraintMap, LiquidityConstraint, PositionId, Symbol};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A complete test scenario
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub index: IndexSpec,
    #[serde(default)]
    pub constraints: HashMap<Symbol, ConstraintSpec>,
    pub timeline: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexSpec {
    pub id: String,
    pub assets: Vec<AssetSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetSpec {
    pub symbol: Symbol,
    pub quantity: Decimal,
    pub rebalance_price: Decimal,
    pub current_price: Decimal,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ConstraintSpec {
    pub max_fillable_notional: Decimal,
    pub price_impact: Decimal,
}

/// One timeline operation against the engine
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Buy {
        position_id: PositionId,
        quantity: Decimal,
        price: Decimal,
        /// Expected post-submission status, checked when present
        #[serde(default)]
        expect_status: Option<String>,
    },
    Cancel {
        position_id: PositionId,
    },
    Drain,
    UpdatePrices {
        prices: HashMap<Symbol, Decimal>,
    },
    Rebalance {
        weights: HashMap<Symbol, Decimal>,
    },
    AdvanceClock {
        seconds: i64,
    },
}

impl Scenario {
    pub fn from_str(raw: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_str(&raw)
    }

    /// Constraints converted into the engine's typed mapping
    pub fn constraint_map(&self) -> ConstraintMap {
        self.constraints
            .iter()
            .map(|(symbol, spec)| {
                (
                    symbol.clone(),
                    LiquidityConstraint::new(spec.max_fillable_notional, spec.price_impact),
                )
            })
            .collect()
    }
}
