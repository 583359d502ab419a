//! Result and report types returned across the engine's public surface.
//!
//! These mirror what a caller inspects after each operation: cancellation
//! outcome, fill quality, rebalance composition moves, and drain batches.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::values::{PositionId, Symbol, Timestamp};

/// Outcome of a cancellation attempt. Failure is data, not an error:
/// double-cancel and unknown ids are reported, never raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResult {
    pub success: bool,
    pub message: String,
    pub loss: Decimal,
}

impl CancelResult {
    pub fn ok(message: impl Into<String>, loss: Decimal) -> Self {
        Self {
            success: true,
            message: message.into(),
            loss,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            loss: Decimal::ZERO,
        }
    }
}

/// Fill quality for a single order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillReport {
    pub position_id: PositionId,
    /// filled_quantity / requested_quantity x 100, in [0, 100]
    pub fill_percentage: Decimal,
    pub loss: Decimal,
    pub timestamp: Timestamp,
}

/// Composition move produced by a rebalance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceReport {
    pub index_id: String,
    pub old_weights: HashMap<Symbol, Decimal>,
    pub new_weights: HashMap<Symbol, Decimal>,
    /// Fee-rated cost of the move; reported, not subtracted from NAV
    pub total_cost: Decimal,
    pub timestamp: Timestamp,
}

/// Summary of one queue drain batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrainSummary {
    pub batch_id: Uuid,
    /// Orders executed this batch
    pub executed: usize,
    /// Orders left queued for the next drain
    pub remaining: usize,
    pub timestamp: Timestamp,
}
