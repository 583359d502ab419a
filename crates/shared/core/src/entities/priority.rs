use serde::{Deserialize, Serialize};

/// Execution priority class for queued intents.
///
/// Rebalance and cancel intents execute before market and limit orders at
/// the same timestamp; timestamp ordering dominates priority ordering when
/// timestamps differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderPriority {
    Rebalance,
    Cancel,
    Market,
    Limit,
}

impl OrderPriority {
    /// Lower rank executes first within a timestamp
    pub fn rank(&self) -> u8 {
        match self {
            OrderPriority::Rebalance => 1,
            OrderPriority::Cancel => 2,
            OrderPriority::Market => 3,
            OrderPriority::Limit => 4,
        }
    }
}
