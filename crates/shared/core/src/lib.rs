//! Basketsim Core Domain
//!
//! Pure domain types for the basketsim execution engine.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod reports;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    Asset, Index, LiquidityConstraint, Order, OrderPriority, OrderStatus, RejectReason, Side,
};
pub use reports::{CancelResult, DrainSummary, FillReport, RebalanceReport};
pub use values::{ConstraintMap, PositionId, Price, Quantity, Symbol, Timestamp, WeightMap};

use thiserror::Error;

/// Errors raised while constructing domain entities
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Duplicate asset symbol in index: {0}")]
    DuplicateSymbol(String),

    #[error("Index must hold at least one asset")]
    EmptyIndex,
}
