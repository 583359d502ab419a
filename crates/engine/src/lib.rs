//! Basketsim Execution Engine
//!
//! The engine owns index/order state and simulates the lifecycle of buy
//! orders against basket-index products:
//! - **Rate Limiter**: fixed-window admission budget shared by submission
//!   and queue drain
//! - **Liquidity Evaluator**: per-asset caps gate the fillable fraction of
//!   a whole basket order
//! - **Order Ledger**: owns every order keyed by position id and its
//!   status transitions
//! - **Execution Queue**: pending orders, ranked and batched at drain time
//! - **Rebalancer**: recomputes constituent quantities from target weights
//!
//! ## Control flow
//!
//! ```text
//! submit_buy ──► Rate Limiter ──► Order Ledger (PENDING) ──► Execution Queue
//!
//! drain_queue ─► available slots ─► ranked batch ─► Liquidity Evaluator
//!                                                        │
//!                       Order Ledger (FILLED / PARTIALLY_FILLED) ◄─┘
//!
//! rebalance ──► Index quantities + weights      (never touches the queue)
//! ```
//!
//! Every public operation is synchronous and atomic with respect to other
//! operations on the same engine instance; the engine performs no I/O.
//! Reporting flows through a [`ReportingSink`] that can never block or
//! corrupt engine state.

pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod liquidity;
pub mod queue;
pub mod rate_limiter;
pub mod rebalance;

// Re-export main types
pub use engine::{EngineConfig, ExecutionEngine, SlippageModel};
pub use error::{EngineError, Result};
pub use events::{ChannelSink, EngineEvent, LogSink, NullSink, ReportingSink};
pub use ledger::OrderLedger;
pub use liquidity::LiquidityEvaluator;
pub use queue::ExecutionQueue;
pub use rate_limiter::{RateLimiter, RateLimiterConfig};
pub use rebalance::Rebalancer;
