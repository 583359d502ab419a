//! Basketsim Ports
//!
//! Port definitions (traits) for the basketsim engine.
//! These define the boundaries between the engine's consistency domain and
//! its external collaborators: the time source and the market data source.
//! Collaborator latency or failure must never block or corrupt engine state,
//! so every port here is synchronous and consulted outside the engine's
//! mutation path.

mod clock;
mod error;
mod market_data;

pub use clock::Clock;
pub use error::MarketDataError;
pub use market_data::{DepthLevel, MarketDataSource, MarketDepth};
