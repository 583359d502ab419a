use thiserror::Error;

/// Failures at the market data boundary. These stay outside the engine's
/// consistency domain: a failed depth lookup means constraints are simply
/// not refreshed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Market data source unavailable: {0}")]
    Unavailable(String),
}
