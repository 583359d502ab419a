use serde::{Deserialize, Serialize};

/// Order side. The simulated product only admits buys; Sell exists for
/// report symmetry and future use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}
