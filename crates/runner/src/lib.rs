//! Basketsim Runner
//!
//! Drives the execution engine from JSON scenario fixtures on a simulated
//! clock. The runner owns everything the engine treats as external: the
//! scenario/config loader, a static market data source, and the buffered
//! reporting consumer.

pub mod bootstrap;
pub mod market_data;
pub mod scenario;
pub mod simulation;

// Re-export main types
pub use bootstrap::{Harness, RunnerConfig, init_logging};
pub use market_data::{StaticDepthSource, constraints_from_depth};
pub use scenario::{Scenario, ScenarioError, Step};
pub use simulation::{Simulation, SimulationError, SimulationSummary};
