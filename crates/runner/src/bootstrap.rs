//! Bootstrap - engine assembly for a scenario run
//!
//! Wires an engine to a simulated clock and a buffered reporting channel,
//! and initializes logging. The channel keeps the reporting consumer
//! outside the engine's consistency domain: the engine fires events and
//! never waits.

use std::sync::Arc;

use basketsim_clock::SimClock;
use basketsim_core::Timestamp;
use basketsim_engine::{ChannelSink, EngineConfig, EngineEvent, ExecutionEngine};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Runner configuration
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    pub engine: EngineConfig,
    /// Simulation start time; wall clock when absent
    pub start_time: Option<Timestamp>,
}

/// An engine wired for a scenario run
pub struct Harness {
    pub engine: ExecutionEngine,
    pub clock: Arc<SimClock>,
    pub events: UnboundedReceiver<EngineEvent>,
}

/// Initialize the logger once; repeated calls are no-ops
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .try_init();
}

/// Assemble an engine on a simulated clock with a buffered event channel
pub fn build(config: RunnerConfig) -> Harness {
    let clock = Arc::new(SimClock::new(config.start_time));
    let (tx, events) = mpsc::unbounded_channel();
    let engine = ExecutionEngine::new(config.engine, clock.clone(), Arc::new(ChannelSink::new(tx)));
    Harness {
        engine,
        clock,
        events,
    }
}
