//! Simulation driver
//!
//! Replays a scenario timeline against the engine, step by step, on the
//! harness clock. Step expectations (where a fixture declares them) are
//! checked as the timeline advances.

use basketsim_engine::EngineError;
use chrono::Duration;
use log::info;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::bootstrap::{Harness, RunnerConfig, build};
use crate::scenario::{Scenario, Step};

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Step {step}: expected status {expected}, got {actual}")]
    ExpectationFailed {
        step: usize,
        expected: String,
        actual: String,
    },
}

/// Outcome counters for one scenario run
#[derive(Debug, Clone, Default)]
pub struct SimulationSummary {
    pub scenario: String,
    pub steps: usize,
    pub submitted: usize,
    pub rejected: usize,
    pub executed: usize,
    pub cancelled: usize,
    pub final_nav: Decimal,
}

/// Replays one scenario against a fresh engine
pub struct Simulation {
    scenario: Scenario,
    harness: Harness,
}

impl Simulation {
    pub fn new(scenario: Scenario, config: RunnerConfig) -> Self {
        Self {
            scenario,
            harness: build(config),
        }
    }

    /// Take the event receiver for an external consumer
    pub fn take_events(&mut self) -> tokio::sync::mpsc::UnboundedReceiver<basketsim_engine::EngineEvent> {
        let (_, rx) = tokio::sync::mpsc::unbounded_channel();
        std::mem::replace(&mut self.harness.events, rx)
    }

    /// Run the timeline to completion
    pub fn run(&mut self) -> Result<SimulationSummary, SimulationError> {
        let scenario = &self.scenario;
        let engine = &mut self.harness.engine;
        let mut summary = SimulationSummary {
            scenario: scenario.name.clone(),
            steps: scenario.timeline.len(),
            ..Default::default()
        };

        info!("[SIM] running scenario '{}'", scenario.name);

        let assets = scenario
            .index
            .assets
            .iter()
            .map(|a| {
                (
                    a.symbol.clone(),
                    a.quantity,
                    a.rebalance_price,
                    a.current_price,
                )
            })
            .collect();
        engine.create_index(&scenario.index.id, assets)?;
        if !scenario.constraints.is_empty() {
            engine.set_liquidity_constraints(&scenario.index.id, scenario.constraint_map())?;
        }

        for (step_no, step) in scenario.timeline.iter().enumerate() {
            match step {
                Step::Buy {
                    position_id,
                    quantity,
                    price,
                    expect_status,
                } => {
                    let order =
                        engine.submit_buy(*position_id, &scenario.index.id, *quantity, *price);
                    summary.submitted += 1;
                    if order.status == basketsim_core::OrderStatus::Rejected {
                        summary.rejected += 1;
                    }
                    if let Some(expected) = expect_status {
                        let actual = order.status.to_string();
                        if &actual != expected {
                            return Err(SimulationError::ExpectationFailed {
                                step: step_no,
                                expected: expected.clone(),
                                actual,
                            });
                        }
                    }
                }
                Step::Cancel { position_id } => {
                    if engine.cancel(*position_id).success {
                        summary.cancelled += 1;
                    }
                }
                Step::Drain => {
                    let drained = engine.drain_queue();
                    summary.executed += drained.executed;
                }
                Step::UpdatePrices { prices } => {
                    engine.update_prices(&scenario.index.id, prices)?;
                }
                Step::Rebalance { weights } => {
                    engine.rebalance(&scenario.index.id, weights)?;
                }
                Step::AdvanceClock { seconds } => {
                    self.harness.clock.advance(Duration::seconds(*seconds));
                }
            }
        }

        summary.final_nav = engine
            .get_index(&scenario.index.id)
            .map(|index| index.nav())
            .unwrap_or(Decimal::ZERO);

        info!(
            "[SIM] '{}' done: {} submitted, {} executed, {} rejected, NAV {}",
            summary.scenario,
            summary.submitted,
            summary.executed,
            summary.rejected,
            summary.final_nav
        );
        Ok(summary)
    }
}
