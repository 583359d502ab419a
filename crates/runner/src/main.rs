//! Scenario runner binary
//!
//! Usage: `basketsim-runner <scenario.json>`

use basketsim_engine::{EngineEvent, LogSink, ReportingSink};
use basketsim_runner::{RunnerConfig, Scenario, Simulation, init_logging};
use log::{error, info};

#[tokio::main]
async fn main() {
    init_logging();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: basketsim-runner <scenario.json>");
        std::process::exit(2);
    };

    let scenario = match Scenario::from_path(&path) {
        Ok(scenario) => scenario,
        Err(err) => {
            error!("[MAIN] failed to load {path}: {err}");
            std::process::exit(1);
        }
    };

    let mut simulation = Simulation::new(scenario, RunnerConfig::default());

    // Consume buffered engine events off the hot path and relay them
    // through the log sink
    let mut events = simulation.take_events();
    let consumer = tokio::spawn(async move {
        let sink = LogSink;
        let mut count = 0usize;
        while let Some(event) = events.recv().await {
            sink.record(&event);
            if matches!(event, EngineEvent::BatchDrained { .. }) {
                count += 1;
            }
        }
        count
    });

    let summary = match simulation.run() {
        Ok(summary) => summary,
        Err(err) => {
            error!("[MAIN] scenario failed: {err}");
            std::process::exit(1);
        }
    };

    // Dropping the simulation closes the event channel
    drop(simulation);
    let batches = consumer.await.unwrap_or(0);

    info!(
        "[MAIN] '{}': {} steps, {} submitted, {} executed, {} rejected, {} cancelled, {} drain batches, final NAV {}",
        summary.scenario,
        summary.steps,
        summary.submitted,
        summary.executed,
        summary.rejected,
        summary.cancelled,
        batches,
        summary.final_nav
    );
}
