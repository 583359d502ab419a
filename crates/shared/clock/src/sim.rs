use std::sync::RwLock;

use basketsim_core::Timestamp;
use basketsim_ports::Clock;
use chrono::{Duration, Utc};

/// Controllable simulation time source.
///
/// Time is frozen between explicit `advance`/`set` calls, which makes
/// rate-limit windows and timestamps fully deterministic in tests.
#[derive(Debug)]
pub struct SimClock {
    current: RwLock<Timestamp>,
}

impl SimClock {
    /// Create a new simulation clock, starting at `initial_time` or the
    /// current wall-clock time
    pub fn new(initial_time: Option<Timestamp>) -> Self {
        Self {
            current: RwLock::new(initial_time.unwrap_or_else(Utc::now)),
        }
    }

    /// Jump the simulated time forward by `duration`
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.write().expect("clock lock poisoned");
        *current += duration;
    }

    /// Explicitly set the simulated time
    pub fn set(&self, time: Timestamp) {
        let mut current = self.current.write().expect("clock lock poisoned");
        *current = time;
    }
}

impl Clock for SimClock {
    fn now(&self) -> Timestamp {
        *self.current.read().expect("clock lock poisoned")
    }

    fn name(&self) -> &str {
        "SimClock"
    }
}
