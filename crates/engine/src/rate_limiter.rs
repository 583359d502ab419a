//! Admission Rate Limiter
//!
//! Fixed-duration window with a fixed admission capacity, shared by order
//! submission and queue drain. This is a *fixed-window* limiter, not a
//! sliding log: bursts are possible exactly at window boundaries (up to 2x
//! capacity across the seam). That under-limiting at window edges is an
//! accepted design trade-off of the window reset, not a bug.
//!
//! The limiter is an explicit struct owned by one engine instance - never
//! a hidden singleton - so multiple simulated engines can run with
//! independent windows in tests.

use basketsim_core::Timestamp;
use chrono::Duration;

/// Window configuration
#[derive(Debug, Clone, Copy)]
pub struct RateLimiterConfig {
    /// Window duration
    pub window: Duration,
    /// Admissions allowed per window
    pub capacity: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            window: Duration::seconds(10),
            capacity: 100,
        }
    }
}

/// Fixed-window admission counter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    window_start: Timestamp,
    admitted: u32,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig, now: Timestamp) -> Self {
        Self {
            config,
            window_start: now,
            admitted: 0,
        }
    }

    /// Reset the counter once the current window has fully elapsed
    fn roll(&mut self, now: Timestamp) {
        if now - self.window_start > self.config.window {
            self.admitted = 0;
            self.window_start = now;
        }
    }

    /// Try to admit one order. Denial has no side effect.
    pub fn admit(&mut self, now: Timestamp) -> bool {
        self.roll(now);

        if self.admitted >= self.config.capacity {
            return false;
        }

        self.admitted += 1;
        true
    }

    /// Admissions left in the current window. Used by the queue drain to
    /// size its batch; drained orders then consume slots via [`record`].
    ///
    /// [`record`]: RateLimiter::record
    pub fn available_slots(&mut self, now: Timestamp) -> u32 {
        self.roll(now);
        self.config.capacity - self.admitted
    }

    /// Consume one slot for an order executed at drain time
    pub fn record(&mut self, now: Timestamp) {
        self.roll(now);
        self.admitted = self.admitted.saturating_add(1);
    }

    pub fn admitted_in_window(&self) -> u32 {
        self.admitted
    }

    pub fn capacity(&self) -> u32 {
        self.config.capacity
    }
}
