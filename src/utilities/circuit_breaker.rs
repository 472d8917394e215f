//! Consecutive-failure circuit breaker for outbound LLM calls.
//!
//! After `threshold` consecutive failures the breaker opens and rejects calls
//! until `cooldown` has elapsed since the last failure. The first call after
//! the cooldown resets the counter. Any success resets it too.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(2 * 60);

#[derive(Debug, Default)]
struct BreakerState {
    failures: u32,
    last_failure: Option<Instant>,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    threshold: u32,
    cooldown: Duration,
    state: Mutex<BreakerState>,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_THRESHOLD, DEFAULT_COOLDOWN)
    }
}

impl CircuitBreaker {
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self {
            threshold,
            cooldown,
            state: Mutex::new(BreakerState::default()),
        }
    }

    /// Whether a call may proceed now.
    pub fn allow(&self) -> bool {
        self.allow_at(Instant::now())
    }

    fn allow_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock();
        if state.failures < self.threshold {
            return true;
        }
        match state.last_failure {
            Some(at) if now.duration_since(at) < self.cooldown => false,
            _ => {
                tracing::info!("Circuit breaker cooldown elapsed, closing");
                *state = BreakerState::default();
                true
            }
        }
    }

    pub fn record_success(&self) {
        let mut state = self.state.lock();
        state.failures = 0;
        state.last_failure = None;
    }

    pub fn record_failure(&self) {
        self.record_failure_at(Instant::now());
    }

    fn record_failure_at(&self, now: Instant) {
        let mut state = self.state.lock();
        state.failures += 1;
        state.last_failure = Some(now);
        if state.failures == self.threshold {
            tracing::warn!(
                failures = state.failures,
                cooldown_secs = self.cooldown.as_secs(),
                "Circuit breaker opened"
            );
        }
    }

    pub fn is_open(&self) -> bool {
        let state = self.state.lock();
        state.failures >= self.threshold
            && state
                .last_failure
                .is_some_and(|at| at.elapsed() < self.cooldown)
    }

    pub fn failures(&self) -> u32 {
        self.state.lock().failures
    }
}
