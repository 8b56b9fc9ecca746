//! "3, 2, 1, Go!" before a run
//!
//! Polled once per frame with wall-clock time instead of chaining timers.

use crate::consts::COUNTDOWN_STEP_MS;

const LABELS: [&str; 4] = ["3", "2", "1", "Go!"];

/// What the countdown overlay should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStatus {
    Showing(&'static str),
    /// Overlay hidden, the run should start now
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    started_at: f64,
    step_ms: f64,
}

impl Countdown {
    pub fn new(started_at: f64) -> Self {
        Self::with_step(started_at, COUNTDOWN_STEP_MS)
    }

    pub fn with_step(started_at: f64, step_ms: f64) -> Self {
        Self {
            started_at,
            step_ms,
        }
    }

    /// Total time from the first label to the start of the run
    pub fn duration_ms(&self) -> f64 {
        self.step_ms * LABELS.len() as f64
    }

    pub fn poll(&self, now: f64) -> CountdownStatus {
        let elapsed = (now - self.started_at).max(0.0);
        let step = (elapsed / self.step_ms).floor() as usize;
        match LABELS.get(step) {
            Some(label) => CountdownStatus::Showing(label),
            None => CountdownStatus::Finished,
        }
    }
}
