//! Chess clocks.
//!
//! The engine does not tick clocks itself; the session layer calls
//! `elapse` with wall time. Commands only pause, restart and adjust them.

use serde::{Deserialize, Serialize};

/// Clock run state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockState {
    /// Counting down while the owner has priority.
    #[default]
    Running,
    /// Stopped by `/stop-clocks`.
    Paused,
}

/// A player's remaining thinking time, in seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    remaining: i64,
    state: ClockState,
}

impl Clock {
    /// Create a running clock.
    #[must_use]
    pub fn new(seconds: i64) -> Self {
        Self {
            remaining: seconds,
            state: ClockState::Running,
        }
    }

    /// Seconds left; may be negative once the flag falls.
    #[must_use]
    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    #[must_use]
    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn pause(&mut self) {
        self.state = ClockState::Paused;
    }

    pub fn restart(&mut self) {
        self.state = ClockState::Running;
    }

    /// Add (or with a negative value, remove) time.
    pub fn modify(&mut self, seconds: i64) {
        self.remaining = self.remaining.saturating_add(seconds);
    }

    /// Consume wall time. Paused clocks do not move.
    pub fn elapse(&mut self, seconds: i64) {
        if self.state == ClockState::Running {
            self.remaining = self.remaining.saturating_sub(seconds);
        }
    }
}
