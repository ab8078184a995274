//! Tick pacing.
//!
//! Keeps ticks on a fixed grid of deadlines. The caller waits until the
//! returned deadline before starting the next tick.

use embassy_time::{Duration, Instant};

/// Deadlines we may fall behind before the grid is moved to the present.
///
/// Falling further behind skips the backlog instead of running a burst of
/// catch-up ticks.
pub const MAX_DRIFT_TICKS: u32 = 2;

/// Timing of one paced tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDeadline {
    /// Start of the next tick.
    pub next_deadline: Instant,
    /// Time left until `next_deadline`, zero when behind schedule.
    pub sleep_duration: Duration,
}

/// Fixed rate tick scheduler with drift correction.
#[derive(Debug, Clone)]
pub struct TickPacer {
    tick: Duration,
    next_tick: Option<Instant>,
}

impl TickPacer {
    pub const fn new(tick: Duration) -> Self {
        Self {
            tick,
            next_tick: None,
        }
    }

    pub const fn tick(&self) -> Duration {
        self.tick
    }

    /// Register a tick started at `now` and return when the next one is due.
    pub fn advance(&mut self, now: Instant) -> TickDeadline {
        let current = match self.next_tick {
            Some(deadline) if now <= deadline + self.tick * MAX_DRIFT_TICKS => deadline,
            _ => now,
        };

        let next_deadline = current + self.tick;
        self.next_tick = Some(next_deadline);

        TickDeadline {
            next_deadline,
            sleep_duration: next_deadline
                .checked_duration_since(now)
                .unwrap_or(Duration::from_ticks(0)),
        }
    }

    /// Forget the grid; the next tick starts a new one.
    pub fn reset(&mut self) {
        self.next_tick = None;
    }
}
