//! Countdown engine implementation.
//!
//! The countdown engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically
//! while the countdown is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused -> Running)* -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new(clock, 25 * 60 * 1000);
//! engine.start();
//! // In a loop, every ~100ms:
//! for event in engine.tick() { /* render / handle completion */ }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;

/// Default tick cadence for hosts. Affects display smoothness only.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownStatus {
    Idle,
    Running,
    Paused,
}

impl fmt::Display for CountdownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountdownStatus::Idle => write!(f, "idle"),
            CountdownStatus::Running => write!(f, "running"),
            CountdownStatus::Paused => write!(f, "paused"),
        }
    }
}

/// Signals emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// Remaining time changed or the status changed.
    Tick {
        remaining_ms: u64,
        status: CountdownStatus,
    },
    /// The countdown reached zero. Emitted once per countdown.
    Completed,
}

/// Single countdown timer.
///
/// Operates on wall-clock deltas -- no internal thread.
/// `tick_anchor_ms` is present exactly while the status is `Running`.
pub struct CountdownEngine {
    clock: Arc<dyn Clock>,
    remaining_ms: u64,
    total_ms: u64,
    status: CountdownStatus,
    /// Clock reading at the last elapsed-time computation.
    tick_anchor_ms: Option<u64>,
}

impl fmt::Debug for CountdownEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("remaining_ms", &self.remaining_ms)
            .field("total_ms", &self.total_ms)
            .field("status", &self.status)
            .field("ticking", &self.tick_anchor_ms.is_some())
            .finish()
    }
}

impl CountdownEngine {
    /// Create an idle countdown primed with `duration_ms`.
    pub fn new(clock: Arc<dyn Clock>, duration_ms: u64) -> Self {
        Self {
            clock,
            remaining_ms: duration_ms,
            total_ms: duration_ms,
            status: CountdownStatus::Idle,
            tick_anchor_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    pub fn status(&self) -> CountdownStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == CountdownStatus::Running
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Load a new duration and return to idle. Emits nothing.
    pub fn prime(&mut self, duration_ms: u64) {
        self.cancel();
        self.total_ms = duration_ms;
        self.remaining_ms = duration_ms;
        self.status = CountdownStatus::Idle;
    }

    /// Start or resume. A finished countdown restarts from its total.
    pub fn start(&mut self) -> Option<CountdownEvent> {
        if self.status == CountdownStatus::Running {
            return None;
        }
        if self.remaining_ms == 0 {
            self.remaining_ms = self.total_ms;
        }
        self.status = CountdownStatus::Running;
        self.tick_anchor_ms = Some(self.clock.now_ms());
        tracing::debug!(remaining_ms = self.remaining_ms, "countdown started");
        Some(self.tick_event())
    }

    pub fn pause(&mut self) -> Option<CountdownEvent> {
        if self.status != CountdownStatus::Running {
            return None;
        }
        self.cancel();
        self.status = CountdownStatus::Paused;
        tracing::debug!(remaining_ms = self.remaining_ms, "countdown paused");
        Some(self.tick_event())
    }

    /// Stop and rewind to the total, optionally replacing it first.
    pub fn reset(&mut self, new_duration_ms: Option<u64>) -> CountdownEvent {
        self.cancel();
        if let Some(duration) = new_duration_ms {
            self.total_ms = duration;
        }
        self.remaining_ms = self.total_ms;
        self.status = CountdownStatus::Idle;
        self.tick_event()
    }

    /// Call periodically while running.
    ///
    /// Returns a `Tick` for every call on a running countdown, followed by
    /// `Completed` on the call that brings the remaining time to zero.
    /// Calls on an idle or paused countdown return nothing.
    pub fn tick(&mut self) -> Vec<CountdownEvent> {
        let Some(last) = self.tick_anchor_ms else {
            return Vec::new();
        };
        let now = self.clock.now_ms();
        let elapsed = now.saturating_sub(last);
        self.tick_anchor_ms = Some(now);
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);

        let mut events = vec![self.tick_event()];
        if self.remaining_ms == 0 {
            self.cancel();
            self.status = CountdownStatus::Idle;
            tracing::debug!(total_ms = self.total_ms, "countdown completed");
            events.push(CountdownEvent::Completed);
        }
        events
    }

    /// Release the engine. It cannot be used afterwards.
    pub fn destroy(mut self) {
        self.cancel();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn cancel(&mut self) {
        self.tick_anchor_ms = None;
    }

    fn tick_event(&self) -> CountdownEvent {
        CountdownEvent::Tick {
            remaining_ms: self.remaining_ms,
            status: self.status,
        }
    }
}
