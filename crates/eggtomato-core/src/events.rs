use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::CompletionNotice;
use crate::settings::{Phase, PomodoroSettings, TimerMode};

/// Why a phase advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvanceReason {
    /// The countdown reached zero.
    Completed,
    /// The user skipped the rest of the phase.
    Skipped,
}

/// Every state change in the coordinator produces an Event.
/// Hosts log or print them; presentation uses the snapshot channel instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        phase: Option<Phase>,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        total_ms: u64,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero. `phase` is the phase that finished.
    TimerCompleted {
        mode: TimerMode,
        phase: Option<Phase>,
        notice: CompletionNotice,
        at: DateTime<Utc>,
    },
    PhaseAdvanced {
        from: Phase,
        to: Phase,
        cycle_position: u32,
        duration_ms: u64,
        reason: AdvanceReason,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        mode: TimerMode,
        total_ms: u64,
        at: DateTime<Utc>,
    },
    DurationChanged {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: PomodoroSettings,
        at: DateTime<Utc>,
    },
}
