use serde::{Deserialize, Serialize};

use crate::settings::{DarkMode, Phase, PomodoroSettings, TimerMode};
use crate::stats::PomodoroStats;
use crate::timer::CountdownStatus;

/// Mode and cycle bookkeeping owned by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub mode: TimerMode,
    pub phase: Phase,
    pub cycle_position: u32,
    pub settings: PomodoroSettings,
}

impl SessionState {
    pub fn new(mode: TimerMode, settings: PomodoroSettings) -> Self {
        Self {
            mode,
            phase: Phase::Work,
            cycle_position: 0,
            settings,
        }
    }
}

/// Display preferences carried alongside the timer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub dark_mode: DarkMode,
    pub ambient_sound_id: String,
    pub ambient_enabled: bool,
}

/// Aggregate counters shown next to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub today_count: u32,
    pub total_count: u64,
    pub current_streak: u32,
}

impl From<&PomodoroStats> for StatsSummary {
    fn from(stats: &PomodoroStats) -> Self {
        Self {
            today_count: stats.today_count,
            total_count: stats.total_count,
            current_streak: stats.current_streak,
        }
    }
}

/// Everything a presentation layer needs to draw the timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub mode: TimerMode,
    pub phase: Phase,
    pub cycle_position: u32,
    pub settings: PomodoroSettings,
    pub status: CountdownStatus,
    pub remaining_ms: u64,
    pub total_ms: u64,
    pub preferences: Preferences,
    pub stats: StatsSummary,
}

impl SessionSnapshot {
    /// Label for the current countdown.
    pub fn label(&self) -> &'static str {
        match self.mode {
            TimerMode::Free => "Timer",
            TimerMode::Cyclic => self.phase.label(),
        }
    }
}
