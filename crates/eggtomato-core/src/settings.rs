//! User-facing settings and the small value types shared across the crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MS_PER_MINUTE: u64 = 60 * 1000;

/// Longest countdown accepted in free mode (3 hours).
pub const MAX_FREE_DURATION_MS: u64 = 180 * MS_PER_MINUTE;

/// Free-mode duration used until the user picks one.
pub const DEFAULT_FREE_DURATION_MS: u64 = 5 * MS_PER_MINUTE;

/// Quick-pick durations offered in free mode, in minutes.
pub const FREE_PRESETS_MIN: [u64; 6] = [1, 3, 5, 10, 15, 30];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// Single countdown of arbitrary length.
    Free,
    /// Pomodoro work/break cycle.
    #[default]
    Cyclic,
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerMode::Free => write!(f, "free"),
            TimerMode::Cyclic => write!(f, "cyclic"),
        }
    }
}

impl FromStr for TimerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" | "egg" => Ok(TimerMode::Free),
            "cyclic" | "pomodoro" | "tomato" => Ok(TimerMode::Cyclic),
            other => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("unknown mode '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "Focus Time",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DarkMode {
    #[default]
    Auto,
    Light,
    Dark,
}

impl FromStr for DarkMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(DarkMode::Auto),
            "light" => Ok(DarkMode::Light),
            "dark" => Ok(DarkMode::Dark),
            other => Err(ValidationError::InvalidValue {
                field: "dark_mode".into(),
                message: format!("expected auto, light or dark, got '{other}'"),
            }),
        }
    }
}

/// Pomodoro cycle configuration.
///
/// Read when a phase is initialized; edits never touch a countdown that is
/// already running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
    #[serde(default)]
    pub auto_start_breaks: bool,
}

fn default_work_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            sessions_before_long_break: default_sessions_before_long_break(),
            auto_start_breaks: false,
        }
    }
}

impl PomodoroSettings {
    /// Configured length of `phase` in milliseconds.
    pub fn phase_duration_ms(&self, phase: Phase) -> u64 {
        let minutes = match phase {
            Phase::Work => self.work_minutes,
            Phase::ShortBreak => self.short_break_minutes,
            Phase::LongBreak => self.long_break_minutes,
        };
        u64::from(minutes).saturating_mul(MS_PER_MINUTE)
    }

    /// Cycle length, never below one.
    pub fn cycle_length(&self) -> u32 {
        self.sessions_before_long_break.max(1)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("work_minutes", self.work_minutes, 1, 90)?;
        check_range("short_break_minutes", self.short_break_minutes, 1, 30)?;
        check_range("long_break_minutes", self.long_break_minutes, 1, 60)?;
        check_range(
            "sessions_before_long_break",
            self.sessions_before_long_break,
            1,
            12,
        )?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidSetting {
            field,
            value,
            min,
            max,
        })
    }
}

/// Accept a free-mode duration in `(0, 180 min]`.
pub fn validate_free_duration(duration_ms: u64) -> Result<u64, ValidationError> {
    if duration_ms == 0 || duration_ms > MAX_FREE_DURATION_MS {
        return Err(ValidationError::DurationOutOfRange {
            duration_ms,
            max_ms: MAX_FREE_DURATION_MS,
        });
    }
    Ok(duration_ms)
}

/// Duration of the free-mode quick pick of `minutes` length.
pub fn free_preset_ms(minutes: u64) -> Result<u64, ValidationError> {
    if FREE_PRESETS_MIN.contains(&minutes) {
        Ok(minutes * MS_PER_MINUTE)
    } else {
        Err(ValidationError::InvalidValue {
            field: "preset".into(),
            message: format!("no {minutes} minute preset, choose one of {FREE_PRESETS_MIN:?}"),
        })
    }
}

/// Parse `MM:SS` or a bare minute count into milliseconds.
///
/// Unparseable parts count as zero, so the result still needs
/// [`validate_free_duration`].
pub fn parse_duration_input(input: &str) -> u64 {
    let value = input.trim();
    let parse = |part: &str| part.trim().parse::<u64>().unwrap_or(0);
    let secs = match value.split_once(':') {
        Some((mins, secs)) => parse(mins).saturating_mul(60).saturating_add(parse(secs)),
        None => parse(value).saturating_mul(60),
    };
    secs.saturating_mul(1000)
}
