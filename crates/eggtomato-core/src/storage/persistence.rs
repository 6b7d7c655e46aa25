//! Typed access to persisted preferences and statistics.
//!
//! Every read degrades to a built-in default when the value is missing,
//! unparseable or the backend fails. Writes that fail are logged and dropped.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KeyValueStore;
use crate::settings::{
    validate_free_duration, DarkMode, PomodoroSettings, TimerMode, DEFAULT_FREE_DURATION_MS,
};
use crate::stats::PomodoroStats;

/// Fixed set of persistence keys.
pub mod keys {
    pub const CURRENT_MODE: &str = "timer_mode";
    pub const FREE_LAST_DURATION: &str = "free_last_duration";
    pub const POMODORO_SETTINGS: &str = "pomodoro_settings";
    pub const POMODORO_STATS: &str = "pomodoro_stats";
    pub const DARK_MODE: &str = "dark_mode";
    pub const AMBIENT_SOUND: &str = "ambient_sound_id";
    pub const AMBIENT_ENABLED: &str = "ambient_enabled";
}

pub const DEFAULT_AMBIENT_SOUND: &str = "none";

pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Read `key`, falling back to `default` on any failure.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.store.kv_get(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key, error = %e, "unreadable persisted value, using default");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed, using default");
                default
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to encode value");
                return;
            }
        };
        if let Err(e) = self.store.kv_set(key, &raw) {
            tracing::warn!(key, error = %e, "storage write failed");
        }
    }

    // ── Mode ─────────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.get(keys::CURRENT_MODE, TimerMode::default())
    }

    pub fn set_mode(&self, mode: TimerMode) {
        self.set(keys::CURRENT_MODE, &mode);
    }

    // ── Free mode ────────────────────────────────────────────────────

    pub fn free_duration_ms(&self) -> u64 {
        let stored = self.get(keys::FREE_LAST_DURATION, DEFAULT_FREE_DURATION_MS);
        validate_free_duration(stored).unwrap_or(DEFAULT_FREE_DURATION_MS)
    }

    pub fn set_free_duration_ms(&self, duration_ms: u64) {
        self.set(keys::FREE_LAST_DURATION, &duration_ms);
    }

    // ── Pomodoro settings ────────────────────────────────────────────

    pub fn settings(&self) -> PomodoroSettings {
        let settings = self.get(keys::POMODORO_SETTINGS, PomodoroSettings::default());
        match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "persisted settings out of range, using defaults");
                PomodoroSettings::default()
            }
        }
    }

    pub fn set_settings(&self, settings: &PomodoroSettings) {
        self.set(keys::POMODORO_SETTINGS, settings);
    }

    // ── Statistics ───────────────────────────────────────────────────

    /// Current statistics with the day-rollover rule applied.
    pub fn stats(&self, today: NaiveDate) -> PomodoroStats {
        let mut stats = self.get(keys::POMODORO_STATS, PomodoroStats::new(today));
        stats.roll_over(today);
        stats
    }

    /// Count one completed work phase and persist the result.
    pub fn increment_stats(&self, today: NaiveDate) -> PomodoroStats {
        let mut stats = self.stats(today);
        stats.record_completion(today);
        self.set(keys::POMODORO_STATS, &stats);
        tracing::info!(
            today = stats.today_count,
            total = stats.total_count,
            streak = stats.current_streak,
            "work session recorded"
        );
        stats
    }

    // ── Preferences ──────────────────────────────────────────────────

    pub fn dark_mode(&self) -> DarkMode {
        self.get(keys::DARK_MODE, DarkMode::default())
    }

    pub fn set_dark_mode(&self, mode: DarkMode) {
        self.set(keys::DARK_MODE, &mode);
    }

    pub fn ambient_sound_id(&self) -> String {
        self.get(keys::AMBIENT_SOUND, DEFAULT_AMBIENT_SOUND.to_string())
    }

    pub fn set_ambient_sound_id(&self, id: &str) {
        self.set(keys::AMBIENT_SOUND, id);
    }

    pub fn ambient_enabled(&self) -> bool {
        self.get(keys::AMBIENT_ENABLED, false)
    }

    pub fn set_ambient_enabled(&self, enabled: bool) {
        self.set(keys::AMBIENT_ENABLED, &enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn kv_get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Locked)
        }
        fn kv_set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }
    }

    #[test]
    fn defaults_when_empty() {
        let p = Persistence::new(MemoryStore::new());
        assert_eq!(p.mode(), TimerMode::Cyclic);
        assert_eq!(p.free_duration_ms(), 300_000);
        assert_eq!(p.settings(), PomodoroSettings::default());
        assert_eq!(p.dark_mode(), DarkMode::Auto);
        assert_eq!(p.ambient_sound_id(), "none");
        assert!(!p.ambient_enabled());
    }

    #[test]
    fn saves_and_retrieves_settings() {
        let p = Persistence::new(MemoryStore::new());
        let settings = PomodoroSettings {
            work_minutes: 50,
            ..PomodoroSettings::default()
        };
        p.set_settings(&settings);
        assert_eq!(p.settings(), settings);
    }

    #[test]
    fn persists_free_duration_and_mode() {
        let p = Persistence::new(MemoryStore::new());
        p.set_free_duration_ms(12_345);
        p.set_mode(TimerMode::Free);
        assert_eq!(p.free_duration_ms(), 12_345);
        assert_eq!(p.mode(), TimerMode::Free);
    }

    #[test]
    fn corrupt_values_degrade_to_defaults() {
        let store = MemoryStore::new();
        store.kv_set(keys::POMODORO_SETTINGS, "{not json").unwrap();
        store.kv_set(keys::CURRENT_MODE, "\"sideways\"").unwrap();
        store.kv_set(keys::FREE_LAST_DURATION, "999999999999").unwrap();
        store.kv_set(keys::POMODORO_STATS, "[]").unwrap();
        let p = Persistence::new(store);
        assert_eq!(p.settings(), PomodoroSettings::default());
        assert_eq!(p.mode(), TimerMode::Cyclic);
        assert_eq!(p.free_duration_ms(), 300_000);
        assert_eq!(p.stats(day(1)), PomodoroStats::new(day(1)));
    }

    #[test]
    fn out_of_range_settings_degrade_to_defaults() {
        let store = MemoryStore::new();
        store
            .kv_set(keys::POMODORO_SETTINGS, r#"{"sessionsBeforeLongBreak":0}"#)
            .unwrap();
        let p = Persistence::new(store);
        assert_eq!(p.settings(), PomodoroSettings::default());
    }

    #[test]
    fn broken_backend_never_panics() {
        let p = Persistence::new(BrokenStore);
        assert_eq!(p.mode(), TimerMode::Cyclic);
        p.set_mode(TimerMode::Free);
        let stats = p.increment_stats(day(2));
        assert_eq!(stats.total_count, 1);
    }

    #[test]
    fn stats_roll_over_on_read() {
        let p = Persistence::new(MemoryStore::new());
        p.increment_stats(day(1));
        p.increment_stats(day(1));

        let stats = p.stats(day(2));
        assert_eq!(stats.today_count, 0);
        assert_eq!(stats.today_date, day(2));
        assert_eq!(stats.total_count, 2);
        assert_eq!(stats.current_streak, 1);

        let stats = p.increment_stats(day(2));
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.history.len(), 2);
    }
}
