//! Session coordinator.
//!
//! Owns the mode, the Pomodoro phase and cycle position, and the one live
//! [`CountdownEngine`]. Every countdown signal flows through here: ticks go
//! to the notification sink, completions pick the next phase and re-prime
//! the engine, and every change is published as a [`SessionSnapshot`].
//!
//! Like the engine, the coordinator has no thread of its own. The host calls
//! [`SessionCoordinator::tick`] on a fixed cadence while the countdown runs.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use super::phase::{completion_notice, peek_next_phase, PhaseTransition};
use super::state::{Preferences, SessionSnapshot, SessionState, StatsSummary};
use crate::clock::Clock;
use crate::error::ValidationError;
use crate::events::{AdvanceReason, Event};
use crate::notify::NotificationSink;
use crate::settings::{validate_free_duration, DarkMode, Phase, PomodoroSettings, TimerMode};
use crate::stats::PomodoroStats;
use crate::storage::Persistence;
use crate::timer::{CountdownEngine, CountdownEvent, CountdownStatus};

pub struct SessionCoordinator {
    persistence: Persistence,
    clock: Arc<dyn Clock>,
    sink: Box<dyn NotificationSink>,
    engine: CountdownEngine,
    state: SessionState,
    preferences: Preferences,
    stats: StatsSummary,
    publisher: watch::Sender<SessionSnapshot>,
}

impl SessionCoordinator {
    /// Build the coordinator from persisted configuration.
    ///
    /// Starts idle at the beginning of a work phase (cyclic) or with the last
    /// free-mode duration (free).
    pub fn new(
        persistence: Persistence,
        clock: Arc<dyn Clock>,
        sink: impl NotificationSink + 'static,
    ) -> Self {
        let state = SessionState::new(persistence.mode(), persistence.settings());
        let preferences = Preferences {
            dark_mode: persistence.dark_mode(),
            ambient_sound_id: persistence.ambient_sound_id(),
            ambient_enabled: persistence.ambient_enabled(),
        };
        let stats = StatsSummary::from(&persistence.stats(clock.today()));
        let duration = match state.mode {
            TimerMode::Free => persistence.free_duration_ms(),
            TimerMode::Cyclic => state.settings.phase_duration_ms(Phase::Work),
        };
        let engine = CountdownEngine::new(clock.clone(), duration);
        let initial = build_snapshot(&state, &engine, &preferences, stats);
        let (publisher, _) = watch::channel(initial);

        tracing::info!(mode = %state.mode, duration_ms = duration, "session initialized");

        Self {
            persistence,
            clock,
            sink: Box::new(sink),
            engine,
            state,
            preferences,
            stats,
            publisher,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.publisher.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        build_snapshot(&self.state, &self.engine, &self.preferences, self.stats)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.state.mode
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn cycle_position(&self) -> u32 {
        self.state.cycle_position
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.state.settings
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn status(&self) -> CountdownStatus {
        self.engine.status()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn remaining_ms(&self) -> u64 {
        self.engine.remaining_ms()
    }

    pub fn total_ms(&self) -> u64 {
        self.engine.total_ms()
    }

    /// The transition the next advance would make.
    pub fn peek_next(&self) -> PhaseTransition {
        peek_next_phase(
            self.state.phase,
            self.state.cycle_position,
            self.state.settings.cycle_length(),
        )
    }

    /// Current statistics, re-read with the day rollover applied.
    pub fn stats(&mut self) -> PomodoroStats {
        let stats = self.persistence.stats(self.clock.today());
        let summary = StatsSummary::from(&stats);
        if summary != self.stats {
            self.stats = summary;
            self.publish();
        }
        stats
    }

    // ── Countdown control ────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let tick = self.engine.start()?;
        self.forward(tick);
        self.publish();
        Some(Event::TimerStarted {
            mode: self.state.mode,
            phase: self.cyclic_phase(),
            remaining_ms: self.engine.remaining_ms(),
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        let tick = self.engine.pause()?;
        self.forward(tick);
        self.publish();
        Some(Event::TimerPaused {
            remaining_ms: self.engine.remaining_ms(),
            at: Utc::now(),
        })
    }

    /// Rewind the current countdown to its full length and stop.
    pub fn reset(&mut self) -> Event {
        let tick = self.engine.reset(None);
        self.forward(tick);
        self.publish();
        Event::TimerReset {
            total_ms: self.engine.total_ms(),
            at: Utc::now(),
        }
    }

    /// Call periodically while running.
    ///
    /// Returns the events caused by a completion, if this tick finished
    /// the countdown.
    pub fn tick(&mut self) -> Vec<Event> {
        let signals = self.engine.tick();
        if signals.is_empty() {
            return Vec::new();
        }
        let mut events = Vec::new();
        for signal in signals {
            match signal {
                CountdownEvent::Tick { .. } => self.forward(signal),
                CountdownEvent::Completed => events.extend(self.handle_completion()),
            }
        }
        self.publish();
        events
    }

    // ── Session control ──────────────────────────────────────────────

    /// Abandon the current phase and move to the next one, idle.
    ///
    /// Only meaningful in cyclic mode; a no-op in free mode.
    pub fn skip(&mut self) -> Option<Event> {
        if self.state.mode != TimerMode::Cyclic {
            return None;
        }
        let event = self.advance_phase(AdvanceReason::Skipped);
        self.sink
            .on_tick(self.engine.remaining_ms(), self.engine.status());
        self.publish();
        Some(event)
    }

    pub fn switch_mode(&mut self, mode: TimerMode) -> Option<Event> {
        if mode == self.state.mode {
            return None;
        }
        self.state.mode = mode;
        self.state.phase = Phase::Work;
        self.state.cycle_position = 0;
        self.persistence.set_mode(mode);

        let duration = match mode {
            TimerMode::Free => self.persistence.free_duration_ms(),
            TimerMode::Cyclic => self.state.settings.phase_duration_ms(Phase::Work),
        };
        self.replace_engine(duration);
        tracing::info!(%mode, duration_ms = duration, "mode switched");
        self.publish();
        Some(Event::ModeSwitched {
            mode,
            total_ms: duration,
            at: Utc::now(),
        })
    }

    /// Choose a free-mode duration in `(0, 180 min]`.
    ///
    /// The value is remembered for later sessions. In free mode the current
    /// countdown is stopped and rewound to the new length.
    pub fn set_free_duration(&mut self, duration_ms: u64) -> Result<Event, ValidationError> {
        let duration_ms = validate_free_duration(duration_ms)?;
        self.persistence.set_free_duration_ms(duration_ms);
        if self.state.mode == TimerMode::Free {
            let tick = self.engine.reset(Some(duration_ms));
            self.forward(tick);
            self.publish();
        }
        Ok(Event::DurationChanged {
            duration_ms,
            at: Utc::now(),
        })
    }

    /// Replace the Pomodoro settings.
    ///
    /// A running or paused countdown keeps its length; an idle cyclic
    /// countdown is re-primed from the new settings.
    pub fn update_settings(&mut self, settings: PomodoroSettings) -> Result<Event, ValidationError> {
        settings.validate()?;
        self.persistence.set_settings(&settings);
        self.state.settings = settings.clone();
        // A shorter cycle must not leave the position past its end.
        self.state.cycle_position = self
            .state
            .cycle_position
            .min(self.state.settings.cycle_length() - 1);
        if self.state.mode == TimerMode::Cyclic && self.engine.status() == CountdownStatus::Idle {
            let duration = self.state.settings.phase_duration_ms(self.state.phase);
            self.replace_engine(duration);
        }
        self.publish();
        Ok(Event::SettingsUpdated {
            settings,
            at: Utc::now(),
        })
    }

    // ── Preferences ──────────────────────────────────────────────────

    pub fn set_dark_mode(&mut self, mode: DarkMode) {
        self.preferences.dark_mode = mode;
        self.persistence.set_dark_mode(mode);
        self.publish();
    }

    pub fn set_ambient_sound(&mut self, id: &str) {
        self.preferences.ambient_sound_id = id.to_string();
        self.persistence.set_ambient_sound_id(id);
        self.publish();
    }

    /// Flip the ambient sound on or off, returning the new value.
    pub fn toggle_ambient(&mut self) -> bool {
        let enabled = !self.preferences.ambient_enabled;
        self.preferences.ambient_enabled = enabled;
        self.persistence.set_ambient_enabled(enabled);
        self.publish();
        enabled
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn handle_completion(&mut self) -> Vec<Event> {
        let mode = self.state.mode;
        let finished = self.state.phase;

        if mode == TimerMode::Free {
            let next = self.peek_next();
            let notice = completion_notice(mode, finished, &next);
            self.sink.on_complete(&notice);
            return vec![Event::TimerCompleted {
                mode,
                phase: None,
                notice,
                at: Utc::now(),
            }];
        }

        // Statistics and the notice both see the pre-advance position.
        if finished == Phase::Work {
            let stats = self.persistence.increment_stats(self.clock.today());
            self.stats = StatsSummary::from(&stats);
        }
        let next = self.peek_next();
        let notice = completion_notice(mode, finished, &next);
        self.sink.on_complete(&notice);

        let mut events = vec![Event::TimerCompleted {
            mode,
            phase: Some(finished),
            notice,
            at: Utc::now(),
        }];
        events.push(self.advance_phase(AdvanceReason::Completed));

        if finished == Phase::Work && self.state.settings.auto_start_breaks {
            events.extend(self.start());
        }
        events
    }

    fn advance_phase(&mut self, reason: AdvanceReason) -> Event {
        let from = self.state.phase;
        let next = self.peek_next();
        self.state.phase = next.phase;
        self.state.cycle_position = next.cycle_position;

        let duration = self.state.settings.phase_duration_ms(next.phase);
        self.replace_engine(duration);

        tracing::info!(
            from = ?from,
            to = ?next.phase,
            cycle_position = next.cycle_position,
            ?reason,
            "phase advanced"
        );
        Event::PhaseAdvanced {
            from,
            to: next.phase,
            cycle_position: next.cycle_position,
            duration_ms: duration,
            reason,
            at: Utc::now(),
        }
    }

    /// Destroy the live countdown and prime a fresh one.
    fn replace_engine(&mut self, duration_ms: u64) {
        let fresh = CountdownEngine::new(self.clock.clone(), duration_ms);
        std::mem::replace(&mut self.engine, fresh).destroy();
    }

    fn forward(&mut self, signal: CountdownEvent) {
        if let CountdownEvent::Tick {
            remaining_ms,
            status,
        } = signal
        {
            self.sink.on_tick(remaining_ms, status);
        }
    }

    fn cyclic_phase(&self) -> Option<Phase> {
        match self.state.mode {
            TimerMode::Cyclic => Some(self.state.phase),
            TimerMode::Free => None,
        }
    }

    fn publish(&self) {
        self.publisher.send_replace(self.snapshot());
    }
}

fn build_snapshot(
    state: &SessionState,
    engine: &CountdownEngine,
    preferences: &Preferences,
    stats: StatsSummary,
) -> SessionSnapshot {
    SessionSnapshot {
        mode: state.mode,
        phase: state.phase,
        cycle_position: state.cycle_position,
        settings: state.settings.clone(),
        status: engine.status(),
        remaining_ms: engine.remaining_ms(),
        total_ms: engine.total_ms(),
        preferences: preferences.clone(),
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::notify::{CompletionNotice, SilentSink};
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()))
    }

    fn coordinator(clock: &Arc<ManualClock>) -> SessionCoordinator {
        SessionCoordinator::new(Persistence::new(MemoryStore::new()), clock.clone(), SilentSink)
    }

    #[derive(Clone, Default)]
    struct Recorder {
        ticks: Arc<Mutex<Vec<(u64, CountdownStatus)>>>,
        notices: Arc<Mutex<Vec<CompletionNotice>>>,
    }

    impl NotificationSink for Recorder {
        fn on_tick(&mut self, remaining_ms: u64, status: CountdownStatus) {
            self.ticks.lock().unwrap().push((remaining_ms, status));
        }
        fn on_complete(&mut self, notice: &CompletionNotice) {
            self.notices.lock().unwrap().push(notice.clone());
        }
    }

    fn run_to_completion(c: &mut SessionCoordinator, clock: &ManualClock) -> Vec<Event> {
        c.start();
        clock.advance_ms(c.remaining_ms());
        c.tick()
    }

    #[test]
    fn starts_idle_on_work_phase() {
        let clock = clock();
        let c = coordinator(&clock);
        assert_eq!(c.mode(), TimerMode::Cyclic);
        assert_eq!(c.phase(), Phase::Work);
        assert_eq!(c.cycle_position(), 0);
        assert_eq!(c.status(), CountdownStatus::Idle);
        assert_eq!(c.remaining_ms(), 25 * 60 * 1000);
    }

    #[test]
    fn work_completion_moves_to_short_break_idle() {
        let clock = clock();
        let mut c = coordinator(&clock);
        let events = run_to_completion(&mut c, &clock);

        assert!(matches!(events[0], Event::TimerCompleted { phase: Some(Phase::Work), .. }));
        assert!(matches!(
            events[1],
            Event::PhaseAdvanced {
                to: Phase::ShortBreak,
                cycle_position: 1,
                reason: AdvanceReason::Completed,
                ..
            }
        ));
        assert_eq!(c.phase(), Phase::ShortBreak);
        assert_eq!(c.status(), CountdownStatus::Idle);
        assert_eq!(c.remaining_ms(), 5 * 60 * 1000);
    }

    #[test]
    fn completion_records_stats_once() {
        let clock = clock();
        let mut c = coordinator(&clock);
        run_to_completion(&mut c, &clock);
        // Further ticks on the fresh idle engine change nothing.
        clock.advance_ms(10_000);
        assert!(c.tick().is_empty());

        let stats = c.stats();
        assert_eq!(stats.today_count, 1);
        assert_eq!(stats.total_count, 1);
        assert_eq!(c.snapshot().stats.today_count, 1);
    }

    #[test]
    fn break_completion_does_not_count() {
        let clock = clock();
        let mut c = coordinator(&clock);
        c.skip();
        assert_eq!(c.phase(), Phase::ShortBreak);
        run_to_completion(&mut c, &clock);
        assert_eq!(c.phase(), Phase::Work);
        assert_eq!(c.cycle_position(), 1);
        assert_eq!(c.stats().total_count, 0);
    }

    #[test]
    fn skip_discards_running_countdown() {
        let clock = clock();
        let mut c = coordinator(&clock);
        c.start();
        clock.advance_ms(60_000);
        c.tick();

        let event = c.skip().unwrap();
        assert!(matches!(
            event,
            Event::PhaseAdvanced {
                reason: AdvanceReason::Skipped,
                ..
            }
        ));
        assert_eq!(c.status(), CountdownStatus::Idle);
        assert_eq!(c.remaining_ms(), 5 * 60 * 1000);

        // The old countdown no longer ticks.
        clock.advance_ms(10 * 60 * 1000);
        assert!(c.tick().is_empty());
        assert_eq!(c.remaining_ms(), 5 * 60 * 1000);
    }

    #[test]
    fn skip_in_free_mode_is_noop() {
        let clock = clock();
        let mut c = coordinator(&clock);
        c.switch_mode(TimerMode::Free);
        assert!(c.skip().is_none());
        assert_eq!(c.phase(), Phase::Work);
    }

    #[test]
    fn mode_switch_resets_cycle() {
        let clock = clock();
        let mut c = coordinator(&clock);
        run_to_completion(&mut c, &clock);
        c.skip();
        assert_eq!(c.cycle_position(), 1);
        c.start();

        assert!(c.switch_mode(TimerMode::Free).is_some());
        assert_eq!(c.status(), CountdownStatus::Idle);
        assert_eq!(c.remaining_ms(), 5 * 60 * 1000);

        c.switch_mode(TimerMode::Cyclic);
        assert_eq!(c.phase(), Phase::Work);
        assert_eq!(c.cycle_position(), 0);
        assert_eq!(c.remaining_ms(), 25 * 60 * 1000);
        assert!(c.switch_mode(TimerMode::Cyclic).is_none());
    }

    #[test]
    fn free_duration_range_is_enforced() {
        let clock = clock();
        let mut c = coordinator(&clock);
        c.switch_mode(TimerMode::Free);

        assert!(c.set_free_duration(0).is_err());
        assert!(c.set_free_duration(180 * 60 * 1000 + 1).is_err());
        assert_eq!(c.total_ms(), 5 * 60 * 1000);

        c.set_free_duration(90_000).unwrap();
        assert_eq!(c.total_ms(), 90_000);
        assert_eq!(c.remaining_ms(), 90_000);
    }

    #[test]
    fn free_completion_notifies_and_stays_in_free_mode() {
        let clock = clock();
        let recorder = Recorder::default();
        let mut c = SessionCoordinator::new(
            Persistence::new(MemoryStore::new()),
            clock.clone(),
            recorder.clone(),
        );
        c.switch_mode(TimerMode::Free);
        c.set_free_duration(1_000).unwrap();
        let events = run_to_completion(&mut c, &clock);

        assert_eq!(events.len(), 1);
        assert_eq!(c.remaining_ms(), 0);
        assert_eq!(c.status(), CountdownStatus::Idle);
        assert_eq!(recorder.notices.lock().unwrap()[0].title, "Timer Complete!");
        assert_eq!(c.stats().total_count, 0);
    }

    #[test]
    fn sink_sees_immediate_ticks() {
        let clock = clock();
        let recorder = Recorder::default();
        let mut c = SessionCoordinator::new(
            Persistence::new(MemoryStore::new()),
            clock.clone(),
            recorder.clone(),
        );
        c.start();
        c.pause();
        c.pause();
        let ticks = recorder.ticks.lock().unwrap().clone();
        assert_eq!(
            ticks,
            vec![
                (25 * 60 * 1000, CountdownStatus::Running),
                (25 * 60 * 1000, CountdownStatus::Paused),
            ]
        );
    }

    #[test]
    fn settings_apply_only_when_idle() {
        let clock = clock();
        let mut c = coordinator(&clock);
        c.start();
        let settings = PomodoroSettings {
            work_minutes: 50,
            ..PomodoroSettings::default()
        };
        c.update_settings(settings.clone()).unwrap();
        assert_eq!(c.total_ms(), 25 * 60 * 1000);
        assert_eq!(c.status(), CountdownStatus::Running);

        c.reset();
        c.update_settings(settings).unwrap();
        assert_eq!(c.total_ms(), 50 * 60 * 1000);
    }

    #[test]
    fn shorter_cycle_clamps_position() {
        let clock = clock();
        let mut c = coordinator(&clock);
        // work -> short -> work ... until three work phases were skipped
        for _ in 0..6 {
            c.skip();
        }
        assert_eq!(c.phase(), Phase::Work);
        assert_eq!(c.cycle_position(), 3);

        c.update_settings(PomodoroSettings {
            sessions_before_long_break: 2,
            ..PomodoroSettings::default()
        })
        .unwrap();
        assert_eq!(c.cycle_position(), 1);
        assert_eq!(c.snapshot().cycle_position, 1);

        // The next work phase still closes the shortened cycle.
        c.skip();
        assert_eq!(c.phase(), Phase::LongBreak);
        assert_eq!(c.cycle_position(), 0);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let clock = clock();
        let mut c = coordinator(&clock);
        let bad = PomodoroSettings {
            long_break_minutes: 0,
            ..PomodoroSettings::default()
        };
        assert!(c.update_settings(bad).is_err());
        assert_eq!(c.settings(), &PomodoroSettings::default());
    }

    #[test]
    fn auto_start_breaks_starts_the_break() {
        let clock = clock();
        let mut c = coordinator(&clock);
        c.update_settings(PomodoroSettings {
            auto_start_breaks: true,
            ..PomodoroSettings::default()
        })
        .unwrap();
        let events = run_to_completion(&mut c, &clock);
        assert!(matches!(events.last(), Some(Event::TimerStarted { .. })));
        assert_eq!(c.phase(), Phase::ShortBreak);
        assert_eq!(c.status(), CountdownStatus::Running);

        // Breaks never auto-start the next work phase.
        clock.advance_ms(c.remaining_ms());
        c.tick();
        assert_eq!(c.phase(), Phase::Work);
        assert_eq!(c.status(), CountdownStatus::Idle);
    }

    #[test]
    fn subscribers_observe_snapshots() {
        let clock = clock();
        let mut c = coordinator(&clock);
        let mut rx = c.subscribe();
        assert!(!rx.has_changed().unwrap());

        c.start();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().status, CountdownStatus::Running);

        clock.advance_ms(1_500);
        c.tick();
        assert_eq!(rx.borrow_and_update().remaining_ms, 25 * 60 * 1000 - 1_500);

        c.toggle_ambient();
        assert!(rx.borrow_and_update().preferences.ambient_enabled);
    }

    #[test]
    fn preferences_persist() {
        let clock = clock();
        let mut c = coordinator(&clock);
        c.set_dark_mode(DarkMode::Dark);
        c.set_ambient_sound("rain");
        assert!(c.toggle_ambient());
        assert!(!c.toggle_ambient());
        assert_eq!(c.preferences().dark_mode, DarkMode::Dark);
        assert_eq!(c.preferences().ambient_sound_id, "rain");
    }
}
