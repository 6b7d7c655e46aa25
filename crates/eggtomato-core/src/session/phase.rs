//! Pomodoro phase transitions.
//!
//! [`peek_next_phase`] is the only place the work → break → work cycle is
//! computed. Both the coordinator's advance and the completion message use
//! it, so the two cannot disagree.

use serde::{Deserialize, Serialize};

use crate::notify::CompletionNotice;
use crate::settings::{Phase, TimerMode};

/// Phase and cycle position after an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub phase: Phase,
    pub cycle_position: u32,
}

impl PhaseTransition {
    /// True when this advance starts a long break and closes the cycle.
    pub fn completes_cycle(&self) -> bool {
        self.phase == Phase::LongBreak
    }
}

/// Compute the phase that follows `phase`.
///
/// Work increments the cycle position; reaching `cycle_length` starts a long
/// break and rewinds the position to zero. Breaks always lead back to work
/// with the position unchanged.
pub fn peek_next_phase(phase: Phase, cycle_position: u32, cycle_length: u32) -> PhaseTransition {
    match phase {
        Phase::Work => {
            let position = cycle_position.saturating_add(1);
            if position >= cycle_length.max(1) {
                PhaseTransition {
                    phase: Phase::LongBreak,
                    cycle_position: 0,
                }
            } else {
                PhaseTransition {
                    phase: Phase::ShortBreak,
                    cycle_position: position,
                }
            }
        }
        Phase::ShortBreak | Phase::LongBreak => PhaseTransition {
            phase: Phase::Work,
            cycle_position,
        },
    }
}

/// Text shown when a countdown finishes.
///
/// `finished` and `next` are ignored in free mode.
pub fn completion_notice(mode: TimerMode, finished: Phase, next: &PhaseTransition) -> CompletionNotice {
    match mode {
        TimerMode::Free => CompletionNotice::new("Timer Complete!", "Your timer has finished."),
        TimerMode::Cyclic => match finished {
            Phase::Work if next.completes_cycle() => {
                CompletionNotice::new("Great work!", "Time for a long break.")
            }
            Phase::Work => CompletionNotice::new("Pomodoro complete!", "Time for a short break."),
            Phase::ShortBreak | Phase::LongBreak => {
                CompletionNotice::new("Break over!", "Ready for another focus session?")
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn work_goes_to_short_break() {
        let next = peek_next_phase(Phase::Work, 0, 4);
        assert_eq!(next.phase, Phase::ShortBreak);
        assert_eq!(next.cycle_position, 1);
    }

    #[test]
    fn last_work_of_cycle_goes_to_long_break() {
        let next = peek_next_phase(Phase::Work, 3, 4);
        assert_eq!(next.phase, Phase::LongBreak);
        assert_eq!(next.cycle_position, 0);
        assert!(next.completes_cycle());
    }

    #[test]
    fn cycle_of_one_always_long_breaks() {
        let next = peek_next_phase(Phase::Work, 0, 1);
        assert_eq!(next.phase, Phase::LongBreak);
        // A zero-length cycle behaves like one.
        assert_eq!(peek_next_phase(Phase::Work, 0, 0), next);
    }

    #[test]
    fn shrunken_cycle_still_long_breaks() {
        // Position left over from a longer cycle.
        let next = peek_next_phase(Phase::Work, 5, 2);
        assert_eq!(next.phase, Phase::LongBreak);
        assert_eq!(next.cycle_position, 0);
    }

    #[test]
    fn notices_follow_the_transition() {
        let long = peek_next_phase(Phase::Work, 3, 4);
        assert_eq!(
            completion_notice(TimerMode::Cyclic, Phase::Work, &long).title,
            "Great work!"
        );
        let short = peek_next_phase(Phase::Work, 1, 4);
        assert_eq!(
            completion_notice(TimerMode::Cyclic, Phase::Work, &short).body,
            "Time for a short break."
        );
        let back = peek_next_phase(Phase::ShortBreak, 1, 4);
        assert_eq!(
            completion_notice(TimerMode::Cyclic, Phase::ShortBreak, &back).title,
            "Break over!"
        );
        assert_eq!(
            completion_notice(TimerMode::Free, Phase::Work, &back).title,
            "Timer Complete!"
        );
    }

    fn any_break() -> impl Strategy<Value = Phase> {
        prop_oneof![Just(Phase::ShortBreak), Just(Phase::LongBreak)]
    }

    proptest! {
        #[test]
        fn breaks_return_to_work_unchanged(
            phase in any_break(),
            position in 0u32..12,
            length in 1u32..12,
        ) {
            let next = peek_next_phase(phase, position, length);
            prop_assert_eq!(next.phase, Phase::Work);
            prop_assert_eq!(next.cycle_position, position);
        }

        #[test]
        fn work_position_stays_in_cycle(position in 0u32..12, length in 1u32..12) {
            prop_assume!(position < length);
            let next = peek_next_phase(Phase::Work, position, length);
            prop_assert!(next.cycle_position < length);
            if position == length - 1 {
                prop_assert_eq!(next.phase, Phase::LongBreak);
                prop_assert_eq!(next.cycle_position, 0);
            } else {
                prop_assert_eq!(next.phase, Phase::ShortBreak);
                prop_assert_eq!(next.cycle_position, position + 1);
            }
        }
    }
}
