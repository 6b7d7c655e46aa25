//! Statistics for completed work phases.
//!
//! Counts are kept per local calendar day, with an all-time total and a
//! streak of consecutive days that contain at least one completed session.

mod daily;

pub use daily::PomodoroStats;
