//! Session coordination: free vs. cyclic mode, Pomodoro phases and the
//! single live countdown.

mod coordinator;
mod phase;
mod state;

pub use coordinator::SessionCoordinator;
pub use phase::{completion_notice, peek_next_phase, PhaseTransition};
pub use state::{Preferences, SessionSnapshot, SessionState, StatsSummary};
