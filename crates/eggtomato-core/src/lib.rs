//! # Eggtomato Core Library
//!
//! This library provides the timer and session logic for Eggtomato, a
//! dual-mode countdown timer: a free-running "egg timer" and a Pomodoro
//! work/break cycle. Hosts (the CLI today) drive it from their own event loop.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: A wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()` while it runs
//! - **Session Coordinator**: Owns the mode, Pomodoro phase and cycle position,
//!   reacts to completions and publishes snapshots to subscribers
//! - **Storage**: SQLite key-value persistence and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: Single countdown state machine
//! - [`SessionCoordinator`]: Mode and phase cycling over one live countdown
//! - [`Persistence`]: Typed, failure-tolerant access to persisted values
//! - [`Config`]: Host configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod session;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, StorageError, ValidationError};
pub use events::{AdvanceReason, Event};
pub use notify::{CompletionNotice, NotificationSink, SilentSink};
pub use session::{PhaseTransition, SessionCoordinator, SessionSnapshot, SessionState};
pub use settings::{DarkMode, Phase, PomodoroSettings, TimerMode};
pub use stats::PomodoroStats;
pub use storage::{Config, Database, KeyValueStore, MemoryStore, Persistence};
pub use timer::{format_time, CountdownEngine, CountdownEvent, CountdownStatus};
