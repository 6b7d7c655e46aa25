mod engine;
mod format;

pub use engine::{CountdownEngine, CountdownEvent, CountdownStatus, DEFAULT_TICK_INTERVAL_MS};
pub use format::{format_time, format_time_long, progress};
