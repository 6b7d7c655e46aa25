//! Notification and audio sink contract.
//!
//! The coordinator forwards every countdown tick and every completion to a
//! [`NotificationSink`]. Sinks are fire-and-forget: they return nothing and
//! the core never observes their failures.

use serde::{Deserialize, Serialize};

use crate::timer::CountdownStatus;

/// Human-readable text for a finished countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionNotice {
    pub title: String,
    pub body: String,
}

impl CompletionNotice {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

pub trait NotificationSink: Send {
    /// Called on every tick, including the immediate tick on start/pause/reset.
    fn on_tick(&mut self, _remaining_ms: u64, _status: CountdownStatus) {}

    /// Called once per finished countdown.
    fn on_complete(&mut self, notice: &CompletionNotice);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl NotificationSink for SilentSink {
    fn on_complete(&mut self, _notice: &CompletionNotice) {}
}
