//! Terminal notification sink.

use std::io::Write;

use eggtomato_core::storage::NotificationsConfig;
use eggtomato_core::{CompletionNotice, NotificationSink};

/// Prints completion notices to stderr and rings the terminal bell.
pub struct TerminalSink {
    enabled: bool,
    chime: bool,
}

impl TerminalSink {
    pub fn new(config: &NotificationsConfig) -> Self {
        Self {
            enabled: config.enabled,
            chime: config.chime,
        }
    }
}

impl NotificationSink for TerminalSink {
    fn on_complete(&mut self, notice: &CompletionNotice) {
        tracing::info!(title = %notice.title, "countdown finished");
        if !self.enabled {
            return;
        }
        let mut err = std::io::stderr().lock();
        // Output failures are ignored; a missed notice must not stop the timer.
        let bell = if self.chime { "\x07" } else { "" };
        let _ = writeln!(err, "\n{bell}{} {}", notice.title, notice.body);
        let _ = err.flush();
    }
}
