//! Time sources.
//!
//! The engine measures elapsed time as wall-clock deltas and statistics are
//! keyed by local calendar day. Both come from a [`Clock`] so that hosts use
//! the system time and tests advance time by hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{Local, NaiveDate};

/// Source of wall-clock milliseconds and the current local date.
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary fixed origin. Only deltas are used.
    fn now_ms(&self) -> u64;

    /// The current calendar date in the user's local timezone.
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually driven clock for tests and simulations.
#[derive(Debug)]
pub struct ManualClock {
    now_ms: AtomicU64,
    today: Mutex<NaiveDate>,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            now_ms: AtomicU64::new(0),
            today: Mutex::new(today),
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set_today(&self, date: NaiveDate) {
        if let Ok(mut today) = self.today.lock() {
            *today = date;
        }
    }

    /// Move the calendar forward by `days`.
    pub fn advance_days(&self, days: u64) {
        if let Ok(mut today) = self.today.lock() {
            *today = *today + chrono::Days::new(days);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    fn today(&self) -> NaiveDate {
        match self.today.lock() {
            Ok(today) => *today,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
