//! Daily work-phase counters and streak tracking.
//!
//! The record is persisted as JSON in the shape
//! `{ todayCount, todayDate, totalCount, currentStreak, lastSessionDate, history }`.
//! Dates are local calendar dates supplied by the caller.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroStats {
    #[serde(default)]
    pub today_count: u32,
    pub today_date: NaiveDate,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub current_streak: u32,
    /// Day of the most recent completed work phase, if any.
    #[serde(default, deserialize_with = "lenient_date")]
    pub last_session_date: Option<NaiveDate>,
    #[serde(default)]
    pub history: BTreeMap<NaiveDate, u32>,
}

impl PomodoroStats {
    /// Empty record anchored at `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today_count: 0,
            today_date: today,
            total_count: 0,
            current_streak: 0,
            last_session_date: None,
            history: BTreeMap::new(),
        }
    }

    /// Apply the day-rollover rule as of `today`.
    ///
    /// On a new day the daily count restarts and the streak is dropped
    /// unless the last session was yesterday or today.
    pub fn roll_over(&mut self, today: NaiveDate) {
        if self.today_date == today {
            return;
        }
        self.today_count = 0;
        self.today_date = today;

        let yesterday = today.pred_opt();
        let continues = match self.last_session_date {
            Some(last) => last == today || Some(last) == yesterday,
            None => false,
        };
        if !continues {
            self.current_streak = 0;
        }
    }

    /// Record one completed work phase on `today`.
    pub fn record_completion(&mut self, today: NaiveDate) {
        self.roll_over(today);

        self.today_count = self.today_count.saturating_add(1);
        self.total_count = self.total_count.saturating_add(1);
        if self.last_session_date != Some(today) {
            self.current_streak = self.current_streak.saturating_add(1);
        }
        self.last_session_date = Some(today);
        *self.history.entry(today).or_insert(0) += 1;
    }

    /// Completed sessions on `date`.
    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.history.get(&date).copied().unwrap_or(0)
    }
}

/// Older records store a missing date as an empty string.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
}
