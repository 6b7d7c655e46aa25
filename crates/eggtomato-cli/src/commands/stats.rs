use chrono::Days;
use clap::Subcommand;
use eggtomato_core::{Clock, SystemClock};
use serde_json::json;

use super::open_persistence;

/// Longest history window, about ten years.
const MAX_HISTORY_DAYS: u64 = 3650;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today,
    /// All-time stats
    All,
    /// Completed work sessions per day
    History {
        /// Number of days to show, ending today (at most 3650)
        #[arg(long, default_value = "7")]
        days: u64,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let persistence = open_persistence()?;
    let today = SystemClock.today();
    let stats = persistence.stats(today);

    match action {
        StatsAction::Today => {
            let summary = json!({
                "date": today,
                "todayCount": stats.today_count,
                "currentStreak": stats.current_streak,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::All => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::History { days } => {
            let rows: Vec<_> = (0..days.clamp(1, MAX_HISTORY_DAYS))
                .rev()
                .filter_map(|back| today.checked_sub_days(Days::new(back)))
                .map(|date| json!({ "date": date, "count": stats.count_on(date) }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
