pub mod config;
pub mod prefs;
pub mod run;
pub mod settings;
pub mod stats;

use eggtomato_core::{Database, Persistence};

/// Open the on-disk store behind every command.
pub fn open_persistence() -> Result<Persistence, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(Persistence::new(db))
}
