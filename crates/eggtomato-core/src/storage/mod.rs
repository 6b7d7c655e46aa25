mod config;
pub mod database;
mod memory;
mod persistence;

pub use config::{Config, NotificationsConfig, TimerConfig, UiConfig};
pub use database::Database;
pub use memory::MemoryStore;
pub use persistence::{keys, Persistence};

use std::path::PathBuf;

use crate::error::StorageError;

/// Synchronous string key-value store.
///
/// Values are opaque strings; [`Persistence`] layers JSON encoding and
/// default-on-failure reads on top. Last write wins.
pub trait KeyValueStore: Send {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/eggtomato[-dev]/` based on EGGTOMATO_ENV.
///
/// Set EGGTOMATO_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("EGGTOMATO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("eggtomato-dev")
    } else {
        base_dir.join("eggtomato")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
