use clap::Subcommand;
use eggtomato_core::DarkMode;
use serde_json::json;

use super::open_persistence;

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print all preferences as JSON
    Show,
    /// Set the color scheme (auto, light, dark)
    DarkMode { mode: DarkMode },
    /// Choose the ambient sound by id
    Ambient { id: String },
    /// Turn the ambient sound on or off
    AmbientToggle,
}

pub fn run(action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    let persistence = open_persistence()?;

    match action {
        PrefsAction::Show => {
            let prefs = json!({
                "mode": persistence.mode(),
                "darkMode": persistence.dark_mode(),
                "ambientSoundId": persistence.ambient_sound_id(),
                "ambientEnabled": persistence.ambient_enabled(),
                "freeDurationMs": persistence.free_duration_ms(),
            });
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        PrefsAction::DarkMode { mode } => {
            persistence.set_dark_mode(mode);
            println!("ok");
        }
        PrefsAction::Ambient { id } => {
            persistence.set_ambient_sound_id(&id);
            println!("ok");
        }
        PrefsAction::AmbientToggle => {
            let enabled = !persistence.ambient_enabled();
            persistence.set_ambient_enabled(enabled);
            println!("{}", if enabled { "on" } else { "off" });
        }
    }
    Ok(())
}
