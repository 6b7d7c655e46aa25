use clap::Subcommand;

use super::open_persistence;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the Pomodoro settings as JSON
    Show,
    /// Change one or more Pomodoro settings
    Set {
        /// Work phase length in minutes (1-90)
        #[arg(long)]
        work: Option<u32>,
        /// Short break length in minutes (1-30)
        #[arg(long)]
        short: Option<u32>,
        /// Long break length in minutes (1-60)
        #[arg(long)]
        long: Option<u32>,
        /// Work sessions before a long break
        #[arg(long)]
        sessions: Option<u32>,
        /// Start breaks automatically after a work phase
        #[arg(long)]
        auto_start_breaks: Option<bool>,
    },
    /// Restore the default settings
    Reset,
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let persistence = open_persistence()?;

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&persistence.settings())?);
        }
        SettingsAction::Set {
            work,
            short,
            long,
            sessions,
            auto_start_breaks,
        } => {
            let mut settings = persistence.settings();
            if let Some(v) = work {
                settings.work_minutes = v;
            }
            if let Some(v) = short {
                settings.short_break_minutes = v;
            }
            if let Some(v) = long {
                settings.long_break_minutes = v;
            }
            if let Some(v) = sessions {
                settings.sessions_before_long_break = v;
            }
            if let Some(v) = auto_start_breaks {
                settings.auto_start_breaks = v;
            }
            settings.validate()?;
            persistence.set_settings(&settings);
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Reset => {
            persistence.set_settings(&Default::default());
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
