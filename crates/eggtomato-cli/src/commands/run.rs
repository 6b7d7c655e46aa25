//! Interactive timer session.
//!
//! Drives the coordinator from a single-threaded tokio loop: a fixed-cadence
//! interval ticks the countdown while it runs, stdin lines become commands,
//! and every published snapshot is redrawn on stderr.

use std::error::Error;
use std::sync::Arc;

use clap::Args;
use eggtomato_core::settings::{free_preset_ms, parse_duration_input, FREE_PRESETS_MIN};
use eggtomato_core::timer::{format_time_long, progress};
use eggtomato_core::{
    Config, DarkMode, Event, PomodoroSettings, SessionCoordinator, SessionSnapshot, SystemClock,
    TimerMode,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{self, MissedTickBehavior};

use super::open_persistence;
use crate::sink::TerminalSink;

const HELP: &str = "commands: start | pause | reset | skip | mode <free|cyclic> | set <MM:SS|M> \
| presets | preset <M> | settings <work|short|long|sessions|autostart> <value> \
| dark <auto|light|dark> | ambient [<id>] | status | quit";

#[derive(Args)]
pub struct RunArgs {
    /// Switch to this mode before starting (free, cyclic)
    #[arg(long)]
    mode: Option<TimerMode>,
    /// Free-mode duration as MM:SS or minutes
    #[arg(long)]
    duration: Option<String>,
    /// Start the countdown immediately
    #[arg(long)]
    start: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Start,
    Pause,
    Reset,
    Skip,
    Mode(TimerMode),
    Set(u64),
    Presets,
    Preset(u64),
    Settings(SettingsEdit),
    Dark(DarkMode),
    Ambient(String),
    AmbientToggle,
    Status,
    Help,
    Quit,
}

/// One field change applied through `update_settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsEdit {
    Work(u32),
    Short(u32),
    Long(u32),
    Sessions(u32),
    AutoStartBreaks(bool),
}

impl SettingsEdit {
    fn parse(field: &str, value: &str) -> Result<Self, String> {
        let minutes = || {
            value
                .parse::<u32>()
                .map_err(|_| format!("'{value}' is not a whole number"))
        };
        match field {
            "work" => minutes().map(SettingsEdit::Work),
            "short" => minutes().map(SettingsEdit::Short),
            "long" => minutes().map(SettingsEdit::Long),
            "sessions" => minutes().map(SettingsEdit::Sessions),
            "autostart" => match value {
                "on" | "true" => Ok(SettingsEdit::AutoStartBreaks(true)),
                "off" | "false" => Ok(SettingsEdit::AutoStartBreaks(false)),
                _ => Err(format!("autostart takes on or off, got '{value}'")),
            },
            _ => Err(format!("unknown setting: {field}")),
        }
    }

    fn apply(self, settings: &mut PomodoroSettings) {
        match self {
            SettingsEdit::Work(v) => settings.work_minutes = v,
            SettingsEdit::Short(v) => settings.short_break_minutes = v,
            SettingsEdit::Long(v) => settings.long_break_minutes = v,
            SettingsEdit::Sessions(v) => settings.sessions_before_long_break = v,
            SettingsEdit::AutoStartBreaks(v) => settings.auto_start_breaks = v,
        }
    }
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();

    match (verb.as_str(), args.as_slice()) {
        ("start" | "s", []) => Ok(Command::Start),
        ("pause" | "p", []) => Ok(Command::Pause),
        ("reset" | "r", []) => Ok(Command::Reset),
        ("skip" | "n", []) => Ok(Command::Skip),
        ("presets", []) => Ok(Command::Presets),
        ("ambient", []) => Ok(Command::AmbientToggle),
        ("status", []) => Ok(Command::Status),
        ("help" | "?", []) => Ok(Command::Help),
        ("quit" | "q" | "exit", []) => Ok(Command::Quit),
        ("mode", [m]) => m.parse().map(Command::Mode).map_err(|e| e.to_string()),
        ("set", [d]) => Ok(Command::Set(parse_duration_input(d))),
        ("preset", [m]) => m
            .parse()
            .map(Command::Preset)
            .map_err(|_| format!("'{m}' is not a number of minutes")),
        ("settings", [field, value]) => SettingsEdit::parse(field, value).map(Command::Settings),
        ("dark", [m]) => m.parse().map(Command::Dark).map_err(|e| e.to_string()),
        ("ambient", [id]) => Ok(Command::Ambient((*id).to_string())),
        ("mode" | "set" | "preset" | "dark", []) => Err(format!("{verb} needs an argument")),
        ("settings", _) => Err("settings needs a field and a value".to_string()),
        _ => Err(format!("unknown command: {}", line.trim())),
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let config = Config::load_or_default();
    let persistence = open_persistence()?;
    let sink = TerminalSink::new(&config.notifications);
    let mut coordinator = SessionCoordinator::new(persistence, Arc::new(SystemClock), sink);

    if let Some(mode) = args.mode {
        log_event(coordinator.switch_mode(mode));
    }
    if let Some(duration) = args.duration.as_deref() {
        let event = coordinator.set_free_duration(parse_duration_input(duration))?;
        log_event(Some(event));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(event_loop(&mut coordinator, &config, args.start))
}

async fn event_loop(
    coordinator: &mut SessionCoordinator,
    config: &Config,
    autostart: bool,
) -> Result<(), Box<dyn Error>> {
    let show_progress = config.ui.show_progress;
    let mut snapshots = coordinator.subscribe();
    let mut ticker = time::interval(config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    render(&snapshots.borrow_and_update(), show_progress);
    if autostart {
        log_event(coordinator.start());
    }

    loop {
        // Without input the session ends once nothing is counting down.
        if !stdin_open && !coordinator.is_running() {
            break;
        }

        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::debug!("interrupted");
                break;
            }
            _ = ticker.tick(), if coordinator.is_running() => {
                for event in coordinator.tick() {
                    log_event(Some(event));
                }
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => apply(coordinator, command)?,
                    Err(message) => eprintln!("\n{message}\n{HELP}"),
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                render(&snapshots.borrow_and_update(), show_progress);
            }
        }
    }

    render(&coordinator.snapshot(), show_progress);
    eprintln!();
    Ok(())
}

fn apply(coordinator: &mut SessionCoordinator, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Start => log_event(coordinator.start()),
        Command::Pause => log_event(coordinator.pause()),
        Command::Reset => log_event(Some(coordinator.reset())),
        Command::Skip => {
            if coordinator.mode() == TimerMode::Free {
                eprintln!("\nskip only applies to the pomodoro cycle");
            }
            log_event(coordinator.skip());
        }
        Command::Mode(mode) => log_event(coordinator.switch_mode(mode)),
        Command::Set(duration_ms) => match coordinator.set_free_duration(duration_ms) {
            Ok(event) => log_event(Some(event)),
            Err(e) => eprintln!("\nerror: {e}"),
        },
        Command::Presets => {
            let presets: Vec<String> = FREE_PRESETS_MIN.iter().map(|m| format!("{m}m")).collect();
            eprintln!("\npresets: {}", presets.join(" "));
        }
        Command::Preset(minutes) => {
            match free_preset_ms(minutes).and_then(|ms| coordinator.set_free_duration(ms)) {
                Ok(event) => log_event(Some(event)),
                Err(e) => eprintln!("\nerror: {e}"),
            }
        }
        Command::Settings(edit) => {
            let mut settings = coordinator.settings().clone();
            edit.apply(&mut settings);
            match coordinator.update_settings(settings) {
                Ok(event) => log_event(Some(event)),
                Err(e) => eprintln!("\nerror: {e}"),
            }
        }
        Command::Dark(mode) => coordinator.set_dark_mode(mode),
        Command::Ambient(id) => coordinator.set_ambient_sound(&id),
        Command::AmbientToggle => {
            let enabled = coordinator.toggle_ambient();
            eprintln!("\nambient {}", if enabled { "on" } else { "off" });
        }
        Command::Status => println!("{}", serde_json::to_string(&coordinator.snapshot())?),
        Command::Help => eprintln!("\n{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

fn log_event(event: Option<Event>) {
    if let Some(event) = event {
        tracing::debug!(?event, "session event");
    }
}

fn render(snapshot: &SessionSnapshot, show_progress: bool) {
    let mut line = format!(
        "\r{} {} [{}]",
        snapshot.label(),
        format_time_long(snapshot.remaining_ms),
        snapshot.status
    );
    if snapshot.mode == TimerMode::Cyclic {
        line.push_str(&format!(
            " {}/{}",
            snapshot.cycle_position,
            snapshot.settings.cycle_length()
        ));
    }
    if show_progress {
        let pct = progress(snapshot.remaining_ms, snapshot.total_ms) * 100.0;
        line.push_str(&format!(" {pct:3.0}%"));
    }
    // Pad over the tail of a longer previous line.
    eprint!("{line:<48}");
}
