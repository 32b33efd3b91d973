use anyhow::Context;
use clap::{Parser, Subcommand};
use siren_patterns::Pattern;
use siren_persist::ConfigStore;
use siren_player::{Player, StopHandle};
use std::path::PathBuf;

mod app;
mod menu;

use app::App;
use menu::Menu;

#[derive(Subcommand)]
enum Command {
    /// Choose patterns to play from a menu (the default)
    Menu,
    /// Print the name of every pattern
    List,
    /// Play one pattern and exit
    Play {
        /// Pattern name, eg. "dual-wail"
        pattern: Pattern,
        /// How long the alert lasts, for patterns that have one
        #[arg(short, long)]
        duration_secs: Option<f64>,
    },
}

#[derive(Parser)]
#[command(name = "siren")]
#[command(
    about = "Synthesize siren signals (wails, whoops, alerts and chimes) and play them"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    /// Config file, created with default values if it doesn't exist
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

/// On interrupt stop playback. The menu notices the same flag and returns, so the sink is
/// dropped on the main thread.
fn handle_interrupts(stop: StopHandle) -> anyhow::Result<()> {
    ctrlc::set_handler(move || stop.stop())
        .context("failed to install interrupt handler")
}

fn list() {
    for pattern in Pattern::ALL {
        if pattern.takes_duration() {
            println!("{} (takes --duration-secs)", pattern);
        } else {
            println!("{}", pattern);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Menu);
    if let Command::List = command {
        list();
        return Ok(());
    }
    let store = ConfigStore::new(cli.config);
    let config = store.load_or_create()?;
    let duration = match &command {
        Command::Play {
            pattern,
            duration_secs,
        } => pattern.duration_from_secs(*duration_secs)?,
        _ => None,
    };
    let player = Player::new()?;
    let sink = player.open(config.sample_rate_hz, Default::default())?;
    let stop = sink.stop_handle();
    handle_interrupts(stop.clone())?;
    let mut app = App::new(config, store, sink);
    match command {
        Command::Play { pattern, .. } => {
            app.play(pattern, duration, |message| {
                println!("{}", message);
                Ok(())
            })?;
        }
        _ => {
            let mut menu = Menu::new(stop)?;
            app.run_menu(&mut menu)?;
        }
    }
    // dropping the app closes the audio stream
    Ok(())
}
