mod config;
mod quiz;
mod render;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use fretboard_core::storage::{SettingsStore, StatsStore};
use fretboard_data::{Dimension, FRET_COUNT, STRING_COUNT};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "fretboard")]
#[command(about = "Guitar fretboard note trainer", long_about = None)]
struct Cli {
    /// Directory holding the settings and stats files
    #[arg(long, global = true, env = "FRETBOARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Seed for reproducible positions
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Name the note at random fretboard positions
    Quiz {
        /// Stop after this many answers
        #[arg(long)]
        rounds: Option<u32>,
    },
    /// Show accumulated accuracy per note and per fret
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Erase accumulated stats
    ResetStats,
    /// Choose which frets and strings the quiz draws from
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, Subcommand)]
enum SettingsAction {
    /// Print the current selection
    Show,
    /// Turn a single fret (0-12) on or off
    Fret { index: usize, state: Toggle },
    /// Turn a single string on or off, 0 = low E through 5 = high E
    #[command(name = "string")]
    GuitarString { index: usize, state: Toggle },
    /// Enable every fret or string
    #[command(name = "all")]
    SelectAll { dimension: Dimension },
    /// Enable only the first fret or string
    #[command(name = "none")]
    SelectNone { dimension: Dimension },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = Config::resolve(cli.data_dir, cli.seed);
    tracing::debug!(data_dir = %config.data_dir.display(), "config resolved");

    match cli.command {
        Command::Quiz { rounds } => quiz::run(&config, rounds)?,
        Command::Stats { json } => {
            let record = StatsStore::new(config.storage()).load();
            if json {
                let text = serde_json::to_string_pretty(&record.summary())
                    .context("failed to serialize stats")?;
                println!("{text}");
            } else {
                print!("{}", render::stats_table(&record.summary()));
            }
        }
        Command::ResetStats => {
            StatsStore::new(config.storage()).reset();
            println!("Stats cleared.");
        }
        Command::Settings { action } => run_settings(&config, action)?,
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_settings(config: &Config, action: SettingsAction) -> anyhow::Result<()> {
    let store = SettingsStore::new(config.storage());
    let mut record = store.load();

    let accepted = match action {
        SettingsAction::Show => true,
        SettingsAction::Fret { index, state } => {
            if index >= FRET_COUNT {
                bail!("fret index must be 0..={}, got {index}", FRET_COUNT - 1);
            }
            store.set_fret(&mut record, index, matches!(state, Toggle::On))
        }
        SettingsAction::GuitarString { index, state } => {
            if index >= STRING_COUNT {
                bail!("string index must be 0..={}, got {index}", STRING_COUNT - 1);
            }
            store.set_string(&mut record, index, matches!(state, Toggle::On))
        }
        SettingsAction::SelectAll { dimension } => {
            store.select_all(&mut record, dimension);
            true
        }
        SettingsAction::SelectNone { dimension } => {
            store.select_none(&mut record, dimension);
            true
        }
    };

    if !accepted {
        println!("At least one fret and one string must stay enabled; nothing changed.");
    }
    print!("{}", render::settings(&record));
    Ok(())
}
