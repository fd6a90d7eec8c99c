//! zonewatch - replay recorded frames and manage collected effect paths.
//!
//! Usage: zonewatch [--config <settings.toml>] <command>
//!
//! Without `--config`, settings are read from the platform config directory.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::EnvFilter;

use commands::SettingsStore;

#[derive(Parser)]
#[command(version, about = "Effect zone classifier tools")]
struct Cli {
    /// Settings file to use instead of the default location
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run recorded frames (one JSON object per line) through the classifier
    Replay {
        #[arg(short, long)]
        frames: PathBuf,

        /// Write collected unknown/lethal paths back to the settings
        #[arg(long)]
        save: bool,
    },
    /// Remove unknown effects matched by the current blacklist or groups
    RemoveMatched,
    /// Clear all unknown and lethal effects
    ClearUnknown,
    /// Print the effective settings
    ShowConfig,
}

/// Initialize logging, writing to ZONEWATCH_LOG_PATH if set, otherwise stderr.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("ZONEWATCH_LOG_PATH")
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_ansi(false)
            .with_writer(file)
            .init();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), String> {
    init_logging();

    let cli = Cli::parse();
    let store = SettingsStore::from_arg(cli.config);

    match cli.command {
        Commands::Replay { frames, save } => commands::replay(&store, &frames, save),
        Commands::RemoveMatched => commands::remove_matched(&store),
        Commands::ClearUnknown => commands::clear_unknown(&store),
        Commands::ShowConfig => commands::show_config(&store),
    }
}
