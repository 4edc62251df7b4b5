mod commands;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use calmanage_core::{Dispatcher, EngineConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calmanage")]
#[command(about = "Run calendar management commands stored in .ics files")]
struct Cli {
    /// Config file (defaults to ~/.config/calmanage/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recognized command names
    Commands,
    /// Report whether an event is a management command
    Check {
        file: PathBuf,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the command in an event and rewrite its DESCRIPTION in place
    Apply {
        file: PathBuf,

        /// Print the rewritten event instead of saving it
        #[arg(long)]
        dry_run: bool,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply every management command found in a directory of .ics files
    ApplyAll {
        dir: PathBuf,

        /// Show what would change without saving
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let dispatcher = load_dispatcher(cli.config.as_deref())?;

    match cli.command {
        Commands::Commands => commands::list::run(&dispatcher),
        Commands::Check { file, json } => commands::check::run(&dispatcher, &file, json),
        Commands::Apply {
            file,
            dry_run,
            json,
        } => commands::apply::run(&dispatcher, &file, dry_run, json),
        Commands::ApplyAll {
            dir,
            dry_run,
            force,
        } => commands::apply_all::run(&dispatcher, &dir, dry_run, force),
    }
}

fn load_dispatcher(config_path: Option<&std::path::Path>) -> Result<Dispatcher> {
    let config = match config_path {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::load().context("Failed to load config")?,
    };

    Ok(Dispatcher::from_config(&config)?)
}
