//! MoPatch CLI - Command-line interface for catalog patching

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mopatch")]
#[command(about = "MoPatch: gettext catalog patching for game mods")]
#[command(long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Run the MoPatch CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging, RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
