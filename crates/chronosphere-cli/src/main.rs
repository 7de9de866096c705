//! Chronosphere CLI - Command-line interface for the Chronosphere pipeline.

use chronosphere_cli::commands;
use chronosphere_cli::{Cli, Command, Config};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> chronosphere_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(&cli);

    // Load config file, falling back to defaults
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Parse(args) => commands::execute_parse(args, &config).await?,
        Command::Enrich(args) => commands::execute_enrich(args, &config).await?,
    }

    Ok(())
}

/// Log to stderr so stdout only carries run summaries.
fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
