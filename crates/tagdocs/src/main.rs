//! tagdocs CLI - versioned documentation from a repository README.
//!
//! Provides commands for:
//! - `publish`: build the site and deploy versions for the current commit
//! - `configure`: build the site configuration without deploying
//! - `backfill`: regenerate documentation for every existing tag

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BackfillArgs, ConfigureArgs, PublishArgs};
use output::Output;

/// tagdocs - versioned documentation from a repository README.
#[derive(Parser)]
#[command(name = "tagdocs", version, about)]
struct Cli {
    /// Enable verbose logging.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site and deploy versions for the current commit.
    Publish(PublishArgs),
    /// Build the site configuration and pages without deploying.
    Configure(ConfigureArgs),
    /// Regenerate documentation for every existing tag of a repository.
    Backfill(BackfillArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Publish(args) => args.execute(),
        Commands::Configure(args) => args.execute(),
        Commands::Backfill(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
