mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use holisync_core::config::HolisyncConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "holisync")]
#[command(about = "Generate, import and sync recurring holidays into your calendar")]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the configured holidays to an ICS file
    Generate {
        /// Output file (defaults to `output` from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Add missing holidays to the remote calendar
    Holidays {
        /// Show what would be created without changing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Import the events of an ICS file into the remote calendar
    Import {
        file: PathBuf,

        /// Timezone for times without one (e.g. "Europe/Berlin")
        #[arg(long)]
        timezone: Option<String>,

        /// Preview the events without importing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete holiday-titled events holisync does not own
    Cleanup {
        /// Also delete owned holidays that are not on their expected date
        #[arg(long)]
        misdated: bool,

        /// Leave events without any marker alone
        #[arg(long)]
        keep_untagged: bool,

        /// Show what would be deleted without changing anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = HolisyncConfig::load()?;

    match cli.command {
        Commands::Generate { output } => commands::generate::run(&config, output),
        Commands::Holidays { dry_run } => commands::holidays::run(&config, dry_run, cli.verbose).await,
        Commands::Import {
            file,
            timezone,
            dry_run,
        } => commands::import::run(&config, &file, timezone.as_deref(), dry_run).await,
        Commands::Cleanup {
            misdated,
            keep_untagged,
            dry_run,
        } => {
            let options = commands::cleanup::CleanupOptions {
                misdated,
                keep_untagged,
                dry_run,
            };
            commands::cleanup::run(&config, options).await
        }
    }
}

fn init_tracing(verbose: bool) {
    // Matches the binary and the holisync_* library targets
    let default_filter = if verbose { "holisync=debug" } else { "holisync=info" };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
