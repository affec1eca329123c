//! Conference statistics CLI
//!
//! Serves the statistics API or runs a single aggregation offline.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use confeti_config::{ObservabilityConfig, ServiceSettings};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::commands::{ServeArgs, StatArgs};

#[derive(Parser)]
#[command(
    name = "confeti-stats",
    version,
    about = "Tag and language statistics over conference reports"
)]
struct Cli {
    /// Configuration file
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        env = "CONFETI_CONFIG",
        help = "Path to configuration file"
    )]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the statistics REST API
    #[command(name = "serve", about = "Serve the statistics REST API")]
    Serve(ServeArgs),

    /// Run one aggregation and print it
    #[command(name = "stat", about = "Compute tag or language statistics offline")]
    Stat(StatArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = ServiceSettings::load(cli.config.clone())?;
    init_tracing(&settings.observability, cli.verbose);

    match cli.command {
        Commands::Serve(args) => args.execute(settings).await,
        Commands::Stat(args) => args.execute(settings).await,
    }
}

/// Initialize tracing/logging
fn init_tracing(config: &ObservabilityConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}
