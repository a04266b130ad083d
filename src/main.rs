//! Strata CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod manifest;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Dependency layering and folder layout analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Project root holding strata.toml (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Configuration file (defaults to strata.toml in the project root)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dependency graph and report cycles and layers
    Analyze {
        /// Source manifest (JSON), relative to the working directory
        #[arg(short, long)]
        input: PathBuf,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also report edges that point up the rendered layout
        #[arg(long)]
        upward_issues: bool,
    },
    /// Compute the folder layout with classified edges
    Layout {
        /// Source manifest (JSON), relative to the working directory
        #[arg(short, long)]
        input: PathBuf,

        /// Write the layout here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout carries the JSON output
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("strata={}", log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Strata v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Analyze {
            input,
            output,
            upward_issues,
        } => {
            let project = commands::Project::open(&cli.root, cli.config.as_deref())?;
            commands::analyze(&project, &input, output.as_deref(), upward_issues)
        }
        Commands::Layout { input, output } => {
            let project = commands::Project::open(&cli.root, cli.config.as_deref())?;
            commands::layout(&project, &input, output.as_deref())
        }
        Commands::Version => {
            println!("Strata v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
