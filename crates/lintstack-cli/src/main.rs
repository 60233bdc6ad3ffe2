//! lintstack CLI tool.
//!
//! Usage:
//! ```bash
//! lintstack print-config [OPTIONS] <FILE>
//! lintstack check [OPTIONS] [PATH]
//! lintstack init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Resolve layered lint configuration for web projects
#[derive(Parser)]
#[command(name = "lintstack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "LINTSTACK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration of one file
    PrintConfig {
        /// File to resolve (need not exist)
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Resolve every file under a directory and report problems
    Check {
        /// Path to walk (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// File extensions to include (comma-separated)
        #[arg(
            long,
            value_delimiter = ',',
            default_value = "js,cjs,mjs,jsx,ts,cts,mts,tsx"
        )]
        ext: Vec<String>,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::PrintConfig { file, format } => {
            let cwd = std::env::current_dir()?;
            let source = config_resolver::resolve(&cwd, cli.config.as_deref());
            commands::print_config::run(&file, format, &source, &cwd)
        }
        Commands::Check { path, format, ext } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            commands::check::run(&path, format, &ext, &source)
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
