//! Tangle export CLI
//!
//! Command-line tools for exporting a local tangle.
//!
//! # Commands
//!
//! - `export` - Write every indexed transaction as a JSON row
//! - `inspect` - Display store sizes and entry counts
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Tangle export tools.
#[derive(Parser)]
#[command(name = "tangle-export")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store directory
    #[arg(global = true, short = 'p', long, alias = "dbPath")]
    db_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every indexed transaction with its metadata
    Export {
        /// Output file
        #[arg(short, long, default_value = tangle_export::DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Discard existing output instead of appending to it
        #[arg(long)]
        truncate: bool,

        /// Stop after this many index entries
        #[arg(short, long)]
        limit: Option<u64>,

        /// Skip record checksum verification
        #[arg(long)]
        no_verify_checksums: bool,
    },

    /// Display store statistics
    Inspect {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Show version information
    Version,
}

/// Report output format.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Text,
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Export {
            output,
            truncate,
            limit,
            no_verify_checksums,
        } => {
            let path = cli.db_path.ok_or("Store path required for export")?;
            commands::export::run(path, output, truncate, limit, !no_verify_checksums)?;
        }
        Commands::Inspect { format } => {
            let path = cli.db_path.ok_or("Store path required for inspect")?;
            commands::inspect::run(&path, format)?;
        }
        Commands::Version => {
            println!("tangle-export v{}", env!("CARGO_PKG_VERSION"));
            println!("tangle-core v{}", tangle_core::VERSION);
        }
    }

    Ok(())
}
