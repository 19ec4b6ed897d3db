//! # jsed CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jsed_cli::load_config;
use jsed_cli::schema::{run_beautify, run_dialect, run_normalize, FileArgs};
use jsed_cli::validate::{run_validate, ValidateArgs};

/// JSON Schema editor core on the command line.
///
/// Validates data against schemas with dialect dispatch, shows what the
/// visual builder keeps of a schema, and pretty-prints documents.
#[derive(Parser, Debug)]
#[command(name = "jsed", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML session configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a data document against a schema.
    Validate(ValidateArgs),

    /// Load a schema into the builder tree and print it back.
    Normalize(FileArgs),

    /// Pretty-print a JSON or YAML document.
    Beautify(FileArgs),

    /// Print the validator dialect a schema selects.
    Dialect(FileArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "jsed starting");

    let result = load_config(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Validate(args) => run_validate(args, config),
        Commands::Normalize(args) => run_normalize(args, config),
        Commands::Beautify(args) => run_beautify(args, config),
        Commands::Dialect(args) => run_dialect(args),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
