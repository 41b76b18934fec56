//! # xsmodel CLI entry point
//!
//! Parses command-line arguments, loads the generator configuration, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use xsmodel_cli::check::{run_check, CheckArgs};
use xsmodel_cli::formats::{run_formats, FormatsArgs};
use xsmodel_cli::generate::{run_generate, GenerateArgs};
use xsmodel_cli::load_config;

/// xsmodel - schema-model to Rust code generator.
///
/// Renders resolved schema models into serde model modules, with schema-name
/// aliases and validated temporal types in the `validated` format.
#[derive(Parser, Debug)]
#[command(name = "xsmodel", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a generator configuration file (.yaml or .json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a Rust module from a schema model.
    Generate(GenerateArgs),

    /// List registered output formats.
    Formats(FormatsArgs),

    /// Check literal values against a temporal profile.
    Check(CheckArgs),
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
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("xsmodel CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = load_config(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Generate(args) => run_generate(args, &config),
        Commands::Formats(args) => run_formats(args, &config),
        Commands::Check(args) => run_check(args),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
