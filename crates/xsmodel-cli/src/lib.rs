//! # xsmodel-cli - Command-Line Interface
//!
//! Thin clap front end over `xsmodel-codegen`.
//!
//! ## Subcommands
//!
//! - `generate` - render a schema model into a Rust module
//! - `formats` - list the registered output formats
//! - `check` - validate literal values against a temporal profile
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers; handlers take parsed
//!   arguments plus the loaded configuration and return an exit code.
//! - Handlers delegate to `xsmodel-codegen`; no generation logic here.
//! - Exit codes: 0 success, 1 validation failure or error.

pub mod check;
pub mod formats;
pub mod generate;

use std::path::Path;

use anyhow::{Context, Result};
use xsmodel_codegen::GeneratorConfig;

/// Load the generator configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => {
            tracing::debug!("no configuration file given, using defaults");
            Ok(GeneratorConfig::default())
        }
    }
}
