//! # Generate Subcommand
//!
//! Loads a schema model, renders it with the configured output format, and
//! writes the module to a file or stdout.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use xsmodel_codegen::{default_registry, GenerationRun, GeneratorConfig, SchemaModel};

/// Arguments for the `xsmodel generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Schema model file (.yaml, .yml or .json).
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,

    /// Output format; overrides the configuration file.
    #[arg(long)]
    pub format: Option<String>,

    /// Write the module here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Execute the generate subcommand.
pub fn run_generate(args: &GenerateArgs, config: &GeneratorConfig) -> Result<u8> {
    let module = render_module(args, config)?;

    match &args.output {
        Some(path) => write_module(path, &module)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(module.as_bytes())
                .context("failed to write module to stdout")?;
        }
    }
    Ok(0)
}

/// Load the model and render it, applying a `--format` override.
pub fn render_module(args: &GenerateArgs, config: &GeneratorConfig) -> Result<String> {
    let config = match &args.format {
        Some(format) => config.clone().with_format(format.as_str()),
        None => config.clone(),
    };

    let model = SchemaModel::load(&args.model)
        .with_context(|| format!("failed to load model {}", args.model.display()))?;
    let run = GenerationRun::new(default_registry(), &config)?;
    tracing::info!(
        model = %args.model.display(),
        format = %run.format_name(),
        "generating module"
    );
    Ok(run.render(&model)?)
}

fn write_module(path: &Path, module: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, module).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = module.len(), "wrote module");
    Ok(())
}
