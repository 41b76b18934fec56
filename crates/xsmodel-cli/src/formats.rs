//! # Formats Subcommand
//!
//! Lists the output formats in the process-wide registry.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use xsmodel_codegen::{
    default_registry, FormatRegistry, GeneratorConfig, OutputFormat, BUILTIN_FORMATS,
};

/// Arguments for the `xsmodel formats` subcommand.
#[derive(Args, Debug)]
pub struct FormatsArgs {
    /// Print a JSON array instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// One row of the listing.
#[derive(Debug, Serialize)]
pub struct FormatEntry<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub builtin: bool,
    pub default: bool,
}

/// Execute the formats subcommand.
pub fn run_formats(args: &FormatsArgs, config: &GeneratorConfig) -> Result<u8> {
    let mut stdout = std::io::stdout().lock();
    list_formats(default_registry(), args, config, &mut stdout)?;
    Ok(0)
}

/// Collect the registry's formats in name order.
pub fn entries<'a>(registry: &'a FormatRegistry, config: &GeneratorConfig) -> Vec<FormatEntry<'a>> {
    registry
        .iter()
        .map(|format| FormatEntry {
            name: format.name(),
            description: format.description(),
            builtin: BUILTIN_FORMATS.contains(&format.name()),
            default: format.name() == config.format,
        })
        .collect()
}

/// Write the listing to `out`.
pub fn list_formats(
    registry: &FormatRegistry,
    args: &FormatsArgs,
    config: &GeneratorConfig,
    out: &mut impl Write,
) -> Result<()> {
    let rows = entries(registry, config);

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &rows).context("failed to encode format list")?;
        writeln!(out)?;
        return Ok(());
    }

    for row in &rows {
        let mut tags = Vec::new();
        if row.builtin {
            tags.push("built-in");
        }
        if row.default {
            tags.push("default");
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(", "))
        };
        writeln!(out, "{:<12} {}{}", row.name, row.description, tags)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(json: bool, config: &GeneratorConfig) -> String {
        let mut buf = Vec::new();
        list_formats(default_registry(), &FormatsArgs { json }, config, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn table_marks_builtin_and_default() {
        let text = listing(false, &GeneratorConfig::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("plain "));
        assert!(lines[0].ends_with("[built-in]"));
        assert!(lines[1].starts_with("validated "));
        assert!(lines[1].ends_with("[default]"));
    }

    #[test]
    fn json_listing() {
        let config = GeneratorConfig::default().with_format("plain");
        let value: serde_json::Value = serde_json::from_str(&listing(true, &config)).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "plain");
        assert_eq!(rows[0]["builtin"], true);
        assert_eq!(rows[0]["default"], true);
        assert_eq!(rows[1]["name"], "validated");
        assert_eq!(rows[1]["default"], false);
    }
}
