//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qrev_ir::Circuit;
use qrev_sim::{RegisterCatalog, RegisterValue};

fn read_source(path: &str) -> Result<(String, String)> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    let ext = path_obj
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    Ok((source, ext))
}

/// Load a compiled circuit from a JSON or YAML file.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    let (source, ext) = read_source(path)?;

    match ext.as_str() {
        "yaml" | "yml" => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Failed to parse circuit: {path}")),
        "json" | "" => {
            Circuit::from_json(&source).with_context(|| format!("Failed to parse circuit: {path}"))
        }
        other => anyhow::bail!("Unsupported circuit format: '.{other}'. Use .json or .yaml"),
    }
}

/// Load a register layout (a list of register descriptors) from a YAML or
/// JSON file. Without a path the layout is empty.
pub fn load_layout(path: Option<&str>) -> Result<RegisterCatalog> {
    let Some(path) = path else {
        return Ok(RegisterCatalog::new());
    };
    let (source, ext) = read_source(path)?;

    match ext.as_str() {
        "json" => serde_json::from_str(&source)
            .with_context(|| format!("Failed to parse layout: {path}")),
        _ => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Failed to parse layout: {path}")),
    }
}

/// Print decoded registers as an aligned table.
pub fn print_registers<'a>(values: impl IntoIterator<Item = (&'a str, &'a RegisterValue)>) {
    for (name, value) in values {
        println!("  {:<20} {}", style(name).bold(), style(value).cyan());
    }
}

/// Collect decoded registers into a JSON object, preserving order.
pub fn registers_to_json<'a>(
    values: impl IntoIterator<Item = (&'a str, &'a RegisterValue)>,
) -> Result<serde_json::Map<String, serde_json::Value>> {
    values
        .into_iter()
        .map(|(name, value)| Ok((name.to_string(), serde_json::to_value(value)?)))
        .collect()
}
