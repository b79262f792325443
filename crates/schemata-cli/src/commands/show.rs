use anyhow::{Context, Result};
use schemata_validate::{MemoryRegistry, SchemaRegistry, ValidateError};
use std::process::ExitCode;

/// Pretty-print the description registered as `name`.
pub fn show(registry: &MemoryRegistry, name: &str) -> Result<ExitCode> {
    let description = registry
        .resolve(name)
        .ok_or_else(|| ValidateError::unknown_schema(name))?;
    let pretty = serde_json::to_string_pretty(description).context("Failed to print schema")?;
    println!("{}", pretty);
    Ok(ExitCode::SUCCESS)
}
