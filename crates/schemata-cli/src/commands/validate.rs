//! Validate command

use anyhow::{Context, Result};
use console::style;
use schemata_validate::{MemoryRegistry, Validation};
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

/// Exit code for a document that failed validation.
const EXIT_INVALID: u8 = 1;

/// Validate the JSON document in `file` (or stdin) against `name`.
///
/// On failure the rendered error is printed to stdout as JSON.
pub fn validate(registry: MemoryRegistry, name: &str, file: Option<&Path>) -> Result<ExitCode> {
    let instance = read_instance(file)?;
    let validation = Validation::new(registry);
    let result = validation.validate_by_name(name, &instance)?;

    match result.error {
        None => {
            eprintln!("{} {}", style("valid:").green().bold(), name);
            Ok(ExitCode::SUCCESS)
        }
        Some(error) => {
            tracing::debug!(schema = name, violations = error.len(), "Document rejected");
            let rendered = serde_json::to_string_pretty(&error).context("Failed to print error")?;
            println!("{}", rendered);
            Ok(ExitCode::from(EXIT_INVALID))
        }
    }
}

fn read_instance(file: Option<&Path>) -> Result<Value> {
    let text = match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };
    serde_json::from_str(&text).context("Input is not valid JSON")
}
