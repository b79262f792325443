use anyhow::Result;
use schemata_validate::{MemoryRegistry, SchemaRegistry};
use std::process::ExitCode;

/// Print every registered name, one per line.
pub fn list(registry: &MemoryRegistry) -> Result<ExitCode> {
    for name in registry.names() {
        println!("{}", name);
    }
    Ok(ExitCode::SUCCESS)
}
