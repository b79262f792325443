//! CLI argument parsing

use crate::commands;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use schemata_loader::{load_dotenv, LoaderConfig, SchemaLoader};
use schemata_validate::MemoryRegistry;
use std::path::PathBuf;
use std::process::ExitCode;

/// schemata - list, inspect and validate against JSON schemas
#[derive(Parser, Debug)]
#[command(name = "schemata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Directory of schema files to load (repeatable; later directories win)
    #[arg(long = "schema-dir", value_name = "DIR", global = true)]
    schema_dirs: Vec<PathBuf>,

    /// Schema file name to leave out of every directory (repeatable)
    #[arg(long, value_name = "FILE", global = true)]
    skip: Vec<String>,

    /// Do not register the built-in schemas
    #[arg(long, global = true)]
    no_builtins: bool,

    /// Log loader activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered schema names
    List,

    /// Print a schema description
    Show {
        /// Schema name
        name: String,
    },

    /// Validate a JSON document against a schema
    Validate {
        /// Schema name
        name: String,

        /// JSON file to validate; reads stdin when omitted or `-`
        file: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.global.verbose
    }

    /// Execute the CLI command
    pub fn execute(self) -> Result<ExitCode> {
        let registry = self.global.registry()?;
        match self.command {
            Commands::List => commands::list(&registry),
            Commands::Show { name } => commands::show(&registry, &name),
            Commands::Validate { name, file } => commands::validate(registry, &name, file.as_deref()),
        }
    }
}

impl GlobalArgs {
    /// Built-ins first, then `SCHEMATA_*` directories, then `--schema-dir`s.
    fn registry(&self) -> Result<MemoryRegistry> {
        load_dotenv();
        let mut config = LoaderConfig::from_env().context("Failed to read SCHEMATA_* configuration")?;
        for dir in &self.schema_dirs {
            config = config.schema_path(dir);
        }
        for file in &self.skip {
            config = config.skip(file.as_str());
        }

        let mut registry = if self.no_builtins {
            MemoryRegistry::new()
        } else {
            schemata_schemas::registry()
        };
        let report = SchemaLoader::new(config)
            .load_into(&mut registry)
            .context("Failed to load schemas")?;
        tracing::debug!(loaded = report.loaded.len(), "Registry ready");
        Ok(registry)
    }
}
