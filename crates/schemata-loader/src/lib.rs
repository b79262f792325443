//! # schemata-loader
//!
//! Populates a [`MemoryRegistry`](schemata_validate::MemoryRegistry) from
//! directories of JSON schema files.
//!
//! Each file's stem becomes the schema name. A file whose top-level object
//! holds a `"$schemas"` map registers every entry as `<stem>.<key>` instead.
//! Directories are scanned in order, files in name order; a later
//! registration replaces an earlier one with the same name.
//!
//! ```rust,no_run
//! use schemata_loader::{load_dotenv, LoaderConfig, SchemaLoader};
//!
//! load_dotenv();
//! let config = LoaderConfig::from_env()?.schema_path("./schemas");
//! let registry = SchemaLoader::new(config).load()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod loader;

pub use config::{load_dotenv, load_dotenv_from, ConfigError, LoaderConfig, DEFAULT_EXTENSION, ENV_PREFIX};
pub use loader::{LoadError, LoadReport, SchemaLoader, COLLECTION_KEY};
