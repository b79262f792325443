//! Directory scanning.

use crate::config::LoaderConfig;
use schemata_validate::{CompiledValidator, MemoryRegistry, SchemaError};
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Key of the map that makes a file a multi-schema collection.
pub const COLLECTION_KEY: &str = "$schemas";

/// Errors raised while loading schema directories.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Could not read schema directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not read schema file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Schema file {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema '{name}' in {} is invalid: {source}", path.display())]
    Schema {
        name: String,
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error("'$schemas' in {} must be an object", path.display())]
    Collection { path: PathBuf },
}

/// What a load registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Names registered, in load order.
    pub loaded: Vec<String>,
    /// Names that replaced an earlier registration.
    pub overwritten: Vec<String>,
    /// Files left out because of the skip list.
    pub skipped: Vec<PathBuf>,
    /// Top-level keys of collection files that sit beside `$schemas` and
    /// were not loaded.
    pub ignored: Vec<(PathBuf, String)>,
}

/// Loads schema files from the configured directories.
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    config: LoaderConfig,
}

impl SchemaLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load every configured directory into a fresh registry.
    pub fn load(&self) -> Result<MemoryRegistry, LoadError> {
        let mut registry = MemoryRegistry::new();
        self.load_into(&mut registry)?;
        Ok(registry)
    }

    /// Load every configured directory into `registry`.
    ///
    /// Names already present are overwritten. Stops at the first error,
    /// leaving whatever was registered before it in place.
    pub fn load_into(&self, registry: &mut MemoryRegistry) -> Result<LoadReport, LoadError> {
        let mut report = LoadReport::default();
        for dir in &self.config.schema_paths {
            self.load_dir(dir, registry, &mut report)?;
        }
        info!(
            loaded = report.loaded.len(),
            overwritten = report.overwritten.len(),
            skipped = report.skipped.len(),
            "Schemas loaded"
        );
        Ok(report)
    }

    fn load_dir(
        &self,
        dir: &Path,
        registry: &mut MemoryRegistry,
        report: &mut LoadReport,
    ) -> Result<(), LoadError> {
        debug!(dir = %dir.display(), "Loading schemas");
        let directory_error = |source| LoadError::Directory {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(directory_error)? {
            let path = entry.map_err(directory_error)?.path();
            if path.is_file() && path.extension() == Some(OsStr::new(&self.config.extension)) {
                files.push(path);
            }
        }
        files.sort();

        for path in files {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if self.config.is_skipped(&file_name) {
                debug!(file = %path.display(), "Skipping schema file");
                report.skipped.push(path);
                continue;
            }
            self.load_file(&path, registry, report)?;
        }
        Ok(())
    }

    fn load_file(
        &self,
        path: &Path,
        registry: &mut MemoryRegistry,
        report: &mut LoadReport,
    ) -> Result<(), LoadError> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut document: Value = serde_json::from_str(&text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let collection = document
            .as_object_mut()
            .and_then(|map| map.remove(COLLECTION_KEY));
        match collection {
            None => register(registry, report, stem, document, path),
            Some(Value::Object(entries)) => {
                let ignored: Vec<String> = document
                    .as_object()
                    .map(|map| map.keys().cloned().collect())
                    .unwrap_or_default();
                if !ignored.is_empty() {
                    warn!(
                        file = %path.display(),
                        keys = ?ignored,
                        "Ignoring top-level keys beside '$schemas'"
                    );
                    report
                        .ignored
                        .extend(ignored.into_iter().map(|key| (path.to_path_buf(), key)));
                }
                for (key, schema) in entries {
                    register(registry, report, format!("{}.{}", stem, key), schema, path)?;
                }
                Ok(())
            }
            Some(_) => Err(LoadError::Collection {
                path: path.to_path_buf(),
            }),
        }
    }
}

fn register(
    registry: &mut MemoryRegistry,
    report: &mut LoadReport,
    name: String,
    schema: Value,
    path: &Path,
) -> Result<(), LoadError> {
    CompiledValidator::compile(&schema).map_err(|source| LoadError::Schema {
        name: name.clone(),
        path: path.to_path_buf(),
        source,
    })?;

    if registry.insert(name.clone(), schema).is_some() {
        debug!(schema = %name, file = %path.display(), "Overwriting schema");
        report.overwritten.push(name.clone());
    }
    debug!(schema = %name, "Loaded schema");
    report.loaded.push(name);
    Ok(())
}
