//! Loader configuration with environment variable support.
//!
//! Variables are read with the `SCHEMATA_` prefix:
//!
//! | Variable                 | Field          | Format                |
//! |--------------------------|----------------|-----------------------|
//! | `SCHEMATA_SCHEMA_PATHS`  | `schema_paths` | comma-separated paths |
//! | `SCHEMATA_SKIP`          | `skip`         | comma-separated names |
//! | `SCHEMATA_EXTENSION`     | `extension`    | e.g. `json`           |

use serde::Deserialize;
use std::path::PathBuf;

/// Prefix of every environment variable the loader reads.
pub const ENV_PREFIX: &str = "SCHEMATA_";

/// Extension of schema files when none is configured.
pub const DEFAULT_EXTENSION: &str = "json";

/// Error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable deserialization failed.
    #[error("Configuration error: {0}")]
    Env(#[from] envy::Error),
}

/// Where schemas are loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Directories scanned in order; later directories overwrite earlier ones.
    pub schema_paths: Vec<PathBuf>,
    /// File names (with extension) to leave out.
    pub skip: Vec<String>,
    /// Extension of schema files, without the leading dot.
    pub extension: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            schema_paths: Vec::new(),
            skip: Vec::new(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct EnvConfig {
    #[serde(default)]
    schema_paths: Vec<String>,
    #[serde(default)]
    skip: Vec<String>,
    #[serde(default)]
    extension: Option<String>,
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the configuration from `SCHEMATA_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env: EnvConfig = envy::prefixed(ENV_PREFIX).from_env()?;

        let mut config = Self::default();
        for path in env.schema_paths.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
            config = config.schema_path(path);
        }
        for file in env.skip.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            config = config.skip(file);
        }
        if let Some(extension) = env.extension.as_deref().map(str::trim) {
            if !extension.is_empty() {
                config = config.extension(extension);
            }
        }
        Ok(config)
    }

    /// Add a directory to scan.
    pub fn schema_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_paths.push(path.into());
        self
    }

    /// Leave the file `name` out of every scanned directory.
    pub fn skip(mut self, name: impl Into<String>) -> Self {
        self.skip.push(name.into());
        self
    }

    /// Set the schema file extension; a leading dot is ignored.
    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Whether `file_name` is on the skip list.
    pub fn is_skipped(&self, file_name: &str) -> bool {
        self.skip.iter().any(|s| s == file_name)
    }
}

/// Load environment variables from a `.env` file in the current directory.
///
/// A missing file is not an error; variables already set take precedence.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Load environment variables from the file at `path`.
pub fn load_dotenv_from<P: AsRef<std::path::Path>>(path: P) {
    let _ = dotenvy::from_path(path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var("SCHEMATA_SCHEMA_PATHS");
        std::env::remove_var("SCHEMATA_SKIP");
        std::env::remove_var("SCHEMATA_EXTENSION");
    }

    #[test]
    fn builder_defaults() {
        let config = LoaderConfig::new()
            .schema_path("/srv/schemas")
            .skip("draft.json")
            .extension(".schema");
        assert_eq!(config.schema_paths, [PathBuf::from("/srv/schemas")]);
        assert!(config.is_skipped("draft.json"));
        assert!(!config.is_skipped("final.json"));
        assert_eq!(config.extension, "schema");
        assert_eq!(LoaderConfig::default().extension, DEFAULT_EXTENSION);
    }

    #[test]
    #[serial]
    fn from_env_unset_keeps_defaults() {
        clear_env();
        assert_eq!(LoaderConfig::from_env().unwrap(), LoaderConfig::default());
    }

    #[test]
    #[serial]
    fn from_env_reads_lists() {
        clear_env();
        std::env::set_var("SCHEMATA_SCHEMA_PATHS", "/a, /b");
        std::env::set_var("SCHEMATA_SKIP", "old.json");
        std::env::set_var("SCHEMATA_EXTENSION", "js");

        let config = LoaderConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.schema_paths, [PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(config.skip, ["old.json"]);
        assert_eq!(config.extension, "js");
    }

    #[test]
    #[serial]
    fn dotenv_file_feeds_from_env() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SCHEMATA_SKIP=a.json,b.json").unwrap();

        load_dotenv_from(file.path());
        let config = LoaderConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.skip, ["a.json", "b.json"]);
    }
}
