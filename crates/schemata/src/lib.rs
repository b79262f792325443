//! # schemata
//!
//! Declarative JSON schema validation.
//!
//! Schemas are plain JSON descriptions, registered by name or passed
//! directly. Validation never stops at the first problem: every violation
//! is collected and rendered into a public-safe error carrying the path,
//! the offending value (masked where configured) and human-readable
//! messages.
//!
//! ## Quick Start
//!
//! ```rust
//! use schemata::prelude::*;
//! use serde_json::json;
//!
//! let validation = schemata::with_builtins();
//!
//! assert!(validation.validate_by_name("nonce", &json!("12345678")).unwrap().valid);
//!
//! let result = validation.validate_by_name("slug", &json!("-bad")).unwrap();
//! let error = result.error.unwrap();
//! assert_eq!(error.errors[0].message, "The slug must start with a letter or number, contain only lowercase letters, numbers, hyphens, periods, underscores, and tildes. It must between 3 and 40 characters in length.");
//! ```
//!
//! ## Optional Features
//!
//! - `loader` (default) - load schema directories, configured through
//!   `SCHEMATA_*` environment variables
//! - `tower` (default) - [`ValidationLayer`] for `http::Request<Value>` services

pub use schemata_validate::*;

/// Built-in schema builders.
pub use schemata_schemas as schemas;

#[cfg(feature = "loader")]
pub use schemata_loader as loader;
#[cfg(feature = "loader")]
pub use schemata_loader::{LoadError, LoaderConfig, SchemaLoader};

/// Errors from [`from_env`].
#[cfg(feature = "loader")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] schemata_loader::ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// A facade over the built-in schemas.
pub fn with_builtins() -> Validation {
    Validation::new(schemata_schemas::registry())
}

/// A facade over the built-in schemas plus every directory configured
/// through `SCHEMATA_*` environment variables (and `.env`).
///
/// Loaded schemas replace built-ins of the same name.
#[cfg(feature = "loader")]
pub fn from_env() -> Result<Validation, Error> {
    schemata_loader::load_dotenv();
    let config = LoaderConfig::from_env()?;
    let mut registry = schemata_schemas::registry();
    SchemaLoader::new(config).load_into(&mut registry)?;
    Ok(Validation::new(registry))
}

/// Prelude module - import everything you need with `use schemata::prelude::*`
pub mod prelude {
    pub use schemata_validate::prelude::*;
    pub use schemata_validate::{ErrorKind, RenderedViolation, Violation};

    pub use schemata_schemas::{
        comment, credential, description, email, id_or_object_with_id, identifier, json_patch,
        jsonld_context, jsonld_type, label, linked_data_signature, nonce, person_name,
        private_key_pem, proof, public_key_pem, sequenced_patch, slug, title, url,
        verifiable_credential, verifiable_presentation, w3c_date_time, EmailOptions,
    };

    #[cfg(feature = "loader")]
    pub use schemata_loader::{LoaderConfig, SchemaLoader};

    pub use serde_json::{json, Value};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_imports_work() {
        let validation = crate::with_builtins();
        let schema = nonce(Some(&json!({"title": "Session nonce"})));
        let result = validation.validate_instance(&json!("short"), &schema).unwrap();
        assert_eq!(
            result.error.unwrap().message,
            "A validation error occurred in the 'Session nonce' validator."
        );
    }
}
