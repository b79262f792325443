//! Error types for schema compilation and validation.

use crate::render::RenderedError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable error kind identifiers exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The instance failed one or more schema constraints.
    ValidationError,
    /// The requested schema name is not registered.
    UnknownSchema,
    /// The schema description itself is malformed.
    InvalidSchema,
}

impl ErrorKind {
    /// Get the kind identifier as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::UnknownSchema => "UnknownSchema",
            ErrorKind::InvalidSchema => "InvalidSchema",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A schema description could not be compiled.
///
/// Every variant carries the JSON Pointer of the offending schema node.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A node that must be a schema is neither an object nor a boolean.
    #[error("schema node at '{pointer}' must be an object or a boolean, found {found}")]
    NotASchema {
        /// Pointer to the node.
        pointer: String,
        /// JSON kind that was found instead.
        found: &'static str,
    },

    /// A keyword has a value of the wrong shape.
    #[error("invalid '{keyword}' at '{pointer}': {reason}")]
    InvalidKeyword {
        /// Pointer to the node declaring the keyword.
        pointer: String,
        /// The keyword.
        keyword: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// `type` names a kind outside the dialect.
    #[error("unknown type '{name}' at '{pointer}'")]
    UnknownType {
        /// Pointer to the node.
        pointer: String,
        /// The unrecognized kind name.
        name: String,
    },

    /// `pattern` is not a valid regular expression.
    #[error("invalid pattern '{pattern}' at '{pointer}': {reason}")]
    InvalidPattern {
        /// Pointer to the node.
        pointer: String,
        /// The pattern source.
        pattern: String,
        /// Regex compiler message.
        reason: String,
    },

    /// A keyword the dialect deliberately rejects instead of ignoring.
    #[error("unsupported keyword '{keyword}' at '{pointer}'")]
    Unsupported {
        /// Pointer to the node.
        pointer: String,
        /// The keyword.
        keyword: &'static str,
    },
}

impl SchemaError {
    /// Pointer to the schema node that failed to compile.
    pub fn pointer(&self) -> &str {
        match self {
            SchemaError::NotASchema { pointer, .. }
            | SchemaError::InvalidKeyword { pointer, .. }
            | SchemaError::UnknownType { pointer, .. }
            | SchemaError::InvalidPattern { pointer, .. }
            | SchemaError::Unsupported { pointer, .. } => pointer,
        }
    }
}

/// Configuration error raised by the validation facade.
///
/// These are never instance failures: an unknown schema name or a malformed
/// schema is a caller mistake and is surfaced immediately.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidateError {
    /// No schema is registered under the requested name.
    #[error("Could not validate data; unknown schema name ({name}).")]
    UnknownSchema {
        /// The requested name.
        name: String,
    },

    /// The schema could not be compiled.
    #[error("Could not compile schema: {0}")]
    Schema(#[from] SchemaError),
}

impl ValidateError {
    /// Create an unknown-schema error.
    pub fn unknown_schema(name: impl Into<String>) -> Self {
        ValidateError::UnknownSchema { name: name.into() }
    }

    /// The stable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidateError::UnknownSchema { .. } => ErrorKind::UnknownSchema,
            ValidateError::Schema(_) => ErrorKind::InvalidSchema,
        }
    }

    /// The schema name this error refers to, if any.
    pub fn schema_name(&self) -> Option<&str> {
        match self {
            ValidateError::UnknownSchema { name } => Some(name),
            ValidateError::Schema(_) => None,
        }
    }
}

/// Either kind of failure, for the convenience `check_*` entry points.
#[derive(Debug, Clone, Error)]
pub enum ValidationFailure {
    /// The instance is invalid.
    #[error(transparent)]
    Invalid(#[from] RenderedError),

    /// The schema could not be resolved or compiled.
    #[error(transparent)]
    Config(#[from] ValidateError),
}

impl ValidationFailure {
    /// The stable kind of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationFailure::Invalid(error) => error.kind,
            ValidationFailure::Config(error) => error.kind(),
        }
    }

    /// The rendered validation error, if the instance was invalid.
    pub fn rendered(&self) -> Option<&RenderedError> {
        match self {
            ValidationFailure::Invalid(error) => Some(error),
            ValidationFailure::Config(_) => None,
        }
    }
}
