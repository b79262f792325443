//! Compiled validators and validation results.

use crate::cache::SchemaKey;
use crate::error::SchemaError;
use crate::evaluate::evaluate;
use crate::render::{render, RenderedError};
use crate::schema::Schema;
use crate::violation::Violation;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A reusable validator bound to one schema description.
///
/// Holds no per-instance state. Cloning shares the compiled schema.
#[derive(Clone)]
pub struct CompiledValidator {
    inner: Arc<Inner>,
}

struct Inner {
    key: SchemaKey,
    source: Value,
    schema: Schema,
}

impl CompiledValidator {
    /// Compile a schema description.
    pub fn compile(description: &Value) -> Result<Self, SchemaError> {
        Self::compile_with_key(description, SchemaKey::of(description))
    }

    pub(crate) fn compile_with_key(description: &Value, key: SchemaKey) -> Result<Self, SchemaError> {
        let schema = Schema::compile(description)?;
        Ok(Self {
            inner: Arc::new(Inner {
                key,
                source: description.clone(),
                schema,
            }),
        })
    }

    /// Content key of the source description.
    pub fn key(&self) -> SchemaKey {
        self.inner.key
    }

    /// The root schema title, if any.
    pub fn title(&self) -> Option<&str> {
        self.inner.schema.title()
    }

    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    /// The description this validator was compiled from.
    pub fn source(&self) -> &Value {
        &self.inner.source
    }

    /// Raw violations for `instance`.
    pub fn evaluate(&self, instance: &Value) -> Vec<Violation> {
        evaluate(&self.inner.schema, instance)
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.evaluate(instance).is_empty()
    }

    /// Validate `instance`, rendering the error report on failure.
    pub fn validate(&self, instance: &Value) -> ValidationResult {
        let violations = self.evaluate(instance);
        if violations.is_empty() {
            ValidationResult::success()
        } else {
            ValidationResult::failure(render(&self.inner.schema, instance, violations))
        }
    }
}

impl fmt::Debug for CompiledValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledValidator")
            .field("key", &self.inner.key)
            .field("title", &self.title())
            .finish()
    }
}

/// Outcome of validating one instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RenderedError>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn failure(error: RenderedError) -> Self {
        Self {
            valid: false,
            error: Some(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn error(&self) -> Option<&RenderedError> {
        self.error.as_ref()
    }

    /// Convert to Result - Ok if valid, Err with the rendered error otherwise.
    pub fn into_result(self) -> Result<(), RenderedError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn validator_is_send_and_sync() {
        assert_send_sync::<CompiledValidator>();
    }

    #[test]
    fn validate_success_and_failure() {
        let validator = CompiledValidator::compile(&json!({
            "title": "Nonce",
            "type": "string",
            "minLength": 8,
            "maxLength": 64
        }))
        .unwrap();
        assert_eq!(validator.title(), Some("Nonce"));

        let ok = validator.validate(&json!("12345678"));
        assert!(ok.is_valid());
        assert!(ok.into_result().is_ok());

        let failed = validator.validate(&json!("1234567"));
        assert!(!failed.valid);
        let error = failed.into_result().unwrap_err();
        assert_eq!(error.kind, ErrorKind::ValidationError);
        assert_eq!(error.len(), 1);
    }

    #[test]
    fn source_is_kept() {
        let description = json!({"type": "boolean"});
        let validator = CompiledValidator::compile(&description).unwrap();
        assert_eq!(validator.source(), &description);
        assert_eq!(validator.key(), SchemaKey::of(&description));
        assert!(validator.is_valid(&json!(false)));
        assert!(!validator.is_valid(&json!("false")));
    }

    #[test]
    fn result_serializes_without_error_when_valid() {
        assert_eq!(
            serde_json::to_value(ValidationResult::success()).unwrap(),
            json!({"valid": true})
        );
    }
}
