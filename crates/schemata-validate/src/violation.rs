//! Violations collected by one evaluation pass.

use crate::schema::{ErrorMessages, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Whether a violation concerns a present value or an absent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    Invalid,
    Missing,
}

/// A single failed check.
///
/// The offending value is not stored; the renderer resolves it from the
/// instance through `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// JSON Pointer into the instance.
    pub path: String,
    /// JSON Pointer to the failing keyword in the schema description.
    pub schema_path: String,
    /// Rule code (e.g. "type", "minLength", "required")
    pub code: String,
    pub kind: ViolationKind,
    /// Final message, custom or interpolated.
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Custom error block of the node the violation belongs to.
    #[serde(default)]
    pub errors: ErrorMessages,
}

impl Violation {
    /// Create a violation attributed to `schema`.
    ///
    /// `message` may hold `{param}` placeholders that are filled in by
    /// [`Violation::finish`].
    pub(crate) fn new(
        schema: &Schema,
        kind: ViolationKind,
        path: &str,
        code: &str,
        keyword: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.to_string(),
            schema_path: crate::value::child_pointer(schema.pointer(), keyword),
            code: code.to_string(),
            kind,
            message: message.into(),
            params: BTreeMap::new(),
            title: schema.title.clone(),
            description: schema.description.clone(),
            errors: schema.errors.clone(),
        }
    }

    /// Add a parameter to the violation.
    pub fn param(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.params.insert(key.into(), v);
        }
        self
    }

    /// Override the schema path.
    pub(crate) fn at_schema_path(mut self, schema_path: String) -> Self {
        self.schema_path = schema_path;
        self
    }

    /// Settle the final message: a custom `errors.invalid` / `errors.missing`
    /// wins, otherwise placeholders are interpolated.
    pub(crate) fn finish(mut self) -> Self {
        let custom = match self.kind {
            ViolationKind::Invalid => self.errors.invalid.clone(),
            ViolationKind::Missing => self.errors.missing.clone(),
        };
        self.message = match custom {
            Some(message) => message,
            None => self.interpolate_message(),
        };
        self
    }

    /// Interpolate parameters into the message.
    ///
    /// Replaces `{param_name}` placeholders with actual values.
    pub fn interpolate_message(&self) -> String {
        let mut result = self.message.clone();
        for (key, value) in &self.params {
            let placeholder = format!("{{{}}}", key);
            let replacement = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => value.to_string(),
            };
            result = result.replace(&placeholder, &replacement);
        }
        result
    }

    pub fn is_missing(&self) -> bool {
        self.kind == ViolationKind::Missing
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "[{}] {}: {}", self.code, path, self.message)
    }
}
