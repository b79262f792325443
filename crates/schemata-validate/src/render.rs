//! Error renderer.
//!
//! Turns the violations of one evaluation into a public-safe error report.
//! Rendering is pure: no I/O and no logging.

use crate::error::ErrorKind;
use crate::schema::{Mask, Schema};
use crate::violation::{Violation, ViolationKind};
use http::StatusCode;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Replacement used for `errors.mask: true`.
pub const MASKED: &str = "***MASKED***";

/// Fallback for `errors.invalid`.
pub const DEFAULT_INVALID: &str = "Invalid input.";

/// Fallback for `errors.missing`.
pub const DEFAULT_MISSING: &str = "Missing input.";

/// Title and description of the schema node a violation belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaSummary {
    pub title: String,
    pub description: String,
}

/// The `{invalid, missing}` messages of a node, with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessagePair {
    pub invalid: String,
    pub missing: String,
}

impl Default for MessagePair {
    fn default() -> Self {
        Self {
            invalid: DEFAULT_INVALID.to_string(),
            missing: DEFAULT_MISSING.to_string(),
        }
    }
}

/// One rendered violation.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedViolation {
    pub kind: ErrorKind,
    pub message: String,
    pub path: String,
    pub schema_path: String,
    pub code: String,
    pub params: BTreeMap<String, Value>,
    pub public: bool,
    pub schema: SchemaSummary,
    pub errors: MessagePair,
    /// The offending value, masked when configured. `None` for missing
    /// properties.
    pub value: Option<Value>,
}

/// A structured, public-safe validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedError {
    pub kind: ErrorKind,
    pub message: String,
    pub http_status: StatusCode,
    pub public: bool,
    pub errors: Vec<RenderedViolation>,
}

impl RenderedError {
    /// Number of rendered violations.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Rendered violations at the given instance path.
    pub fn at_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a RenderedViolation> {
        self.errors.iter().filter(move |error| error.path == path)
    }

    /// Serialize into a JSON value.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl fmt::Display for RenderedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RenderedError {}

/// Render `violations` produced by evaluating `instance` against `schema`.
///
/// Offending values are resolved from `instance` through each violation's
/// path. The nearest mask on the way from the root to the violating node
/// decides whether the value is replaced. Unmasked containers still have
/// every masked descendant replaced.
pub fn render(schema: &Schema, instance: &Value, violations: Vec<Violation>) -> RenderedError {
    let errors = violations
        .into_iter()
        .map(|violation| render_violation(violation, schema, instance))
        .collect();

    let message = match schema.title() {
        Some(title) => format!("A validation error occurred in the '{}' validator.", title),
        None => "A validation error occurred in an unnamed validator.".to_string(),
    };

    RenderedError {
        kind: ErrorKind::ValidationError,
        message,
        http_status: StatusCode::BAD_REQUEST,
        public: true,
        errors,
    }
}

fn render_violation(violation: Violation, root: &Schema, instance: &Value) -> RenderedViolation {
    let value = match violation.kind {
        ViolationKind::Missing => None,
        ViolationKind::Invalid => instance
            .pointer(&violation.path)
            .map(|raw| offending_value(&violation, root, raw)),
    };

    let defaults = MessagePair::default();
    RenderedViolation {
        kind: ErrorKind::ValidationError,
        message: violation.message,
        path: violation.path,
        schema_path: violation.schema_path,
        code: violation.code,
        params: violation.params,
        public: true,
        schema: SchemaSummary {
            title: violation.title.unwrap_or_default(),
            description: violation.description.unwrap_or_default(),
        },
        errors: MessagePair {
            invalid: violation.errors.invalid.unwrap_or(defaults.invalid),
            missing: violation.errors.missing.unwrap_or(defaults.missing),
        },
        value,
    }
}

fn offending_value(violation: &Violation, root: &Schema, raw: &Value) -> Value {
    let chain = root.chain_to(&violation.schema_path);
    let mask = violation
        .errors
        .mask
        .as_ref()
        .or_else(|| chain.iter().rev().find_map(|node| node.errors.mask.as_ref()));
    if let Some(replacement) = mask.and_then(replacement) {
        return replacement;
    }
    // Undeclared members have no schema of their own.
    if matches!(
        violation.code.as_str(),
        "additionalProperties" | "additionalItems"
    ) {
        return raw.clone();
    }
    match chain.last() {
        Some(node) => redact_within(node, raw),
        None => raw.clone(),
    }
}

fn replacement(mask: &Mask) -> Option<Value> {
    match mask {
        Mask::Flag(false) => None,
        Mask::Flag(true) => Some(Value::String(MASKED.to_string())),
        Mask::Replacement(replacement) => Some(Value::String(replacement.clone())),
    }
}

/// `value` with every part covered by a masked node of `schema` replaced.
fn redact(schema: &Schema, value: &Value) -> Value {
    match schema.errors.mask.as_ref().and_then(replacement) {
        Some(replacement) => replacement,
        None => redact_within(schema, value),
    }
}

fn redact_within(schema: &Schema, value: &Value) -> Value {
    let mut redacted = match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, member)| {
                    let member = match schema.property_or_additional(key) {
                        Some(child) => redact(child, member),
                        None => member.clone(),
                    };
                    (key.clone(), member)
                })
                .collect(),
        ),
        Value::Array(elements) => Value::Array(
            elements
                .iter()
                .enumerate()
                .map(|(index, element)| match schema.element(index) {
                    Some(child) => redact(child, element),
                    None => element.clone(),
                })
                .collect(),
        ),
        other => other.clone(),
    };
    for applicator in schema.applicators() {
        redacted = redact(applicator, &redacted);
    }
    redacted
}

// Wire shape: {"type", "message", "details": {...}}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViolationDetails<'a> {
    path: &'a str,
    public: bool,
    code: &'a str,
    schema_path: &'a str,
    #[serde(skip_serializing_if = "no_params")]
    params: &'a BTreeMap<String, Value>,
    schema: &'a SchemaSummary,
    errors: &'a MessagePair,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a Value>,
}

fn no_params(params: &&BTreeMap<String, Value>) -> bool {
    params.is_empty()
}

#[derive(Serialize)]
struct ViolationWrapper<'a> {
    #[serde(rename = "type")]
    kind: ErrorKind,
    message: &'a str,
    details: ViolationDetails<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDetails<'a> {
    public: bool,
    http_status_code: u16,
    errors: &'a [RenderedViolation],
}

#[derive(Serialize)]
struct ErrorWrapper<'a> {
    #[serde(rename = "type")]
    kind: ErrorKind,
    message: &'a str,
    details: ErrorDetails<'a>,
}

impl Serialize for RenderedViolation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wrapper = ViolationWrapper {
            kind: self.kind,
            message: &self.message,
            details: ViolationDetails {
                path: &self.path,
                public: self.public,
                code: &self.code,
                schema_path: &self.schema_path,
                params: &self.params,
                schema: &self.schema,
                errors: &self.errors,
                value: self.value.as_ref(),
            },
        };
        wrapper.serialize(serializer)
    }
}

impl Serialize for RenderedError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wrapper = ErrorWrapper {
            kind: self.kind,
            message: &self.message,
            details: ErrorDetails {
                public: self.public,
                http_status_code: self.http_status.as_u16(),
                errors: &self.errors,
            },
        };
        wrapper.serialize(serializer)
    }
}
