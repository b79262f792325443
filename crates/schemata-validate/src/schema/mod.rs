//! Typed schema tree.
//!
//! A raw schema description is normalized once by [`Schema::compile`]; the
//! evaluator only ever walks this tree and never re-inspects the raw JSON.

mod compile;

use crate::value::is_whole;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// JSON kind named by a `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceKind {
    String,
    Number,
    /// A number without a fractional part.
    Integer,
    Boolean,
    Object,
    Array,
    Null,
    /// Matches every instance.
    Any,
}

impl InstanceKind {
    /// Parse a kind name.
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "string" => InstanceKind::String,
            "number" => InstanceKind::Number,
            "integer" => InstanceKind::Integer,
            "boolean" => InstanceKind::Boolean,
            "object" => InstanceKind::Object,
            "array" => InstanceKind::Array,
            "null" => InstanceKind::Null,
            "any" => InstanceKind::Any,
            _ => return None,
        })
    }

    /// The kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceKind::String => "string",
            InstanceKind::Number => "number",
            InstanceKind::Integer => "integer",
            InstanceKind::Boolean => "boolean",
            InstanceKind::Object => "object",
            InstanceKind::Array => "array",
            InstanceKind::Null => "null",
            InstanceKind::Any => "any",
        }
    }

    /// Whether `instance` is of this kind.
    pub fn matches(&self, instance: &Value) -> bool {
        match (self, instance) {
            (InstanceKind::Any, _) => true,
            (InstanceKind::String, Value::String(_)) => true,
            (InstanceKind::Number, Value::Number(_)) => true,
            (InstanceKind::Integer, Value::Number(n)) => is_whole(n),
            (InstanceKind::Boolean, Value::Bool(_)) => true,
            (InstanceKind::Object, Value::Object(_)) => true,
            (InstanceKind::Array, Value::Array(_)) => true,
            (InstanceKind::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for InstanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized type or combinator rule.
#[derive(Debug, Clone)]
pub enum TypeRule {
    /// `type: "<kind>"`.
    Single(InstanceKind),
    /// At least one branch must accept the instance.
    ///
    /// `keyword` is `"type"` for a legacy type list and `"anyOf"` otherwise.
    AnyOf {
        keyword: &'static str,
        branches: Vec<Schema>,
    },
    /// Exactly one branch must accept the instance.
    OneOf(Vec<Schema>),
    /// Every branch must accept the instance.
    AllOf(Vec<Schema>),
}

/// How undeclared properties or trailing array items are treated.
#[derive(Debug, Clone, Default)]
pub enum Additional {
    #[default]
    Allow,
    Deny,
    Schema(Box<Schema>),
}

/// The `items` rule of an array schema.
#[derive(Debug, Clone, Default)]
pub enum Items {
    #[default]
    Any,
    /// Every element must match.
    Single(Box<Schema>),
    /// Positional schemas; elements past the tuple fall to `additionalItems`.
    Tuple(Vec<Schema>),
}

/// Masking configuration from `errors.mask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Mask {
    /// `true` masks with `***MASKED***`; `false` disables masking.
    Flag(bool),
    /// Masks with the given replacement.
    Replacement(String),
}

/// The custom `errors` block of a schema node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorMessages {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<Mask>,
}

#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    pub(crate) source: String,
    pub(crate) regex: Regex,
}

/// A compiled schema node.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub(crate) pointer: String,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) errors: ErrorMessages,
    /// `false` boolean schema.
    pub(crate) never: bool,
    pub(crate) types: Vec<TypeRule>,
    pub(crate) not: Option<Box<Schema>>,
    pub(crate) disallow: Vec<Schema>,
    pub(crate) properties: Vec<(String, Schema)>,
    pub(crate) required: Vec<String>,
    pub(crate) required_flag: Option<bool>,
    pub(crate) additional_properties: Additional,
    pub(crate) items: Items,
    pub(crate) additional_items: Additional,
    pub(crate) min_items: Option<usize>,
    pub(crate) max_items: Option<usize>,
    pub(crate) unique_items: bool,
    pub(crate) min_length: Option<usize>,
    pub(crate) max_length: Option<usize>,
    pub(crate) pattern: Option<Pattern>,
    pub(crate) minimum: Option<Number>,
    pub(crate) maximum: Option<Number>,
    pub(crate) enumeration: Option<Vec<Value>>,
    pub(crate) constant: Option<Value>,
}

impl Schema {
    /// JSON Pointer of this node within the root schema description.
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The node's custom error messages and mask.
    pub fn errors(&self) -> &ErrorMessages {
        &self.errors
    }

    /// Normalized type and combinator rules, in declaration order.
    pub fn type_rules(&self) -> &[TypeRule] {
        &self.types
    }

    /// Effective required property names: the `required` array followed by
    /// properties flagged `required: true`, without duplicates.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Declared properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.properties.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    /// Look up a declared property schema.
    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, schema)| schema)
    }

    pub fn items(&self) -> &Items {
        &self.items
    }

    /// Schema for the value under `key` of an object instance.
    pub(crate) fn property_or_additional(&self, key: &str) -> Option<&Schema> {
        self.property(key).or(match &self.additional_properties {
            Additional::Schema(extra) => Some(&**extra),
            _ => None,
        })
    }

    /// Schema for the element at `index` of an array instance.
    pub(crate) fn element(&self, index: usize) -> Option<&Schema> {
        match &self.items {
            Items::Single(item) => Some(&**item),
            Items::Tuple(tuple) if index < tuple.len() => Some(&tuple[index]),
            Items::Any | Items::Tuple(_) => match &self.additional_items {
                Additional::Schema(item) => Some(&**item),
                _ => None,
            },
        }
    }

    /// Subschemas applied to the same instance as this node.
    pub(crate) fn applicators(&self) -> impl Iterator<Item = &Schema> {
        self.types
            .iter()
            .flat_map(|rule| match rule {
                TypeRule::AnyOf { branches, .. } => branches.as_slice(),
                TypeRule::OneOf(branches) | TypeRule::AllOf(branches) => branches.as_slice(),
                TypeRule::Single(_) => &[],
            })
            .chain(self.not.as_deref())
            .chain(self.disallow.iter())
    }

    /// Every direct subschema.
    pub(crate) fn children(&self) -> Vec<&Schema> {
        let mut children: Vec<&Schema> = self.applicators().collect();
        children.extend(self.properties.iter().map(|(_, schema)| schema));
        for additional in [&self.additional_properties, &self.additional_items] {
            if let Additional::Schema(schema) = additional {
                children.push(schema);
            }
        }
        match &self.items {
            Items::Any => {}
            Items::Single(item) => children.push(item),
            Items::Tuple(tuple) => children.extend(tuple.iter()),
        }
        children
    }

    /// The chain of nodes from this one down to the deepest node whose
    /// pointer is a prefix of `schema_path`.
    pub(crate) fn chain_to(&self, schema_path: &str) -> Vec<&Schema> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(next) = current
            .children()
            .into_iter()
            .find(|child| pointer_contains(&child.pointer, schema_path))
        {
            chain.push(next);
            current = next;
        }
        chain
    }
}

fn pointer_contains(prefix: &str, pointer: &str) -> bool {
    match pointer.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
