//! Constraint evaluator.
//!
//! Walks a compiled [`Schema`] against an instance and collects every
//! violation. Sibling constraints never short-circuit each other; the only
//! suppression is that a node whose `type` check failed reports nothing else.

use crate::schema::{Additional, Items, Schema, TypeRule};
use crate::value::{child_pointer, index_pointer, json_equal, kind_name};
use crate::violation::{Violation, ViolationKind};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// Evaluate `instance` against `schema`, returning all violations in a
/// deterministic order.
///
/// Evaluation never fails; an empty result means the instance is valid.
pub fn evaluate(schema: &Schema, instance: &Value) -> Vec<Violation> {
    let mut violations = Vec::new();
    walk(schema, instance, "", &mut violations);
    violations
}

/// Whether `instance` satisfies `schema`.
pub(crate) fn accepts(schema: &Schema, instance: &Value) -> bool {
    let mut scratch = Vec::new();
    walk(schema, instance, "", &mut scratch);
    scratch.is_empty()
}

fn walk(schema: &Schema, instance: &Value, path: &str, out: &mut Vec<Violation>) {
    if schema.never {
        out.push(
            Violation::new(
                schema,
                ViolationKind::Invalid,
                path,
                "false",
                "",
                "No value is allowed here",
            )
            .at_schema_path(schema.pointer.clone())
            .finish(),
        );
        return;
    }

    if !check_types(schema, instance, path, out) {
        return;
    }

    if let Some(excluded) = &schema.not {
        if accepts(excluded, instance) {
            out.push(
                Violation::new(
                    schema,
                    ViolationKind::Invalid,
                    path,
                    "not",
                    "not",
                    "Value must not match the excluded schema",
                )
                .finish(),
            );
        }
    }

    if schema.disallow.iter().any(|d| accepts(d, instance)) {
        out.push(
            Violation::new(
                schema,
                ViolationKind::Invalid,
                path,
                "disallow",
                "disallow",
                "Value of kind {actual} is not allowed",
            )
            .param("actual", kind_name(instance))
            .finish(),
        );
    }

    if let Some(allowed) = &schema.enumeration {
        if !allowed.iter().any(|candidate| json_equal(candidate, instance)) {
            out.push(
                Violation::new(
                    schema,
                    ViolationKind::Invalid,
                    path,
                    "enum",
                    "enum",
                    "Value must be one of {allowed}",
                )
                .param("allowed", allowed)
                .finish(),
            );
        }
    }

    if let Some(expected) = &schema.constant {
        if !json_equal(expected, instance) {
            out.push(
                Violation::new(
                    schema,
                    ViolationKind::Invalid,
                    path,
                    "const",
                    "const",
                    "Value must be equal to {expected}",
                )
                .param("expected", expected)
                .finish(),
            );
        }
    }

    match instance {
        Value::String(text) => check_string(schema, text, path, out),
        Value::Number(number) => check_number(schema, number, path, out),
        Value::Array(elements) => check_array(schema, elements, path, out),
        Value::Object(map) => check_object(schema, map, path, out),
        Value::Bool(_) | Value::Null => {}
    }
}

/// Apply type and combinator rules. Returns `false` when the `type`
/// keyword rejected the instance.
fn check_types(schema: &Schema, instance: &Value, path: &str, out: &mut Vec<Violation>) -> bool {
    let mut type_matched = true;

    for rule in &schema.types {
        match rule {
            TypeRule::Single(kind) => {
                if !kind.matches(instance) {
                    type_matched = false;
                    out.push(
                        Violation::new(
                            schema,
                            ViolationKind::Invalid,
                            path,
                            "type",
                            "type",
                            "Expected {expected} but found {actual}",
                        )
                        .param("expected", kind.as_str())
                        .param("actual", kind_name(instance))
                        .finish(),
                    );
                }
            }
            TypeRule::AnyOf { keyword, branches } => {
                if !branches.iter().any(|branch| accepts(branch, instance)) {
                    let violation = if *keyword == "type" {
                        type_matched = false;
                        Violation::new(
                            schema,
                            ViolationKind::Invalid,
                            path,
                            "type",
                            keyword,
                            "Expected one of {expected} but found {actual}",
                        )
                        .param("expected", describe_branches(branches))
                        .param("actual", kind_name(instance))
                    } else {
                        Violation::new(
                            schema,
                            ViolationKind::Invalid,
                            path,
                            "anyOf",
                            keyword,
                            "Value does not match any of the {count} allowed alternatives",
                        )
                        .param("count", branches.len())
                    };
                    out.push(violation.finish());
                }
            }
            TypeRule::OneOf(branches) => {
                let matched = branches
                    .iter()
                    .filter(|branch| accepts(branch, instance))
                    .count();
                if matched != 1 {
                    out.push(
                        Violation::new(
                            schema,
                            ViolationKind::Invalid,
                            path,
                            "oneOf",
                            "oneOf",
                            "Value must match exactly one alternative but matched {matched}",
                        )
                        .param("matched", matched)
                        .finish(),
                    );
                }
            }
            TypeRule::AllOf(branches) => {
                for branch in branches {
                    walk(branch, instance, path, out);
                }
            }
        }
    }

    type_matched
}

fn describe_branches(branches: &[Schema]) -> String {
    branches
        .iter()
        .map(|branch| match branch.type_rules() {
            [TypeRule::Single(kind)] => kind.as_str(),
            _ => "schema",
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_string(schema: &Schema, text: &str, path: &str, out: &mut Vec<Violation>) {
    let length = text.chars().count();

    if let Some(min) = schema.min_length {
        if length < min {
            out.push(
                Violation::new(
                    schema,
                    ViolationKind::Invalid,
                    path,
                    "minLength",
                    "minLength",
                    "Length must be at least {min} characters",
                )
                .param("min", min)
                .param("actual", length)
                .finish(),
            );
        }
    }

    if let Some(max) = schema.max_length {
        if length > max {
            out.push(
                Violation::new(
                    schema,
                    ViolationKind::Invalid,
                    path,
                    "maxLength",
                    "maxLength",
                    "Length must be at most {max} characters",
                )
                .param("max", max)
                .param("actual", length)
                .finish(),
            );
        }
    }

    if let Some(pattern) = &schema.pattern {
        if !pattern.regex.is_match(text) {
            out.push(
                Violation::new(
                    schema,
                    ViolationKind::Invalid,
                    path,
                    "pattern",
                    "pattern",
                    "Value does not match pattern {pattern}",
                )
                .param("pattern", &pattern.source)
                .finish(),
            );
        }
    }
}

fn check_number(schema: &Schema, number: &Number, path: &str, out: &mut Vec<Violation>) {
    if let Some(min) = &schema.minimum {
        if compare_numbers(number, min) == Some(Ordering::Less) {
            out.push(
                Violation::new(
                    schema,
                    ViolationKind::Invalid,
                    path,
                    "minimum",
                    "minimum",
                    "Value must be at least {min}",
                )
                .param("min", min)
                .finish(),
            );
        }
    }

    if let Some(max) = &schema.maximum {
        if compare_numbers(number, max) == Some(Ordering::Greater) {
            out.push(
                Violation::new(
                    schema,
                    ViolationKind::Invalid,
                    path,
                    "maximum",
                    "maximum",
                    "Value must be at most {max}",
                )
                .param("max", max)
                .finish(),
            );
        }
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

fn check_array(schema: &Schema, elements: &[Value], path: &str, out: &mut Vec<Violation>) {
    let trailing_from = match &schema.items {
        Items::Any => elements.len(),
        Items::Single(item) => {
            for (index, element) in elements.iter().enumerate() {
                walk(item, element, &index_pointer(path, index), out);
            }
            elements.len()
        }
        Items::Tuple(tuple) => {
            for (item, (index, element)) in tuple.iter().zip(elements.iter().enumerate()) {
                walk(item, element, &index_pointer(path, index), out);
            }
            tuple.len().min(elements.len())
        }
    };

    for (index, element) in elements.iter().enumerate().skip(trailing_from) {
        let element_path = index_pointer(path, index);
        match &schema.additional_items {
            Additional::Allow => {}
            Additional::Schema(item) => walk(item, element, &element_path, out),
            Additional::Deny => out.push(
                Violation::new(
                    schema,
                    ViolationKind::Invalid,
                    &element_path,
                    "additionalItems",
                    "additionalItems",
                    "Array may contain at most {max} items",
                )
                .param("max", trailing_from)
                .finish(),
            ),
        }
    }

    if let Some(min) = schema.min_items {
        if elements.len() < min {
            out.push(
                Violation::new(
                    schema,
                    ViolationKind::Invalid,
                    path,
                    "minItems",
                    "minItems",
                    "Array must contain at least {min} items",
                )
                .param("min", min)
                .param("actual", elements.len())
                .finish(),
            );
        }
    }

    if let Some(max) = schema.max_items {
        if elements.len() > max {
            out.push(
                Violation::new(
                    schema,
                    ViolationKind::Invalid,
                    path,
                    "maxItems",
                    "maxItems",
                    "Array must contain at most {max} items",
                )
                .param("max", max)
                .param("actual", elements.len())
                .finish(),
            );
        }
    }

    if schema.unique_items {
        if let Some((first, second)) = first_duplicate(elements) {
            out.push(
                Violation::new(
                    schema,
                    ViolationKind::Invalid,
                    path,
                    "uniqueItems",
                    "uniqueItems",
                    "Array items must be unique; items {first} and {second} are equal",
                )
                .param("first", first)
                .param("second", second)
                .finish(),
            );
        }
    }
}

fn first_duplicate(elements: &[Value]) -> Option<(usize, usize)> {
    for (i, a) in elements.iter().enumerate() {
        for (j, b) in elements.iter().enumerate().skip(i + 1) {
            if json_equal(a, b) {
                return Some((i, j));
            }
        }
    }
    None
}

fn check_object(schema: &Schema, map: &Map<String, Value>, path: &str, out: &mut Vec<Violation>) {
    for name in &schema.required {
        if map.contains_key(name) {
            continue;
        }
        // Missing properties take their metadata from the property schema when
        // one is declared.
        let owner = schema.property(name).unwrap_or(schema);
        out.push(
            Violation::new(
                owner,
                ViolationKind::Missing,
                &child_pointer(path, name),
                "required",
                "required",
                "Missing required property '{property}'",
            )
            .at_schema_path(child_pointer(&schema.pointer, "required"))
            .param("property", name)
            .finish(),
        );
    }

    for (name, property) in &schema.properties {
        if let Some(value) = map.get(name) {
            walk(property, value, &child_pointer(path, name), out);
        }
    }

    if matches!(schema.additional_properties, Additional::Allow) {
        return;
    }
    for (name, value) in map {
        if schema.property(name).is_some() {
            continue;
        }
        let property_path = child_pointer(path, name);
        match &schema.additional_properties {
            Additional::Allow => {}
            Additional::Schema(extra) => walk(extra, value, &property_path, out),
            Additional::Deny => out.push(
                Violation::new(
                    schema,
                    ViolationKind::Invalid,
                    &property_path,
                    "additionalProperties",
                    "additionalProperties",
                    "Property '{property}' is not allowed",
                )
                .param("property", name)
                .finish(),
            ),
        }
    }
}
