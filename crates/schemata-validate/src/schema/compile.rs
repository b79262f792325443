//! Normalization of raw schema descriptions into [`Schema`] trees.

use super::{Additional, ErrorMessages, InstanceKind, Items, Pattern, Schema, TypeRule};
use crate::error::SchemaError;
use crate::value::{child_pointer, index_pointer, kind_name};
use regex::Regex;
use serde_json::{Map, Value};

impl Schema {
    /// Compile a raw schema description.
    ///
    /// Unknown keywords are ignored. Malformed known keywords are rejected
    /// with the JSON Pointer of the offending node.
    ///
    /// # Example
    ///
    /// ```rust
    /// use schemata_validate::Schema;
    /// use serde_json::json;
    ///
    /// let schema = Schema::compile(&json!({"type": "string", "minLength": 3})).unwrap();
    /// assert_eq!(schema.pointer(), "");
    ///
    /// assert!(Schema::compile(&json!({"type": "strnig"})).is_err());
    /// ```
    pub fn compile(description: &Value) -> Result<Schema, SchemaError> {
        compile_node(description, String::new())
    }
}

fn compile_node(value: &Value, pointer: String) -> Result<Schema, SchemaError> {
    match value {
        Value::Bool(accept) => Ok(Schema {
            pointer,
            never: !accept,
            ..Schema::default()
        }),
        Value::Object(map) => compile_object(map, pointer),
        other => Err(SchemaError::NotASchema {
            pointer,
            found: kind_name(other),
        }),
    }
}

fn compile_object(map: &Map<String, Value>, pointer: String) -> Result<Schema, SchemaError> {
    if map.contains_key("$ref") {
        return Err(SchemaError::Unsupported {
            pointer,
            keyword: "$ref",
        });
    }

    let mut schema = Schema {
        title: string_keyword(map, &pointer, "title")?,
        description: string_keyword(map, &pointer, "description")?,
        errors: errors_keyword(map, &pointer)?,
        ..Schema::default()
    };

    // type, then anyOf / oneOf / allOf
    if let Some(value) = map.get("type") {
        schema.types.push(type_keyword(value, &pointer)?);
    }
    if let Some(value) = map.get("anyOf") {
        schema.types.push(TypeRule::AnyOf {
            keyword: "anyOf",
            branches: schema_list(value, &pointer, "anyOf")?,
        });
    }
    if let Some(value) = map.get("oneOf") {
        schema
            .types
            .push(TypeRule::OneOf(schema_list(value, &pointer, "oneOf")?));
    }
    if let Some(value) = map.get("allOf") {
        schema
            .types
            .push(TypeRule::AllOf(schema_list(value, &pointer, "allOf")?));
    }

    if let Some(value) = map.get("not") {
        let child = compile_node(value, child_pointer(&pointer, "not"))?;
        schema.not = Some(Box::new(child));
    }
    if let Some(value) = map.get("disallow") {
        schema.disallow = disallow_keyword(value, &pointer)?;
    }

    compile_object_keywords(map, &pointer, &mut schema)?;
    compile_array_keywords(map, &pointer, &mut schema)?;

    schema.min_length = count_keyword(map, &pointer, "minLength")?;
    schema.max_length = count_keyword(map, &pointer, "maxLength")?;
    if let Some(value) = map.get("pattern") {
        schema.pattern = Some(pattern_keyword(value, &pointer)?);
    }
    schema.minimum = number_keyword(map, &pointer, "minimum")?;
    schema.maximum = number_keyword(map, &pointer, "maximum")?;

    if let Some(value) = map.get("enum") {
        match value {
            Value::Array(values) if !values.is_empty() => {
                schema.enumeration = Some(values.clone());
            }
            _ => {
                return Err(invalid(&pointer, "enum", "expected a non-empty array"));
            }
        }
    }
    schema.constant = map.get("const").cloned();

    schema.pointer = pointer;
    Ok(schema)
}

fn compile_object_keywords(
    map: &Map<String, Value>,
    pointer: &str,
    schema: &mut Schema,
) -> Result<(), SchemaError> {
    let mut flagged = Vec::new();

    match map.get("required") {
        None => {}
        Some(Value::Bool(flag)) => schema.required_flag = Some(*flag),
        Some(Value::Array(names)) => {
            for (index, name) in names.iter().enumerate() {
                match name {
                    Value::String(name) => push_unique(&mut schema.required, name),
                    _ => {
                        return Err(invalid(
                            pointer,
                            "required",
                            format!("entry {} is not a property name", index),
                        ));
                    }
                }
            }
        }
        Some(_) => {
            return Err(invalid(
                pointer,
                "required",
                "expected an array of property names or a boolean",
            ));
        }
    }

    if let Some(value) = map.get("properties") {
        let Value::Object(properties) = value else {
            return Err(invalid(pointer, "properties", "expected an object"));
        };
        let base = child_pointer(pointer, "properties");
        for (name, value) in properties {
            let child = compile_node(value, child_pointer(&base, name))?;
            if child.required_flag == Some(true) {
                flagged.push(name.clone());
            }
            schema.properties.push((name.clone(), child));
        }
    }
    for name in &flagged {
        push_unique(&mut schema.required, name);
    }

    if let Some(value) = map.get("additionalProperties") {
        schema.additional_properties = additional_keyword(value, pointer, "additionalProperties")?;
    }
    Ok(())
}

fn compile_array_keywords(
    map: &Map<String, Value>,
    pointer: &str,
    schema: &mut Schema,
) -> Result<(), SchemaError> {
    if let Some(value) = map.get("prefixItems") {
        schema.items = Items::Tuple(schema_list(value, pointer, "prefixItems")?);
        match map.get("items") {
            None => {}
            Some(Value::Array(_)) => {
                return Err(invalid(
                    pointer,
                    "items",
                    "must be a single schema when prefixItems is present",
                ));
            }
            Some(items) => {
                schema.additional_items = additional_keyword(items, pointer, "items")?;
            }
        }
    } else {
        match map.get("items") {
            None => {}
            Some(Value::Array(_)) => {
                schema.items = Items::Tuple(schema_list(&map["items"], pointer, "items")?);
            }
            Some(items) => {
                let child = compile_node(items, child_pointer(pointer, "items"))?;
                schema.items = Items::Single(Box::new(child));
            }
        }
        if let Some(value) = map.get("additionalItems") {
            schema.additional_items = additional_keyword(value, pointer, "additionalItems")?;
        }
    }

    schema.min_items = count_keyword(map, pointer, "minItems")?;
    schema.max_items = count_keyword(map, pointer, "maxItems")?;
    match map.get("uniqueItems") {
        None => {}
        Some(Value::Bool(flag)) => schema.unique_items = *flag,
        Some(_) => return Err(invalid(pointer, "uniqueItems", "expected a boolean")),
    }
    Ok(())
}

fn type_keyword(value: &Value, pointer: &str) -> Result<TypeRule, SchemaError> {
    match value {
        Value::String(name) => Ok(TypeRule::Single(parse_kind(name, pointer)?)),
        Value::Array(alternatives) if !alternatives.is_empty() => {
            let base = child_pointer(pointer, "type");
            let branches = alternatives
                .iter()
                .enumerate()
                .map(|(index, alternative)| kind_or_schema(alternative, index_pointer(&base, index)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeRule::AnyOf {
                keyword: "type",
                branches,
            })
        }
        _ => Err(invalid(
            pointer,
            "type",
            "expected a kind name or a non-empty list of alternatives",
        )),
    }
}

fn disallow_keyword(value: &Value, pointer: &str) -> Result<Vec<Schema>, SchemaError> {
    let base = child_pointer(pointer, "disallow");
    match value {
        Value::Array(alternatives) => alternatives
            .iter()
            .enumerate()
            .map(|(index, alternative)| kind_or_schema(alternative, index_pointer(&base, index)))
            .collect(),
        other => Ok(vec![kind_or_schema(other, base)?]),
    }
}

/// A kind name becomes a schema with a single type rule.
fn kind_or_schema(value: &Value, pointer: String) -> Result<Schema, SchemaError> {
    match value {
        Value::String(name) => {
            let kind = parse_kind(name, &pointer)?;
            Ok(Schema {
                pointer,
                types: vec![TypeRule::Single(kind)],
                ..Schema::default()
            })
        }
        other => compile_node(other, pointer),
    }
}

fn parse_kind(name: &str, pointer: &str) -> Result<InstanceKind, SchemaError> {
    InstanceKind::parse(name).ok_or_else(|| SchemaError::UnknownType {
        pointer: pointer.to_string(),
        name: name.to_string(),
    })
}

fn schema_list(
    value: &Value,
    pointer: &str,
    keyword: &'static str,
) -> Result<Vec<Schema>, SchemaError> {
    let Value::Array(entries) = value else {
        return Err(invalid(pointer, keyword, "expected an array of schemas"));
    };
    if entries.is_empty() {
        return Err(invalid(pointer, keyword, "expected at least one schema"));
    }
    let base = child_pointer(pointer, keyword);
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| compile_node(entry, index_pointer(&base, index)))
        .collect()
}

fn additional_keyword(
    value: &Value,
    pointer: &str,
    keyword: &'static str,
) -> Result<Additional, SchemaError> {
    match value {
        Value::Bool(true) => Ok(Additional::Allow),
        Value::Bool(false) => Ok(Additional::Deny),
        Value::Object(_) => {
            let child = compile_node(value, child_pointer(pointer, keyword))?;
            Ok(Additional::Schema(Box::new(child)))
        }
        _ => Err(invalid(pointer, keyword, "expected a boolean or a schema")),
    }
}

fn pattern_keyword(value: &Value, pointer: &str) -> Result<Pattern, SchemaError> {
    let Value::String(source) = value else {
        return Err(invalid(pointer, "pattern", "expected a string"));
    };
    let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| {
        SchemaError::InvalidPattern {
            pointer: pointer.to_string(),
            pattern: source.clone(),
            reason: e.to_string(),
        }
    })?;
    Ok(Pattern {
        source: source.clone(),
        regex,
    })
}

fn errors_keyword(map: &Map<String, Value>, pointer: &str) -> Result<ErrorMessages, SchemaError> {
    match map.get("errors") {
        None => Ok(ErrorMessages::default()),
        Some(value @ Value::Object(_)) => serde_json::from_value(value.clone())
            .map_err(|e| invalid(pointer, "errors", e.to_string())),
        Some(_) => Err(invalid(pointer, "errors", "expected an object")),
    }
}

fn string_keyword(
    map: &Map<String, Value>,
    pointer: &str,
    keyword: &'static str,
) -> Result<Option<String>, SchemaError> {
    match map.get(keyword) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(invalid(pointer, keyword, "expected a string")),
    }
}

/// Non-negative whole number; `2.0` is accepted.
fn count_keyword(
    map: &Map<String, Value>,
    pointer: &str,
    keyword: &'static str,
) -> Result<Option<usize>, SchemaError> {
    let Some(value) = map.get(keyword) else {
        return Ok(None);
    };
    let count = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    };
    match count {
        Some(count) => Ok(Some(usize::try_from(count).unwrap_or(usize::MAX))),
        None => Err(invalid(pointer, keyword, "expected a non-negative integer")),
    }
}

fn number_keyword(
    map: &Map<String, Value>,
    pointer: &str,
    keyword: &'static str,
) -> Result<Option<serde_json::Number>, SchemaError> {
    match map.get(keyword) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.clone())),
        Some(_) => Err(invalid(pointer, keyword, "expected a number")),
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|existing| existing == name) {
        names.push(name.to_string());
    }
}

fn invalid(pointer: &str, keyword: &'static str, reason: impl Into<String>) -> SchemaError {
    SchemaError::InvalidKeyword {
        pointer: pointer.to_string(),
        keyword,
        reason: reason.into(),
    }
}
