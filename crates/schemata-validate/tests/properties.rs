//! Behavioural properties of the validation engine.

use proptest::prelude::*;
use schemata_validate::merge::extend;
use schemata_validate::prelude::*;
use schemata_validate::{evaluate, render, ErrorKind, Schema, ViolationKind, MASKED};
use serde_json::{json, Value};

fn validation() -> Validation {
    Validation::new(
        MemoryRegistry::new()
            .with(
                "nonce",
                json!({
                    "title": "Nonce",
                    "type": "string",
                    "pattern": "^[-a-zA-Z0-9~_.]+$",
                    "minLength": 8,
                    "maxLength": 64
                }),
            )
            .with(
                "jsonPatch",
                json!({
                    "title": "JSON Patch",
                    "type": "array",
                    "minItems": 1,
                    "items": {
                        "type": "object",
                        "required": ["op", "path"],
                        "properties": {
                            "op": {"type": "string", "enum": ["add", "copy", "move", "remove", "replace", "test"]},
                            "from": {"type": "string"},
                            "path": {"type": "string"},
                            "value": {"type": "any"}
                        },
                        "additionalProperties": false
                    }
                }),
            ),
    )
}

// ============================================================================
// Combinators
// ============================================================================

#[test]
fn any_of_second_branch_is_enough() {
    let schema = json!({"anyOf": [{"type": "string"}, {"type": "object", "required": ["id"]}]});
    let validation = validation();
    assert!(validation.validate_instance(&json!({"id": 1}), &schema).unwrap().valid);

    let result = validation.validate_instance(&json!([]), &schema).unwrap();
    let error = result.error.unwrap();
    assert_eq!(error.len(), 1);
    assert_eq!(error.errors[0].code, "anyOf");
}

#[test]
fn one_of_both_satisfied_is_invalid() {
    let schema = json!({"oneOf": [{"type": "string"}, {"minLength": 2}]});
    let result = validation().validate_instance(&json!("ab"), &schema).unwrap();
    assert!(!result.valid);
}

#[test]
fn three_sibling_violations_are_all_reported() {
    let schema = Schema::compile(&json!({
        "type": "object",
        "required": ["id"],
        "properties": {"name": {"type": "string"}, "age": {"minimum": 0}}
    }))
    .unwrap();
    let violations = evaluate(&schema, &json!({"name": 3, "age": -1}));
    assert_eq!(violations.len(), 3);
    assert_eq!(violations[0].kind, ViolationKind::Missing);
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn masked_value_is_replaced() {
    let description = json!({"type": "string", "minLength": 3, "errors": {"mask": true}});
    let result = validation().validate_instance(&json!("sl"), &description).unwrap();
    let error = result.error.unwrap();
    assert_eq!(error.errors[0].value, Some(json!(MASKED)));
    assert!(!error.to_json().to_string().contains("\"sl\""));
}

#[test]
fn render_is_pure() {
    let schema = Schema::compile(&json!({"title": "T", "maxLength": 1})).unwrap();
    let instance = json!("abc");
    let first = render(&schema, &instance, evaluate(&schema, &instance));
    let second = render(&schema, &instance, evaluate(&schema, &instance));
    assert_eq!(first, second);
}

// ============================================================================
// Facade
// ============================================================================

#[test]
fn unknown_schema_name() {
    let error = validation()
        .validate_by_name("does-not-exist", &json!({}))
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnknownSchema);
    assert_eq!(
        error.to_string(),
        "Could not validate data; unknown schema name (does-not-exist)."
    );
}

#[test]
fn legacy_and_modern_required_are_equivalent() {
    let legacy = json!({"type": "object", "properties": {"a": {"type": "string", "required": true}}});
    let modern = json!({"type": "object", "required": ["a"], "properties": {"a": {"type": "string"}}});
    let validation = validation();

    let legacy = validation.validate_instance(&json!({}), &legacy).unwrap();
    let modern = validation.validate_instance(&json!({}), &modern).unwrap();
    assert!(!legacy.valid && !modern.valid);

    let legacy = legacy.error.unwrap();
    let modern = modern.error.unwrap();
    assert_eq!(legacy.errors[0].path, modern.errors[0].path);
    assert_eq!(legacy.errors[0].message, modern.errors[0].message);
    assert_eq!(legacy.errors[0].value, None);
}

#[test]
fn nonce() {
    let validation = validation();
    assert!(!validation.validate_by_name("nonce", &json!("1234567")).unwrap().valid);
    assert!(validation.validate_by_name("nonce", &json!("12345678")).unwrap().valid);
    assert!(!validation.validate_by_name("nonce", &json!("|||||||||")).unwrap().valid);
}

#[test]
fn json_patch() {
    let validation = validation();
    let empty = validation.validate_by_name("jsonPatch", &json!([])).unwrap();
    assert_eq!(empty.error.unwrap().errors[0].code, "minItems");

    assert!(validation
        .validate_by_name("jsonPatch", &json!([{"op": "add", "path": "/x"}]))
        .unwrap()
        .valid);

    let extra = validation
        .validate_by_name("jsonPatch", &json!([{"op": "add", "path": "/x", "extra": 1}]))
        .unwrap();
    let error = extra.error.unwrap();
    assert_eq!(error.errors[0].code, "additionalProperties");
    assert_eq!(error.errors[0].path, "/0/extra");
}

#[test]
fn repeated_lookups_reuse_one_compiled_validator() {
    let validation = validation();
    for _ in 0..3 {
        validation.validate_by_name("nonce", &json!("12345678")).unwrap();
        validation
            .validate_instance(&json!("x"), &json!({"type": "string"}))
            .unwrap();
    }
    assert_eq!(validation.cache().len(), 2);
}

// ============================================================================
// Merge
// ============================================================================

#[test]
fn extend_with_empty_object_is_identity() {
    let base = json!({"title": "Base", "errors": {"invalid": "Bad."}, "enum": [1, 2]});
    assert_eq!(extend(true, base.clone(), &json!({})), base);
}

#[test]
fn extend_leaves_base_unchanged() {
    let base = json!({"title": "Base", "properties": {"a": {"type": "string"}}});
    let snapshot = base.clone();
    let merged = extend(true, base.clone(), &json!({"title": "X"}));
    assert_eq!(merged["title"], "X");
    assert_eq!(base, snapshot);
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    // Property: for any string, a validator agrees with the facade and the
    // result is stable across calls.
    #[test]
    fn prop_nonce_validation_is_deterministic(input in "[a-z0-9|~]{0,70}") {
        let validation = validation();
        let instance = Value::String(input.clone());
        let first = validation.validate_by_name("nonce", &instance).unwrap();
        let second = validation.validate_by_name("nonce", &instance).unwrap();
        prop_assert_eq!(&first, &second);

        let chars = input.chars().count();
        let expected = (8..=64).contains(&chars) && !input.contains('|');
        prop_assert_eq!(first.valid, expected);
    }

    // Property: the number of violations for independent sibling properties
    // equals the number of violated properties.
    #[test]
    fn prop_siblings_report_independently(bad in prop::collection::vec(any::<bool>(), 1..6)) {
        let mut properties = serde_json::Map::new();
        let mut instance = serde_json::Map::new();
        for (i, is_bad) in bad.iter().enumerate() {
            properties.insert(format!("p{}", i), json!({"type": "integer"}));
            instance.insert(
                format!("p{}", i),
                if *is_bad { json!("x") } else { json!(1) },
            );
        }
        let schema = Schema::compile(&json!({"properties": properties})).unwrap();
        let violations = evaluate(&schema, &Value::Object(instance));
        prop_assert_eq!(violations.len(), bad.iter().filter(|b| **b).count());
    }
}
