//! Integration tests for the built-in schemas served through the
//! validation facade.

use proptest::prelude::*;
use schemata_schemas::{nonce, registry, slug, BUILTIN_NAMES};
use schemata_validate::{ErrorKind, Validation};
use serde_json::json;

// ============================================================================
// Facade
// ============================================================================

#[test]
fn builtins_validate_by_name() {
    let validation = Validation::new(registry());

    assert!(validation.validate_by_name("nonce", &json!("12345678")).unwrap().valid);
    assert!(validation.validate_by_name("slug", &json!("my-slug")).unwrap().valid);

    let result = validation.validate_by_name("email", &json!("nope")).unwrap();
    let error = result.error.unwrap();
    assert_eq!(error.kind, ErrorKind::ValidationError);
    assert_eq!(error.message, "A validation error occurred in the 'Email' validator.");
    assert_eq!(error.errors[0].message, "The email address is invalid.");
}

#[test]
fn every_builtin_warms() {
    let validation = Validation::new(registry());
    assert_eq!(validation.warm().unwrap(), BUILTIN_NAMES.len());
}

#[test]
fn missing_message_is_used_for_required_properties() {
    let validation = Validation::new(registry());
    let schema = json!({
        "type": "object",
        "properties": {"slug": slug(None)}
    });
    let error = validation
        .validate_instance(&json!({}), &schema)
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.errors[0].path, "/slug");
    assert_eq!(error.errors[0].message, "Please enter a slug.");
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    // Property: any nonce-alphabet string of 8..=64 characters is accepted.
    #[test]
    fn nonce_alphabet_accepted(value in "[-a-zA-Z0-9~!$%^&*()_=+. ]{8,64}") {
        let validation = Validation::new(registry());
        prop_assert!(validation.validate_instance(&json!(value), &nonce(None)).unwrap().valid);
    }

    // Property: lowercase alphanumeric slugs of 3..=40 characters are accepted.
    #[test]
    fn simple_slugs_accepted(value in "[a-z0-9][a-z0-9]{2,39}") {
        let validation = Validation::new(registry());
        prop_assert!(validation.validate_instance(&json!(value), &slug(None)).unwrap().valid);
    }
}
