//! JSON-LD identifiers, contexts, types and signatures.

use serde_json::{json, Value};

const TYPE_ERRORS: &str = "The JSON-LD type information is invalid.";
const TYPE_MISSING: &str = "The JSON-LD type information is missing.";

builder! {
    /// A non-empty identifier other than `"0"`.
    identifier => json!({
        "title": "ID",
        "description": "A unique identifier.",
        "type": "string",
        "minLength": 1,
        "disallow": {
            "type": "string",
            "enum": ["0"]
        }
    })
}

builder! {
    /// An identifier, or an object carrying one under `id`.
    id_or_object_with_id => json!({
        "title": "identifier or an object with an id",
        "anyOf": [
            identifier(None),
            {
                "type": "object",
                "additionalProperties": true,
                "properties": {"id": identifier(None)},
                "required": ["id"]
            }
        ]
    })
}

builder! {
    /// A proof object, or a non-empty list of them.
    proof => json!({
        "title": "Proof",
        "anyOf": [
            {"type": "object"},
            {"type": "array", "minItems": 1, "items": {"type": "object"}}
        ]
    })
}

builder! {
    /// A Linked Data signature of type `LinkedDataSignature2015` or
    /// `LinkedDataSignature2016`.
    linked_data_signature => json!({
        "required": true,
        "title": "Linked Data Signature",
        "description": "A Linked Data digital signature.",
        "type": "object",
        "properties": {
            "id": identifier(None),
            "type": {
                "title": "Linked Data Signature Type",
                "required": true,
                "type": "string",
                "enum": ["LinkedDataSignature2015", "LinkedDataSignature2016"]
            },
            "creator": identifier(Some(&json!({"required": true}))),
            "created": crate::w3c_date_time(Some(&json!({"required": true}))),
            "signatureValue": {
                "title": "Digital Signature Value",
                "description": "The Base64 encoding of the result of the signature algorithm.",
                "required": true,
                "type": "string"
            }
        },
        "additionalProperties": false
    })
}

/// A JSON-LD context.
///
/// With a string `context` only that exact URL is accepted; with an array
/// only that exact list. Without one any URL, list or context object is
/// accepted. Context objects are always accepted.
pub fn jsonld_context(context: Option<&Value>, ext: Option<&Value>) -> Value {
    let mut alternatives = match context {
        Some(Value::String(url)) => vec![json!({"type": "string", "enum": [url]})],
        Some(list @ Value::Array(_)) => vec![json!({"type": "array", "const": list})],
        _ => vec![
            json!({"type": "string"}),
            json!({"type": "array", "minItems": 1, "items": {"type": ["string", "object"]}}),
        ],
    };
    alternatives.push(json!({"type": "object"}));

    let base = json!({
        "required": true,
        "title": "JSON-LD context",
        "description": "A JSON-LD Context",
        "type": alternatives
    });
    crate::build(&base, ext)
}

/// A JSON-LD `type` value that must name every one of `types`.
///
/// A single type may be given as a plain string. With `alternates`, up to
/// that many additional custom types may precede the required ones.
pub fn jsonld_type(types: &[&str], alternates: Option<usize>) -> Value {
    let errors = json!({"invalid": TYPE_ERRORS, "missing": TYPE_MISSING});
    let mut alternatives = Vec::new();

    if types.len() == 1 {
        alternatives.push(json!({
            "type": "string",
            "enum": types,
            "errors": errors
        }));
    }
    alternatives.push(json!({
        "type": "array",
        "minItems": types.len(),
        "uniqueItems": true,
        "items": {"type": "string", "enum": types},
        "errors": errors
    }));

    if let Some(alternates) = alternates {
        for before in 0..=alternates {
            let mut positional: Vec<Value> = (0..before).map(|_| json!({"type": "string"})).collect();
            positional.extend(types.iter().map(|_| json!({"type": "string", "enum": types})));
            alternatives.push(json!({
                "type": "array",
                "minItems": before + types.len(),
                "uniqueItems": true,
                "items": positional,
                "additionalItems": {"type": "string"},
                "errors": errors
            }));
        }
    }

    json!({
        "title": "Object Type",
        "description": "A set of terms, CURIEs, or URLs specifying the type of the object.",
        "type": alternatives
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_validate::CompiledValidator;

    fn valid(schema: &Value, instance: Value) -> bool {
        CompiledValidator::compile(schema).unwrap().is_valid(&instance)
    }

    const SIGNATURE_VALUE: &str = "Lc6l7gxEPV1lKTj4KADaER52CiMBpvsHg7eZZJXzRK3U8N/eUYxITlenu3svj4KPrdnaBfMXGo3U/vAVaQNF5Er0g/SXC2KpUmRN4uyMYgQ5NwWklS2JqjJ/0Y3hio4GOgdMDiqrlZJvfQdtRaJjKoskc7F3bZtDVsX6Sr95erfOeobHOIMcbNIC0a96oYOaQlOeOC45BqQaUaczYKPayGEeQN2lfD+qR6b1MR4xtWNrx5pzzPpAPkjj3I91wiVQER43s/nq5XZKkDk8V8eD7xEURoDUcu3rA1qHLfrpRHJGCErXNc784O4R4Oqm5zQlkyB1mWJxnz3qSqzgqVG0sQ==";

    fn signature(kind: &str) -> Value {
        json!({
            "type": kind,
            "created": "2016-01-01T01:00:00Z",
            "creator": "urn:5dd6a7e2-4c32-4a21-60b3-2385e5b6bcd4/keys/1",
            "signatureValue": SIGNATURE_VALUE
        })
    }

    #[test]
    fn identifiers() {
        let schema = identifier(None);
        assert!(valid(&schema, json!("urn:uuid:1")));
        assert!(!valid(&schema, json!("0")));
        assert!(!valid(&schema, json!("")));
    }

    #[test]
    fn id_or_object() {
        let schema = id_or_object_with_id(None);
        assert!(valid(&schema, json!("did:example:123")));
        assert!(valid(&schema, json!({"id": "did:example:123", "name": "x"})));
        assert!(!valid(&schema, json!({"name": "x"})));
        assert!(!valid(&schema, json!(7)));
    }

    #[test]
    fn proofs() {
        let schema = proof(None);
        assert!(valid(&schema, json!({"type": "Ed25519Signature2020"})));
        assert!(valid(&schema, json!([{}, {}])));
        assert!(!valid(&schema, json!([])));
        assert!(!valid(&schema, json!("proof")));
    }

    #[test]
    fn linked_data_signatures() {
        let schema = linked_data_signature(None);
        assert!(valid(&schema, signature("LinkedDataSignature2015")));
        assert!(valid(&schema, signature("LinkedDataSignature2016")));
        assert!(!valid(&schema, signature("GraphSignature2012")));

        for field in ["type", "created", "creator", "signatureValue"] {
            let mut incomplete = signature("LinkedDataSignature2015");
            incomplete.as_object_mut().unwrap().remove(field);
            assert!(!valid(&schema, incomplete), "missing {} accepted", field);
        }
    }

    #[test]
    fn context_url() {
        let schema = jsonld_context(Some(&json!("http://foo.com/v1")), None);
        assert!(valid(&schema, json!("http://foo.com/v1")));
        assert!(!valid(&schema, json!("http://foo.com/v2")));
        assert!(valid(&schema, json!({"@vocab": "http://foo.com/"})));
    }

    #[test]
    fn context_list() {
        let schema = jsonld_context(Some(&json!(["http://foo.com/v1", "http://bar.com/v1"])), None);
        assert!(valid(&schema, json!(["http://foo.com/v1", "http://bar.com/v1"])));
        assert!(!valid(&schema, json!(["http://foo.com/v1", "http://wrong.com/v1"])));
    }

    #[test]
    fn any_context() {
        let schema = jsonld_context(None, None);
        assert!(valid(&schema, json!("https://w3id.org/security/v2")));
        assert!(valid(&schema, json!(["https://w3id.org/security/v2", {"ex": "urn:ex:"}])));
        assert!(!valid(&schema, json!(42)));
        assert!(!valid(&schema, json!([])));
    }

    #[test]
    fn single_type() {
        let schema = jsonld_type(&["Person"], None);
        assert!(valid(&schema, json!("Person")));
        assert!(valid(&schema, json!(["Person"])));
        assert!(!valid(&schema, json!("Organization")));
        assert!(!valid(&schema, json!(["Person", "Person"])));
    }

    #[test]
    fn types_with_alternates() {
        let schema = jsonld_type(&["VerifiableCredential"], Some(1));
        assert!(valid(&schema, json!(["VerifiableCredential"])));
        assert!(valid(&schema, json!(["CustomCredential", "VerifiableCredential"])));
        assert!(!valid(&schema, json!(["CustomCredential"])));

        let strict = jsonld_type(&["VerifiableCredential"], None);
        assert!(!valid(&strict, json!(["CustomCredential", "VerifiableCredential"])));
    }
}
