//! Credentials and presentations.

use crate::{identifier, proof, w3c_date_time};
use serde_json::json;

/// The base context every verifiable credential must list first.
pub const CREDENTIALS_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

builder! {
    /// The legacy credential shape with `issuer`, `issued` and `claim`.
    credential => json!({
        "type": "object",
        "title": "Credential",
        "properties": {
            "@context": {"required": true},
            "issuer": identifier(Some(&json!({"required": true}))),
            "issued": w3c_date_time(Some(&json!({"required": true}))),
            "claim": {
                "required": true,
                "properties": {
                    "id": identifier(Some(&json!({"required": true})))
                }
            }
        }
    })
}

builder! {
    /// A verifiable credential (VC Data Model 1.1).
    verifiable_credential => json!({
        "type": "object",
        "title": "Credential",
        "additionalProperties": true,
        "properties": {
            "@context": {
                "type": "array",
                "minItems": 1,
                "prefixItems": [{"type": "string", "const": CREDENTIALS_CONTEXT}],
                "items": {"type": ["string", "object"]}
            },
            "credentialSubject": {
                "required": ["id"],
                "properties": {"id": identifier(None)}
            },
            "id": identifier(None),
            "issuer": identifier(None),
            "issuanceDate": w3c_date_time(None),
            "proof": proof(None),
            "type": {
                "type": "array",
                "minItems": 1,
                "items": {"type": "string"}
            }
        },
        "required": ["@context", "credentialSubject", "id", "issuer", "issuanceDate", "type"]
    })
}

builder! {
    /// A verifiable presentation of one or more verifiable credentials.
    verifiable_presentation => json!({
        "title": "Verifiable Presentation",
        "type": "object",
        "additionalProperties": true,
        "properties": {
            "id": identifier(None),
            "type": {
                "type": "array",
                "minItems": 1,
                "items": {"type": "string"}
            },
            "verifiableCredential": {
                "anyOf": [
                    verifiable_credential(None),
                    {"type": "array", "minItems": 1, "items": verifiable_credential(None)}
                ]
            },
            "holder": identifier(None),
            "proof": proof(None)
        },
        "required": ["type"]
    })
}

builder! {
    /// A presentation of one or more legacy [`credential`]s.
    presentation => json!({
        "title": "Verifiable Presentation",
        "type": "object",
        "additionalProperties": true,
        "properties": {
            "id": identifier(None),
            "type": {
                "type": "array",
                "minItems": 1,
                "items": {"type": "string"}
            },
            "verifiableCredential": {
                "anyOf": [
                    credential(None),
                    {"type": "array", "minItems": 1, "items": credential(None)}
                ]
            },
            "holder": identifier(None),
            "proof": proof(None)
        },
        "required": ["type"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_validate::CompiledValidator;
    use serde_json::Value;

    fn valid_credential() -> Value {
        json!({
            "@context": [CREDENTIALS_CONTEXT, "https://www.schema.org"],
            "id": "urn:uuid:test-vc",
            "issuer": "test",
            "issuanceDate": "1997-07-16T19:20:30",
            "type": ["VerifiableCredential"],
            "credentialSubject": {"id": "1234"}
        })
    }

    fn valid(schema: &Value, instance: &Value) -> bool {
        CompiledValidator::compile(schema).unwrap().is_valid(instance)
    }

    #[test]
    fn verifiable_credentials() {
        let schema = verifiable_credential(None);
        assert!(valid(&schema, &valid_credential()));

        let mut wrong_context = valid_credential();
        wrong_context["@context"] = json!(["https://www.schema.org"]);
        assert!(!valid(&schema, &wrong_context));

        for field in ["@context", "credentialSubject", "id", "issuer", "issuanceDate", "type"] {
            let mut incomplete = valid_credential();
            incomplete.as_object_mut().unwrap().remove(field);
            assert!(!valid(&schema, &incomplete), "missing {} accepted", field);
        }

        let mut anonymous_subject = valid_credential();
        anonymous_subject["credentialSubject"] = json!({"name": "x"});
        assert!(!valid(&schema, &anonymous_subject));
    }

    #[test]
    fn verifiable_presentations() {
        let schema = verifiable_presentation(None);
        let presentation = json!({
            "@context": [CREDENTIALS_CONTEXT],
            "type": ["VerifiablePresentation"],
            "id": "urn:uuid:test-vc",
            "verifiableCredential": [valid_credential()]
        });
        assert!(valid(&schema, &presentation));

        let single = json!({"type": ["VerifiablePresentation"], "verifiableCredential": valid_credential()});
        assert!(valid(&schema, &single));

        let empty = json!({"type": ["VerifiablePresentation"], "verifiableCredential": []});
        assert!(!valid(&schema, &empty));
        assert!(!valid(&schema, &json!({"id": "urn:uuid:1"})));
    }

    #[test]
    fn legacy_credentials() {
        let schema = credential(None);
        let instance = json!({
            "@context": "https://w3id.org/credentials/v1",
            "issuer": "did:example:issuer",
            "issued": "2016-01-01T01:00:00Z",
            "claim": {"id": "did:example:subject"}
        });
        assert!(valid(&schema, &instance));

        let mut no_claim_id = instance.clone();
        no_claim_id["claim"] = json!({});
        assert!(!valid(&schema, &no_claim_id));
    }

    fn legacy_credential() -> Value {
        json!({
            "@context": "https://w3id.org/credentials/v1",
            "issuer": "did:example:issuer",
            "issued": "2016-01-01T01:00:00Z",
            "claim": {"id": "did:example:subject"}
        })
    }

    #[test]
    fn legacy_presentations() {
        let schema = presentation(None);
        let single = json!({
            "type": ["VerifiablePresentation"],
            "holder": "did:example:holder",
            "verifiableCredential": legacy_credential(),
            "proof": {"type": "Ed25519Signature2020"}
        });
        assert!(valid(&schema, &single));

        let listed = json!({
            "type": ["VerifiablePresentation"],
            "verifiableCredential": [legacy_credential(), legacy_credential()]
        });
        assert!(valid(&schema, &listed));

        let mut unissued = legacy_credential();
        unissued.as_object_mut().unwrap().remove("issuer");
        let bad_credential = json!({
            "type": ["VerifiablePresentation"],
            "verifiableCredential": [unissued]
        });
        assert!(!valid(&schema, &bad_credential));

        // A modern credential lacks `issued` and `claim`.
        let modern = json!({
            "type": ["VerifiablePresentation"],
            "verifiableCredential": valid_credential()
        });
        assert!(!valid(&schema, &modern));
        assert!(valid(&verifiable_presentation(None), &modern));

        assert!(!valid(&schema, &json!({"type": []})));
    }
}
