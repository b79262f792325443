//! Proof and signature suites.

use crate::{identifier, jsonld_type, w3c_date_time};
use serde_json::{json, Value};

builder! {
    /// An `EquihashProof2017` proof of work.
    equihash_signature => json!({
        "required": true,
        "title": "Equihash Proof",
        "description": "An Equihash proof.",
        "type": "object",
        "properties": {
            "type": {
                "title": "Equihash Proof Type",
                "required": true,
                "type": "string",
                "enum": ["EquihashProof2017"]
            },
            "equihashParameterN": {
                "title": "Equihash `n` Parameter",
                "required": true,
                "type": "integer"
            },
            "equihashParameterK": {
                "title": "Equihash `k` Parameter",
                "required": true,
                "type": "integer"
            },
            "nonce": {
                "title": "Equihash `nonce` Parameter",
                "required": true,
                "type": "string"
            },
            "proofValue": {
                "title": "Proof Value",
                "description": "The encoding of the result of the proof algorithm.",
                "required": true,
                "type": "string"
            }
        },
        "additionalProperties": false
    })
}

builder! {
    /// A `GraphSignature2012` signature on a graph.
    graph_signature => json!({
        "required": true,
        "title": "GraphSignature",
        "description": "A digital signature on a graph.",
        "type": "object",
        "properties": {
            "id": identifier(None),
            "type": jsonld_type(&["GraphSignature2012"], None),
            "creator": identifier(Some(&json!({"required": true}))),
            "created": w3c_date_time(Some(&json!({"required": true}))),
            "signatureValue": {
                "title": "Digital Signature Value",
                "description": "A base-64 encoded byte string containing the result of the GraphSignature2012 algorithm.",
                "required": true,
                "type": "string"
            }
        },
        "additionalProperties": false
    })
}

/// One signature, or a non-empty list of them.
fn one_or_many(signature: Value) -> Value {
    json!({
        "title": "Linked Data Signatures",
        "oneOf": [
            {"type": "array", "items": signature, "minItems": 1},
            signature
        ]
    })
}

builder! {
    /// One or more `Ed25519Signature2018` signatures carrying a `jws`.
    linked_data_signature_2018 => one_or_many(json!({
        "title": "Linked Data Signature",
        "description": "A Linked Data digital signature.",
        "required": ["type", "creator", "created", "jws"],
        "type": "object",
        "properties": {
            "id": identifier(None),
            "type": {
                "title": "Linked Data Signature Type",
                "type": "string",
                "enum": ["Ed25519Signature2018"]
            },
            "creator": identifier(None),
            "created": w3c_date_time(None),
            "jws": {
                "title": "Digital Signature Value",
                "description": "The Base64 encoding of the result of the signature algorithm.",
                "type": "string"
            }
        }
    }))
}

builder! {
    /// One or more `Ed25519Signature2020` signatures.
    ///
    /// Each signature names exactly one of `creator` or `verificationMethod`.
    linked_data_signature_2020 => one_or_many(json!({
        "allOf": [
            {
                "title": "Linked Data Signature",
                "description": "A Linked Data digital signature.",
                "required": ["type", "created", "proofValue"],
                "type": "object",
                "properties": {
                    "id": identifier(None),
                    "type": {
                        "title": "Linked Data Signature Type",
                        "type": "string",
                        "enum": ["Ed25519Signature2020"]
                    },
                    "creator": identifier(None),
                    "created": w3c_date_time(None),
                    "proofValue": {
                        "title": "Digital Signature Value",
                        "description": "The multibase encoding of the result of the signature algorithm.",
                        "type": "string"
                    },
                    "verificationMethod": identifier(None)
                }
            },
            {
                "anyOf": [
                    {
                        "required": ["creator"],
                        "not": {"required": ["verificationMethod"]}
                    },
                    {
                        "required": ["verificationMethod"],
                        "not": {"required": ["creator"]}
                    }
                ]
            }
        ]
    }))
}
