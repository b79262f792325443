//! JSON Patch documents.

use serde_json::json;

/// Largest integer a JSON number round-trips through a double exactly.
const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

builder! {
    /// A non-empty list of RFC 6902 operations.
    json_patch => json!({
        "required": true,
        "title": "JSON Patch",
        "type": "array",
        "minItems": 1,
        "items": {
            "type": "object",
            "required": true,
            "properties": {
                "op": {
                    "type": "string",
                    "required": true,
                    "enum": ["add", "copy", "move", "remove", "replace", "test"]
                },
                "from": {
                    "type": "string",
                    "required": false
                },
                "path": {
                    "type": "string",
                    "required": true
                },
                "value": {
                    "required": false
                }
            },
            "additionalProperties": false
        }
    })
}

builder! {
    /// A JSON Patch bound to a target and a sequence number.
    sequenced_patch => json!({
        "required": ["patch", "sequence", "target"],
        "title": "Sequence-based JSON Patch",
        "type": "object",
        "properties": {
            "target": {"type": "string"},
            "patch": json_patch(None),
            "sequence": {
                "type": "integer",
                "minimum": 0,
                "maximum": MAX_SAFE_INTEGER
            }
        },
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_validate::CompiledValidator;
    use serde_json::Value;

    fn errors(schema: &Value, instance: Value) -> Vec<String> {
        CompiledValidator::compile(schema)
            .unwrap()
            .evaluate(&instance)
            .into_iter()
            .map(|v| v.code)
            .collect()
    }

    #[test]
    fn patches() {
        let schema = json_patch(None);
        assert_eq!(errors(&schema, json!([])), ["minItems"]);
        assert!(errors(&schema, json!([{"op": "add", "path": "/x"}])).is_empty());
        assert!(errors(&schema, json!([{"op": "add", "path": "/x", "value": {"a": [1]}}])).is_empty());
        assert_eq!(
            errors(&schema, json!([{"op": "add", "path": "/x", "extra": true}])),
            ["additionalProperties"]
        );
        assert_eq!(errors(&schema, json!([{"op": "merge", "path": "/x"}])), ["enum"]);
        assert_eq!(errors(&schema, json!([{"op": "remove"}])), ["required"]);
    }

    #[test]
    fn sequenced_patches() {
        let schema = sequenced_patch(None);
        let patch = json!({
            "target": "urn:uuid:1",
            "sequence": 0,
            "patch": [{"op": "replace", "path": "/name", "value": "x"}]
        });
        assert!(errors(&schema, patch).is_empty());
        assert_eq!(
            errors(&schema, json!({"target": "t", "sequence": -1, "patch": []})),
            ["minItems", "minimum"]
        );
        assert_eq!(errors(&schema, json!({})), ["required", "required", "required"]);
    }
}
