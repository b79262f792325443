//! Deep merge of schema descriptions.
//!
//! Builders customize a base schema by merging extension data into a copy of
//! it. Objects merge key by key; arrays and scalars are replaced wholesale.

use serde_json::{Map, Value};

/// Merge `source` into `target` and return the result.
///
/// With `deep`, nested objects are merged recursively; otherwise each
/// top-level key of `source` replaces the one in `target`. A non-object
/// `source` leaves `target` unchanged; a non-object `target` is replaced by
/// an empty object before merging.
///
/// # Example
///
/// ```rust
/// use schemata_validate::merge::extend;
/// use serde_json::json;
///
/// let base = json!({"title": "Comment", "errors": {"invalid": "Bad.", "missing": "Gone."}});
/// let custom = extend(true, base.clone(), &json!({"errors": {"invalid": "Too long."}}));
///
/// assert_eq!(custom["errors"], json!({"invalid": "Too long.", "missing": "Gone."}));
/// assert_eq!(base["errors"]["invalid"], "Bad.");
/// ```
pub fn extend(deep: bool, target: Value, source: &Value) -> Value {
    let Value::Object(source) = source else {
        return target;
    };
    let mut merged = match target {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in source {
        let next = match (deep, merged.remove(key), value) {
            (true, Some(existing @ Value::Object(_)), Value::Object(_)) => {
                extend(true, existing, value)
            }
            (true, _, Value::Object(_)) => extend(true, Value::Object(Map::new()), value),
            _ => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    Value::Object(merged)
}

/// Merge every source into `target`, left to right.
pub fn extend_all<'a, I>(deep: bool, target: Value, sources: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    sources
        .into_iter()
        .fold(target, |merged, source| extend(deep, merged, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn arrays_are_replaced() {
        let merged = extend(true, json!({"required": ["a", "b"]}), &json!({"required": ["c"]}));
        assert_eq!(merged, json!({"required": ["c"]}));
    }

    #[test]
    fn shallow_replaces_nested_objects() {
        let base = json!({"errors": {"invalid": "a", "missing": "b"}});
        let merged = extend(false, base, &json!({"errors": {"invalid": "c"}}));
        assert_eq!(merged, json!({"errors": {"invalid": "c"}}));
    }

    #[test]
    fn deep_merges_nested_objects() {
        let base = json!({"properties": {"a": {"type": "string"}, "b": {"type": "integer"}}});
        let merged = extend(
            true,
            base,
            &json!({"properties": {"a": {"minLength": 1}, "c": {"type": "null"}}}),
        );
        assert_eq!(
            merged,
            json!({"properties": {
                "a": {"type": "string", "minLength": 1},
                "b": {"type": "integer"},
                "c": {"type": "null"}
            }})
        );
    }

    #[test]
    fn deep_copies_source_objects() {
        let merged = extend(true, json!({"a": 1}), &json!({"a": {"b": 2}}));
        assert_eq!(merged, json!({"a": {"b": 2}}));
    }

    #[test]
    fn non_object_inputs() {
        assert_eq!(extend(true, json!({"a": 1}), &json!(null)), json!({"a": 1}));
        assert_eq!(extend(true, json!("x"), &json!({"a": 1})), json!({"a": 1}));
    }

    #[test]
    fn extend_all_is_left_to_right() {
        let merged = extend_all(
            true,
            json!({"title": "A"}),
            [&json!({"title": "B"}), &json!({"title": "C", "description": "D"})],
        );
        assert_eq!(merged, json!({"title": "C", "description": "D"}));
    }

    fn arb_schema() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<i16>().prop_map(|n| json!(n)),
            "[a-z]{0,6}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 16, 3, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
                prop::collection::btree_map("[a-d]", inner, 0..3)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        // Property: merging an empty object into a copy yields the base.
        #[test]
        fn prop_extend_empty_is_identity(base in prop::collection::btree_map("[a-d]", arb_schema(), 0..4)) {
            let base = Value::Object(base.into_iter().collect());
            prop_assert_eq!(extend(true, base.clone(), &json!({})), base);
        }

        // Property: merging into a copy never alters the original base.
        #[test]
        fn prop_extend_leaves_base_unchanged(
            base in prop::collection::btree_map("[a-d]", arb_schema(), 0..4),
            title in "[A-Z][a-z]{0,8}",
        ) {
            let base = Value::Object(base.into_iter().collect());
            let snapshot = base.clone();
            let merged = extend(true, base.clone(), &json!({"title": title.clone()}));
            prop_assert_eq!(&merged["title"], &json!(title));
            prop_assert_eq!(base, snapshot);
        }

        // Property: deep merge is idempotent.
        #[test]
        fn prop_extend_is_idempotent(
            base in prop::collection::btree_map("[a-d]", arb_schema(), 0..4),
            ext in prop::collection::btree_map("[a-d]", arb_schema(), 0..4),
        ) {
            let base = Value::Object(base.into_iter().collect());
            let ext = Value::Object(ext.into_iter().collect());
            let once = extend(true, base, &ext);
            prop_assert_eq!(extend(true, once.clone(), &ext), once);
        }
    }
}
