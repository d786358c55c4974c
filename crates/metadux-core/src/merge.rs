//! Deep merge of metadata fragments.
//!
//! Objects merge key by key, recursively. Everything else (arrays,
//! scalars, `null`) from the source replaces the target value wholesale;
//! arrays are never merged element-wise.

use serde_json::Value;

use metadux_types::Meta;

/// Return a copy of `target` with `source` deep-merged into it.
///
/// Neither input is modified.
pub fn merge(target: &Meta, source: &Meta) -> Meta {
    let mut merged = target.clone();
    merge_into(&mut merged, source);
    merged
}

/// Deep-merge `source` into `target` in place.
pub fn merge_into(target: &mut Meta, source: &Meta) {
    for (key, incoming) in source {
        if let (Some(Value::Object(existing)), Value::Object(fragment)) =
            (target.get_mut(key), incoming)
        {
            merge_into(existing, fragment);
            continue;
        }
        target.insert(key.clone(), incoming.clone());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn meta(value: Value) -> Meta {
        match value {
            Value::Object(map) => map,
            _ => Meta::new(),
        }
    }

    #[test]
    fn nested_objects_merge_recursively() {
        let target = meta(json!({
            "some": {"nested": {"meta": "data"}, "hello": "goodbye"},
            "shallow": "meta",
            "simple": 4,
        }));
        let source = meta(json!({
            "some": {"nested": {"other": "metadata"}},
            "simple": 8,
        }));
        assert_eq!(
            Value::Object(merge(&target, &source)),
            json!({
                "some": {"nested": {"meta": "data", "other": "metadata"}, "hello": "goodbye"},
                "shallow": "meta",
                "simple": 8,
            })
        );
    }

    #[test]
    fn arrays_are_replaced_not_merged() {
        let target = meta(json!({"arr": [0, 1, {"abc": 123}]}));
        let source = meta(json!({"arr": [17]}));
        assert_eq!(Value::Object(merge(&target, &source)), json!({"arr": [17]}));
    }

    #[test]
    fn object_replaces_scalar_and_scalar_replaces_object() {
        let target = meta(json!({"a": 1, "b": {"c": 2}}));
        let source = meta(json!({"a": {"x": true}, "b": null}));
        assert_eq!(
            Value::Object(merge(&target, &source)),
            json!({"a": {"x": true}, "b": null})
        );
    }

    #[test]
    fn inputs_are_left_untouched() {
        let target = meta(json!({"a": {"b": 1}}));
        let source = meta(json!({"a": {"c": 2}}));
        let (target_before, source_before) = (target.clone(), source.clone());
        let _ = merge(&target, &source);
        assert_eq!(target, target_before);
        assert_eq!(source, source_before);
    }

    #[test]
    fn empty_source_yields_equal_copy() {
        let target = meta(json!({"a": [1, 2], "b": "c"}));
        assert_eq!(merge(&target, &Meta::new()), target);
    }
}
