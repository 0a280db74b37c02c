//! Layered shallow merging
//!
//! Options and protocol registries are both built from ordered layers where a
//! later layer replaces keys of an earlier one. Only top-level keys are
//! merged; values are never merged recursively.

use crate::locator::Options;

/// Merge `layers` in order, later layers winning on key collisions.
///
/// Each layer is anything that iterates `(&key, &value)` pairs, so the same
/// rule applies to `BTreeMap` registries and `serde_json` option objects.
pub fn shallow_merge<'a, K, V, M, L, I>(layers: I) -> M
where
    K: Clone + 'a,
    V: Clone + 'a,
    M: Default + Extend<(K, V)>,
    L: IntoIterator<Item = (&'a K, &'a V)>,
    I: IntoIterator<Item = L>,
{
    let mut merged = M::default();
    for layer in layers {
        merged.extend(
            layer
                .into_iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
    }
    merged
}

/// Merge option objects in order, later layers winning on key collisions.
pub fn merge_options<'a, I>(layers: I) -> Options
where
    I: IntoIterator<Item = &'a Options>,
{
    shallow_merge(layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn options(value: serde_json::Value) -> Options {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_later_layer_wins() {
        let base = BTreeMap::from([("k", 1), ("base_only", 2)]);
        let top = BTreeMap::from([("k", 10), ("top_only", 3)]);

        let merged: BTreeMap<_, _> = shallow_merge([&base, &top]);

        assert_eq!(merged["k"], 10);
        assert_eq!(merged["base_only"], 2);
        assert_eq!(merged["top_only"], 3);
    }

    #[test]
    fn test_no_layers_gives_empty_map() {
        let merged: BTreeMap<String, u8> =
            shallow_merge(std::iter::empty::<&BTreeMap<String, u8>>());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_options_merge_is_shallow() {
        let base = options(json!({"nested": {"a": 1, "b": 2}, "keep": true}));
        let top = options(json!({"nested": {"a": 3}}));

        let merged = merge_options([&base, &top]);

        assert_eq!(merged["nested"], json!({"a": 3}));
        assert_eq!(merged["keep"], json!(true));
    }

    #[test]
    fn test_three_layers_apply_in_order() {
        let a = options(json!({"k": "a", "x": 1}));
        let b = options(json!({"k": "b", "y": 2}));
        let c = options(json!({"k": "c"}));

        let merged = merge_options([&a, &b, &c]);

        assert_eq!(merged, options(json!({"k": "c", "x": 1, "y": 2})));
    }
}
