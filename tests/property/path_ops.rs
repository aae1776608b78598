use guardon::PathError;
use guardon::path::{MAX_INDEX_GROWTH, delete, get, has, parent_path, set};
use proptest::prelude::*;
use serde_json::{Value, json};

/// Strategy for arbitrary JSON values nested up to `depth` levels.
fn arb_json(depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|i| json!(i)),
        "[a-z]{1,8}".prop_map(Value::String),
    ];

    leaf.prop_recursive(depth, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z][a-z0-9]{0,5}", inner), 1..5).prop_map(|pairs| {
                let map: serde_json::Map<String, Value> = pairs.into_iter().collect();
                Value::Object(map)
            }),
        ]
    })
}

/// Strategy for well-formed paths: 1–4 segments, some indexed.
fn arb_path() -> impl Strategy<Value = String> {
    prop::collection::vec(("[a-z][a-z0-9_-]{0,5}", prop::option::of(0usize..4)), 1..5).prop_map(
        |segments| {
            segments
                .into_iter()
                .map(|(key, idx)| match idx {
                    Some(i) => format!("{}[{}]", key, i),
                    None => key,
                })
                .collect::<Vec<_>>()
                .join(".")
        },
    )
}

/// Extract every resolvable path of a value (keys and indexes).
fn extract_paths(value: &Value, prefix: &str, paths: &mut Vec<String>) {
    if let Some(obj) = value.as_object() {
        for (key, child) in obj {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            paths.push(path.clone());
            if let Some(items) = child.as_array() {
                for (i, item) in items.iter().enumerate() {
                    let indexed = format!("{}[{}]", path, i);
                    paths.push(indexed.clone());
                    extract_paths(item, &indexed, paths);
                }
            } else {
                extract_paths(child, &path, paths);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn empty_path_returns_root(value in arb_json(3)) {
        prop_assert_eq!(get(&value, ""), Some(&value));
    }

    #[test]
    fn set_then_get_round_trips(doc in arb_json(3), path in arb_path(), leaf in arb_json(1)) {
        let mut doc = doc;
        set(&mut doc, &path, leaf.clone()).unwrap();
        prop_assert_eq!(get(&doc, &path), Some(&leaf));
    }

    #[test]
    fn set_with_any_index_succeeds_or_is_rejected_untouched(
        doc in arb_json(2),
        key in "[a-z]{1,4}",
        idx in prop_oneof![0usize..2048, any::<usize>()],
    ) {
        let mut patched = doc.clone();
        let path = format!("{}[{}]", key, idx);
        match set(&mut patched, &path, json!("x")) {
            Ok(()) => prop_assert_eq!(get(&patched, &path), Some(&json!("x"))),
            Err(PathError::IndexOutOfRange { index, .. }) => {
                prop_assert_eq!(index, idx);
                prop_assert!(idx >= MAX_INDEX_GROWTH);
                prop_assert_eq!(&patched, &doc);
            }
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }

    #[test]
    fn extracted_paths_resolve(value in arb_json(3)) {
        let mut paths = Vec::new();
        extract_paths(&value, "", &mut paths);
        for path in &paths {
            prop_assert!(has(&value, path), "path {} should resolve", path);
        }
    }

    #[test]
    fn delete_is_idempotent(doc in arb_json(3), path in arb_path()) {
        let mut once = doc.clone();
        delete(&mut once, &path);
        let mut twice = once.clone();
        delete(&mut twice, &path);
        // A second delete only differs when it spliced a further array element.
        if !path.ends_with(']') {
            prop_assert_eq!(&once, &twice);
        }
    }

    #[test]
    fn delete_removes_mapping_keys(doc in arb_json(3)) {
        let mut paths = Vec::new();
        extract_paths(&doc, "", &mut paths);
        for path in paths.iter().filter(|p| !p.ends_with(']')) {
            let mut copy = doc.clone();
            delete(&mut copy, path);
            prop_assert!(!has(&copy, path), "{} still present after delete", path);
        }
    }

    #[test]
    fn parent_is_a_prefix(path in arb_path()) {
        let parent = parent_path(&path);
        if parent.is_empty() {
            prop_assert!(!path.contains('.'));
        } else {
            let prefix = format!("{}.", parent);
            prop_assert!(path.starts_with(&prefix));
            prop_assert_eq!(path.matches('.').count(), parent.matches('.').count() + 1);
        }
    }
}
