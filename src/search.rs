//! Reverse lookup: find a path that leads to a given scalar.

use crate::path::join;
use serde_json::Value;
use std::collections::HashSet;

/// Depth-first search for a leaf matching `target`.
///
/// String targets match string leaves that contain them; other scalars match
/// by equality (numbers numerically). Array elements are visited in index
/// order and mapping entries in insertion order; the first match wins.
///
/// Returns `None` for a `null` or composite target, when nothing matches, or
/// when the only match is the root itself (there is no path to report).
///
/// Composite nodes are tracked by address so a graph with shared nodes is
/// walked once per node. A [`Value`] parsed by the codecs in this crate is
/// always a tree, since anchors and aliases expand into independent copies, so
/// for those inputs the visited set never prunes anything.
pub fn find_path_by_value(doc: &Value, target: &Value) -> Option<String> {
    if target.is_null() || target.is_array() || target.is_object() {
        return None;
    }
    let mut visited = HashSet::new();
    search(doc, target, String::new(), &mut visited).filter(|p| !p.is_empty())
}

fn search(
    current: &Value,
    target: &Value,
    path: String,
    visited: &mut HashSet<*const Value>,
) -> Option<String> {
    match current {
        Value::Array(items) => {
            if !visited.insert(current as *const Value) {
                return None;
            }
            items
                .iter()
                .enumerate()
                .find_map(|(i, item)| search(item, target, format!("{}[{}]", path, i), visited))
        }
        Value::Object(map) => {
            if !visited.insert(current as *const Value) {
                return None;
            }
            map.iter()
                .find_map(|(key, child)| search(child, target, join(&path, key), visited))
        }
        leaf => leaf_matches(leaf, target).then_some(path),
    }
}

fn leaf_matches(leaf: &Value, target: &Value) -> bool {
    match (leaf, target) {
        (Value::String(s), Value::String(t)) => s.contains(t.as_str()),
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (Value::Bool(a), Value::Bool(b)) => a == b,
        _ => false,
    }
}
