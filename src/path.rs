//! Dot-and-bracket path addressing over a [`Value`] tree.
//!
//! A path is a dot-separated list of segments. Each segment is a key made of
//! `[A-Za-z0-9_-]` characters, optionally followed by a literal array index:
//! `spec.containers[0].image`. The wildcard marker `[*]` is understood only by
//! [`split_wildcard`]; the accessors treat it as an unresolvable segment.
//!
//! Reads never fail. A path that cannot be resolved for any reason (missing
//! key, non-container in the way, index out of bounds, malformed segment) is
//! simply absent.

use crate::error::PathError;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Marker for "every element of the array at this position".
pub const WILDCARD: &str = "[*]";

/// How far past the end of an array [`set`] may write. The gap is padded
/// with `null`, so this bounds the padding a single write can allocate.
pub const MAX_INDEX_GROWTH: usize = 1024;

static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_-]+)(?:\[([0-9]+)\])?$").unwrap());

/// One parsed path segment: a mapping key with an optional array index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathSegment {
    pub key: String,
    pub index: Option<usize>,
}

impl PathSegment {
    /// Parse a single segment. Returns `None` if it does not match the
    /// segment grammar (including indexes too large for `usize`).
    pub fn parse(segment: &str) -> Option<Self> {
        let caps = SEGMENT_RE.captures(segment)?;
        let key = caps.get(1)?.as_str().to_string();
        let index = match caps.get(2) {
            Some(m) => Some(m.as_str().parse::<usize>().ok()?),
            None => None,
        };
        Some(PathSegment { key, index })
    }
}

/// Parse a whole path into segments. The empty path has no segments.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, PathError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    path.split('.')
        .map(|raw| {
            PathSegment::parse(raw).ok_or_else(|| PathError::InvalidSegment {
                path: path.to_string(),
                segment: raw.to_string(),
            })
        })
        .collect()
}

// ─── Reads ──────────────────────────────────────────────────────────────────

fn step<'a>(current: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    let child = current.as_object()?.get(&segment.key)?;
    match segment.index {
        Some(idx) => child.as_array()?.get(idx),
        None => Some(child),
    }
}

fn step_mut<'a>(current: &'a mut Value, segment: &PathSegment) -> Option<&'a mut Value> {
    let child = current.as_object_mut()?.get_mut(&segment.key)?;
    match segment.index {
        Some(idx) => child.as_array_mut()?.get_mut(idx),
        None => Some(child),
    }
}

/// Resolve `path` against `doc`. The empty path resolves to the root.
pub fn get<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(doc);
    }
    let mut current = doc;
    for raw in path.split('.') {
        let segment = PathSegment::parse(raw)?;
        current = step(current, &segment)?;
    }
    Some(current)
}

/// Mutable counterpart of [`get`].
pub fn get_mut<'a>(doc: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    if path.is_empty() {
        return Some(doc);
    }
    let mut current = doc;
    for raw in path.split('.') {
        let segment = PathSegment::parse(raw)?;
        current = step_mut(current, &segment)?;
    }
    Some(current)
}

/// Whether `path` resolves to a value. An explicit `null`, `false` or `0`
/// leaf is present.
pub fn has(doc: &Value, path: &str) -> bool {
    get(doc, path).is_some()
}

// ─── Writes ─────────────────────────────────────────────────────────────────

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    let Value::Object(map) = value else {
        unreachable!("value was just replaced by an object")
    };
    map
}

fn ensure_array(value: &mut Value) -> &mut Vec<Value> {
    if !value.is_array() {
        *value = Value::Array(Vec::new());
    }
    let Value::Array(items) = value else {
        unreachable!("value was just replaced by an array")
    };
    items
}

/// Slot addressed by `segment` under `current`, materializing the mapping,
/// the array and any padding needed to reach it.
fn slot_mut<'a>(current: &'a mut Value, segment: &PathSegment) -> &'a mut Value {
    let slot = ensure_object(current)
        .entry(segment.key.clone())
        .or_insert(Value::Null);
    match segment.index {
        Some(idx) => {
            let items = ensure_array(slot);
            if items.len() <= idx {
                items.resize(idx + 1, Value::Null);
            }
            &mut items[idx]
        }
        None => slot,
    }
}

/// Reject indexes that would pad an array by [`MAX_INDEX_GROWTH`] or more,
/// before anything is written.
fn check_growth(doc: &Value, segments: &[PathSegment], path: &str) -> Result<(), PathError> {
    let mut current = Some(doc);
    for segment in segments {
        let child = current
            .and_then(Value::as_object)
            .and_then(|map| map.get(&segment.key));
        current = match segment.index {
            None => child,
            Some(idx) => {
                let items = child.and_then(Value::as_array);
                let len = items.map_or(0, Vec::len);
                if idx >= len && idx - len >= MAX_INDEX_GROWTH {
                    return Err(PathError::IndexOutOfRange {
                        path: path.to_string(),
                        index: idx,
                    });
                }
                items.and_then(|items| items.get(idx))
            }
        };
    }
    Ok(())
}

/// Write `value` at `path`, creating missing intermediate containers.
///
/// An intermediate addressed with an index becomes an array, any other becomes
/// a mapping. Scalars standing where a container is needed are replaced.
/// Arrays grow with `null` padding up to the addressed index, by fewer than
/// [`MAX_INDEX_GROWTH`] elements. On error `doc` is left untouched.
pub fn set(doc: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    let segments = parse_path(path)?;
    if segments.is_empty() {
        return Err(PathError::Empty);
    }
    check_growth(doc, &segments, path)?;
    let mut current = doc;
    for segment in &segments {
        current = slot_mut(current, segment);
    }
    *current = value;
    Ok(())
}

/// Remove the value at `path`.
///
/// Mapping keys are removed with the order of the remaining keys kept; array
/// elements are spliced out. A no-op when anything along the path is absent.
pub fn delete(doc: &mut Value, path: &str) {
    let Ok(segments) = parse_path(path) else {
        return;
    };
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = doc;
    for segment in parents {
        current = match step_mut(current, segment) {
            Some(v) => v,
            None => return,
        };
    }
    let Some(map) = current.as_object_mut() else {
        return;
    };
    match last.index {
        None => {
            map.shift_remove(&last.key);
        }
        Some(idx) => {
            if let Some(items) = map.get_mut(&last.key).and_then(Value::as_array_mut) {
                if idx < items.len() {
                    items.remove(idx);
                }
            }
        }
    }
}

// ─── Path arithmetic ────────────────────────────────────────────────────────

/// All but the last dot-separated segment. Empty for single-segment paths.
pub fn parent_path(path: &str) -> String {
    match path.rsplit_once('.') {
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    }
}

/// Append a key to a path.
pub fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Split a path at its first wildcard into `(base, remainder)`.
///
/// `spec.containers[*].image` → `("spec.containers", ".image")`.
pub fn split_wildcard(path: &str) -> Option<(&str, &str)> {
    path.split_once(WILDCARD)
}

/// Number of wildcard markers in `path`.
pub fn wildcard_count(path: &str) -> usize {
    path.matches(WILDCARD).count()
}

/// Whether the wildcard in `path`, if any, has a form the matcher can expand:
/// a single `[*]` directly after a key, followed by `.` or the end of the path.
pub fn wildcard_is_supported(path: &str) -> bool {
    match split_wildcard(path) {
        None => true,
        Some((base, remainder)) => {
            wildcard_count(path) == 1
                && !base.is_empty()
                && (remainder.is_empty() || remainder.starts_with('.'))
        }
    }
}
