#![deny(missing_docs)]

//! # JSON Pointer Resolution
//!
//! Resolves local `$ref` strings (`#/components/schemas/Foo`) against the root
//! document. No external document or network resolution is performed; that is
//! the surrounding engine's job.

use crate::oas::schema_node::is_truthy;
use crate::violation::{JsonPath, PathSegment};
use percent_encoding::percent_decode_str;
use serde_json::Value;

/// Decodes a JSON Pointer segment (handles `~1` and `~0`, then URI percent escapes).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Splits a local reference into its decoded pointer segments.
///
/// `#/components/schemas/Foo` -> `["components", "schemas", "Foo"]`.
/// The segments are used as the report location for violations found inside a
/// referenced component.
pub fn ref_to_path(reference: &str) -> JsonPath {
    let pointer = reference.strip_prefix("#/").unwrap_or(reference);
    pointer
        .split('/')
        .map(|p| PathSegment::Key(decode_pointer_segment(p)))
        .collect()
}

/// Resolves a local reference against `root`.
///
/// Returns `None` if the reference is not of the `#/…` form, if any segment is
/// missing, or if the target is falsy (`null`, `false`, `0`, `""`).
pub fn resolve_json_pointer<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    if !reference.starts_with("#/") {
        return None;
    }

    let mut current = root;
    for segment in ref_to_path(reference) {
        current = step(current, &segment)?;
    }

    is_truthy(current).then_some(current)
}

/// Walks an already split path from `root`.
pub fn resolve_path<'a>(root: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    path.iter().try_fold(root, step)
}

fn step<'a>(current: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (current, segment) {
        (Value::Object(map), PathSegment::Key(k)) => map.get(k),
        (Value::Object(map), PathSegment::Index(i)) => map.get(&i.to_string()),
        (Value::Array(items), PathSegment::Index(i)) => items.get(*i),
        (Value::Array(items), PathSegment::Key(k)) => {
            k.parse::<usize>().ok().and_then(|i| items.get(i))
        }
        _ => None,
    }
}
