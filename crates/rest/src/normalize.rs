//! Pointer/relation normalization for object writes.
//!
//! Callers of the write tools describe links as plain
//! `{className, objectId}` literals; Parse's wire format wants typed
//! pointers and relation operations. [`normalize_relations`] rewrites a
//! JSON tree in one depth-first pass:
//!
//! - an object carrying both keys becomes a `Pointer`;
//! - a non-empty array whose every element carries both keys becomes an
//!   `AddRelation` operation over pointers;
//! - everything else recurses (objects, mixed arrays) or passes through
//!   (scalars, null, empty arrays).

use crate::ops;
use serde_json::{Map, Value, json};

/// Recognized shape of a JSON value, decided before any rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// String, number, boolean, or null.
    Scalar,
    /// Object carrying non-empty string `className` and `objectId`.
    Reference,
    /// Non-empty array whose every element is a `Reference`.
    ReferenceCollection,
    /// Any other array.
    PlainArray,
    /// Any other object.
    PlainObject,
}

/// Classify a value without modifying it.
#[must_use]
pub fn classify(value: &Value) -> Shape {
    match value {
        Value::Array(items) => {
            if !items.is_empty() && items.iter().all(is_reference) {
                Shape::ReferenceCollection
            } else {
                Shape::PlainArray
            }
        }
        Value::Object(_) => {
            if is_reference(value) {
                Shape::Reference
            } else {
                Shape::PlainObject
            }
        }
        _ => Shape::Scalar,
    }
}

fn is_reference(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    let non_empty_string =
        |key: &str| object.get(key).and_then(Value::as_str).is_some_and(|s| !s.is_empty());
    non_empty_string("className") && non_empty_string("objectId")
}

/// Rewrite reference shapes into Parse wire values.
///
/// Scalars and unrelated objects pass through unchanged; key identity is
/// preserved on recursion. A `Reference` with extra keys is still rewritten
/// to a bare pointer (the extra keys are dropped).
///
/// Known re-entrancy hazard: a wire pointer `{__type, className, objectId}`
/// fed back through this function matches the `Reference` shape again and is
/// re-wrapped.
#[must_use]
pub fn normalize_relations(value: Value) -> Value {
    match (classify(&value), value) {
        (Shape::Reference, reference) => pointer_of(&reference),
        (Shape::ReferenceCollection, Value::Array(items)) => json!({
            "__op": "AddRelation",
            "objects": items.iter().map(pointer_of).collect::<Vec<_>>(),
        }),
        (Shape::PlainArray, Value::Array(items)) => {
            Value::Array(items.into_iter().map(normalize_relations).collect())
        }
        (Shape::PlainObject, Value::Object(entries)) => Value::Object(
            entries
                .into_iter()
                .map(|(key, nested)| (key, normalize_relations(nested)))
                .collect::<Map<_, _>>(),
        ),
        (_, other) => other,
    }
}

fn pointer_of(reference: &Value) -> Value {
    let class_name = reference
        .get("className")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let object_id = reference
        .get("objectId")
        .and_then(Value::as_str)
        .unwrap_or_default();
    ops::pointer(class_name, object_id)
}
