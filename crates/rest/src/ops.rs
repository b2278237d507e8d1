//! Builders for Parse wire-format values.
//!
//! Operation envelopes (`__op`) request atomic server-side mutations of one
//! field instead of a value overwrite. They are constructed directly by the
//! tools that need them; the normalizer only ever emits `Pointer` and
//! `AddRelation` shapes.

use serde_json::{Value, json};

/// Wire reference to a single stored object.
#[must_use]
pub fn pointer(class_name: &str, object_id: &str) -> Value {
    json!({
        "__type": "Pointer",
        "className": class_name,
        "objectId": object_id,
    })
}

fn pointers(class_name: &str, object_ids: &[String]) -> Vec<Value> {
    object_ids
        .iter()
        .map(|id| pointer(class_name, id))
        .collect()
}

/// Add members to a many-to-many relation field.
#[must_use]
pub fn add_relation(class_name: &str, object_ids: &[String]) -> Value {
    json!({
        "__op": "AddRelation",
        "objects": pointers(class_name, object_ids),
    })
}

/// Remove members from a many-to-many relation field.
#[must_use]
pub fn remove_relation(class_name: &str, object_ids: &[String]) -> Value {
    json!({
        "__op": "RemoveRelation",
        "objects": pointers(class_name, object_ids),
    })
}

/// Atomically add to a numeric field. Negative amounts decrement.
#[must_use]
pub fn increment(amount: f64) -> Value {
    json!({
        "__op": "Increment",
        "amount": amount,
    })
}

/// Atomically append to an array field; `unique` skips existing values.
#[must_use]
pub fn array_add(values: &[Value], unique: bool) -> Value {
    json!({
        "__op": if unique { "AddUnique" } else { "Add" },
        "objects": values,
    })
}

/// Atomically remove matching values from an array field.
#[must_use]
pub fn array_remove(values: &[Value]) -> Value {
    json!({
        "__op": "Remove",
        "objects": values,
    })
}

/// Delete a field from a schema (used under `fields.<name>` in a schema PUT).
#[must_use]
pub fn delete_field() -> Value {
    json!({ "__op": "Delete" })
}

#[cfg(test)]
mod tests {
    use super::{add_relation, array_add, delete_field, increment, pointer, remove_relation};
    use serde_json::json;

    #[test]
    fn pointer_shape() {
        assert_eq!(
            pointer("_User", "u1"),
            json!({"__type": "Pointer", "className": "_User", "objectId": "u1"})
        );
    }

    #[test]
    fn relation_ops_wrap_every_id_in_order() {
        let ids = vec!["a".to_string(), "b".to_string()];
        let add = add_relation("_User", &ids);
        assert_eq!(add["__op"], "AddRelation");
        assert_eq!(add["objects"][0]["objectId"], "a");
        assert_eq!(add["objects"][1]["objectId"], "b");

        let remove = remove_relation("_Role", &ids);
        assert_eq!(remove["__op"], "RemoveRelation");
        assert_eq!(remove["objects"][0]["className"], "_Role");
    }

    #[test]
    fn increment_carries_amount() {
        assert_eq!(increment(-2.0), json!({"__op": "Increment", "amount": -2.0}));
    }

    #[test]
    fn array_add_switches_on_unique() {
        let values = vec![json!("x")];
        assert_eq!(array_add(&values, false)["__op"], "Add");
        assert_eq!(array_add(&values, true)["__op"], "AddUnique");
    }

    #[test]
    fn delete_field_is_bare_op() {
        assert_eq!(delete_field(), json!({"__op": "Delete"}));
    }
}
