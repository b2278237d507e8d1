//! Write tools: object CRUD, batch operations, atomic field updates.

use super::{json_text_result, parse_args, tool};
use crate::error::{Result, ServerError};
use parsebridge_rest::client::ParseClient;
use parsebridge_rest::normalize::normalize_relations;
use parsebridge_rest::ops;
use reqwest::Method;
use rmcp::model::{CallToolResult, Tool};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

pub const CREATE_OBJECT: &str = "parse_create_object";
pub const UPDATE_OBJECT: &str = "parse_update_object";
pub const DELETE_OBJECT: &str = "parse_delete_object";
pub const BATCH: &str = "parse_batch";
pub const INCREMENT_FIELD: &str = "parse_increment_field";
pub const ADD_TO_ARRAY: &str = "parse_add_to_array";
pub const REMOVE_FROM_ARRAY: &str = "parse_remove_from_array";

#[must_use]
pub fn catalog() -> Vec<Tool> {
    vec![
        tool(
            CREATE_OBJECT,
            "Create a new object in a Parse class. Values shaped like {className, objectId} are rewritten to pointers, and arrays of them to relation-add operations. Returns the new objectId.",
            &Method::POST,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                    "data": {"type": "object", "description": "Fields of the object to create"},
                },
                "required": ["className", "data"],
            }),
        ),
        tool(
            UPDATE_OBJECT,
            "Update fields of an existing object. Only the given fields change; pointer/relation literals in data are rewritten like in parse_create_object.",
            &Method::PUT,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                    "objectId": {"type": "string", "description": "objectId of the record to update"},
                    "data": {"type": "object", "description": "Fields to update"},
                },
                "required": ["className", "objectId", "data"],
            }),
        ),
        tool(
            DELETE_OBJECT,
            "Permanently delete an object from a Parse class.",
            &Method::DELETE,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                    "objectId": {"type": "string", "description": "objectId of the record to delete"},
                },
                "required": ["className", "objectId"],
            }),
        ),
        tool(
            BATCH,
            "Run several create/update/delete operations in one call. Each request carries method, path and an optional body; the upstream's per-item success/error array is returned unmodified.",
            &Method::POST,
            json!({
                "type": "object",
                "properties": {
                    "requests": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "method": {"type": "string", "enum": ["POST", "PUT", "DELETE"]},
                                "path": {"type": "string", "description": "Relative path, e.g. /classes/MyClass/objectId"},
                                "body": {"type": "object", "description": "Payload for POST/PUT"},
                            },
                            "required": ["method", "path"],
                        },
                        "description": "Operations to execute",
                    },
                },
                "required": ["requests"],
            }),
        ),
        tool(
            INCREMENT_FIELD,
            "Atomically increment (or decrement, with a negative amount) a numeric field. Defaults to +1.",
            &Method::PUT,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                    "objectId": {"type": "string", "description": "objectId of the record"},
                    "fieldName": {"type": "string", "description": "Numeric field to increment"},
                    "amount": {"type": "number", "default": 1, "description": "Amount to add (default 1)"},
                },
                "required": ["className", "objectId", "fieldName"],
            }),
        ),
        tool(
            ADD_TO_ARRAY,
            "Atomically append primitive values (string, number, boolean, null) to an array field. Set unique to use AddUnique and skip duplicates.",
            &Method::PUT,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                    "objectId": {"type": "string", "description": "objectId of the record"},
                    "fieldName": {"type": "string", "description": "Array field name"},
                    "values": {
                        "type": "array",
                        "minItems": 1,
                        "items": {"type": ["string", "number", "boolean", "null"]},
                        "description": "Primitive values to append",
                    },
                    "unique": {"type": "boolean", "default": false, "description": "Use AddUnique"},
                },
                "required": ["className", "objectId", "fieldName", "values"],
            }),
        ),
        tool(
            REMOVE_FROM_ARRAY,
            "Atomically remove primitive values (string, number, boolean, null) from an array field.",
            &Method::PUT,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                    "objectId": {"type": "string", "description": "objectId of the record"},
                    "fieldName": {"type": "string", "description": "Array field name"},
                    "values": {
                        "type": "array",
                        "minItems": 1,
                        "items": {"type": ["string", "number", "boolean", "null"]},
                        "description": "Primitive values to remove",
                    },
                },
                "required": ["className", "objectId", "fieldName", "values"],
            }),
        ),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct CreateObjectArgs {
    class_name: String,
    data: Map<String, Value>,
}

pub async fn create_object(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: CreateObjectArgs = parse_args(arguments)?;

    let body = normalize_relations(Value::Object(args.data));
    let path = format!("/classes/{}", args.class_name);
    let result = client.post(&path, body).await?;
    json_text_result(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct UpdateObjectArgs {
    class_name: String,
    object_id: String,
    data: Map<String, Value>,
}

pub async fn update_object(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: UpdateObjectArgs = parse_args(arguments)?;

    let body = normalize_relations(Value::Object(args.data));
    let path = format!("/classes/{}/{}", args.class_name, args.object_id);
    let result = client.put(&path, body).await?;
    json_text_result(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct DeleteObjectArgs {
    class_name: String,
    object_id: String,
}

pub async fn delete_object(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: DeleteObjectArgs = parse_args(arguments)?;

    let path = format!("/classes/{}/{}", args.class_name, args.object_id);
    let result = client.delete(&path).await?;
    json_text_result(&result)
}

#[derive(Debug, Deserialize, Serialize)]
enum BatchMethod {
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "DELETE")]
    Delete,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct BatchRequest {
    method: BatchMethod,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BatchArgs {
    requests: Vec<BatchRequest>,
}

pub async fn batch(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: BatchArgs = parse_args(arguments)?;

    let body = json!({ "requests": serde_json::to_value(&args.requests)? });
    let result = client.post("/batch", body).await?;
    json_text_result(&result)
}

fn default_increment_amount() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct IncrementFieldArgs {
    class_name: String,
    object_id: String,
    field_name: String,
    #[serde(default = "default_increment_amount")]
    amount: f64,
}

pub async fn increment_field(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: IncrementFieldArgs = parse_args(arguments)?;

    let mut body = Map::new();
    body.insert(args.field_name.clone(), ops::increment(args.amount));

    let path = format!("/classes/{}/{}", args.class_name, args.object_id);
    let result = client.put(&path, Value::Object(body)).await?;
    json_text_result(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct AddToArrayArgs {
    class_name: String,
    object_id: String,
    field_name: String,
    values: Vec<Value>,
    #[serde(default)]
    unique: bool,
}

pub async fn add_to_array(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: AddToArrayArgs = parse_args(arguments)?;
    check_primitive_values(&args.values)?;

    let mut body = Map::new();
    body.insert(
        args.field_name.clone(),
        ops::array_add(&args.values, args.unique),
    );

    let path = format!("/classes/{}/{}", args.class_name, args.object_id);
    let result = client.put(&path, Value::Object(body)).await?;
    json_text_result(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RemoveFromArrayArgs {
    class_name: String,
    object_id: String,
    field_name: String,
    values: Vec<Value>,
}

pub async fn remove_from_array(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: RemoveFromArrayArgs = parse_args(arguments)?;
    check_primitive_values(&args.values)?;

    let mut body = Map::new();
    body.insert(args.field_name.clone(), ops::array_remove(&args.values));

    let path = format!("/classes/{}/{}", args.class_name, args.object_id);
    let result = client.put(&path, Value::Object(body)).await?;
    json_text_result(&result)
}

fn check_primitive_values(values: &[Value]) -> Result<()> {
    if values.is_empty() {
        return Err(ServerError::Validation(
            "values must contain at least one element".to_string(),
        ));
    }
    if values.iter().any(|v| v.is_array() || v.is_object()) {
        return Err(ServerError::Validation(
            "values must be primitives (string, number, boolean or null)".to_string(),
        ));
    }
    Ok(())
}
