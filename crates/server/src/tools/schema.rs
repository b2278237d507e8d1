//! Schema tools: class and field management. All of these require the
//! master key upstream.

use super::{json_text_result, parse_args, tool};
use crate::error::Result;
use parsebridge_rest::client::ParseClient;
use parsebridge_rest::ops;
use reqwest::Method;
use rmcp::model::{CallToolResult, Tool};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

pub const GET_SCHEMAS: &str = "parse_get_schemas";
pub const GET_SCHEMA: &str = "parse_get_schema";
pub const CREATE_CLASS: &str = "parse_create_class";
pub const UPDATE_SCHEMA: &str = "parse_update_schema";
pub const DELETE_CLASS: &str = "parse_delete_class";
pub const ADD_FIELD: &str = "parse_add_field";
pub const DELETE_FIELD: &str = "parse_delete_field";

const FIELD_TYPE_DESCRIPTION: &str =
    "Field type (String, Number, Boolean, Date, File, GeoPoint, Pointer, Relation, Array, Object)";

fn field_def_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "type": {"type": "string", "description": FIELD_TYPE_DESCRIPTION},
            "targetClass": {"type": "string", "description": "Target class for Pointer or Relation"},
            "required": {"type": "boolean", "description": "Whether the field is required"},
            "defaultValue": {"description": "Default value"},
        },
        "required": ["type"],
    })
}

#[must_use]
pub fn catalog() -> Vec<Tool> {
    vec![
        tool(
            GET_SCHEMAS,
            "List every class schema on the server: class names, fields, types and permissions. Requires the master key.",
            &Method::GET,
            json!({"type": "object", "properties": {}}),
        ),
        tool(
            GET_SCHEMA,
            "Fetch the full schema of one class: fields, data types, relations and class-level permissions. Requires the master key.",
            &Method::GET,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                },
                "required": ["className"],
            }),
        ),
        tool(
            CREATE_CLASS,
            "Create a new class with its field structure and optional class-level permissions. Requires the master key.",
            &Method::POST,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Name of the class to create"},
                    "fields": {
                        "type": "object",
                        "additionalProperties": field_def_schema(),
                        "description": "Schema fields, keyed by field name",
                    },
                    "classLevelPermissions": {"type": "object", "description": "Class-level permissions (CLP)"},
                },
                "required": ["className", "fields"],
            }),
        ),
        tool(
            UPDATE_SCHEMA,
            "Add or modify fields of an existing class, or update its class-level permissions. Cannot remove fields (use parse_delete_field). Requires the master key.",
            &Method::PUT,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                    "fields": {
                        "type": "object",
                        "additionalProperties": field_def_schema(),
                        "description": "Fields to add or modify",
                    },
                    "classLevelPermissions": {"type": "object", "description": "Class-level permissions (CLP)"},
                },
                "required": ["className"],
            }),
        ),
        tool(
            DELETE_CLASS,
            "Permanently delete a class and ALL of its objects. Irreversible. Requires the master key.",
            &Method::DELETE,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Name of the class to delete"},
                },
                "required": ["className"],
            }),
        ),
        tool(
            ADD_FIELD,
            "Add one field to an existing class. Requires the master key.",
            &Method::PUT,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                    "fieldName": {"type": "string", "description": "Name of the field to add"},
                    "fieldType": {"type": "string", "description": FIELD_TYPE_DESCRIPTION},
                    "targetClass": {"type": "string", "description": "Target class for Pointer or Relation"},
                    "required": {"type": "boolean", "description": "Whether the field is required"},
                    "defaultValue": {"description": "Default value"},
                },
                "required": ["className", "fieldName", "fieldType"],
            }),
        ),
        tool(
            DELETE_FIELD,
            "Permanently delete a field from a class; its data is lost on every object. Requires the master key.",
            &Method::PUT,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                    "fieldName": {"type": "string", "description": "Name of the field to delete"},
                },
                "required": ["className", "fieldName"],
            }),
        ),
    ]
}

/// One schema field definition; serializes without absent keys so Pointer
/// and Relation defs come out as exactly `{type, targetClass}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct FieldDef {
    #[serde(rename = "type")]
    field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_value: Option<Value>,
}

pub async fn get_schemas(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct NoArgs {}
    let _: NoArgs = parse_args(arguments)?;

    let data = client.get_master("/schemas").await?;
    json_text_result(&data)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct GetSchemaArgs {
    class_name: String,
}

pub async fn get_schema(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: GetSchemaArgs = parse_args(arguments)?;

    let data = client
        .get_master(&format!("/schemas/{}", args.class_name))
        .await?;
    json_text_result(&data)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct CreateClassArgs {
    class_name: String,
    fields: BTreeMap<String, FieldDef>,
    class_level_permissions: Option<Map<String, Value>>,
}

pub async fn create_class(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: CreateClassArgs = parse_args(arguments)?;

    let mut payload = Map::new();
    payload.insert("className".to_string(), json!(args.class_name));
    payload.insert("fields".to_string(), serde_json::to_value(&args.fields)?);
    if let Some(permissions) = args.class_level_permissions {
        payload.insert(
            "classLevelPermissions".to_string(),
            Value::Object(permissions),
        );
    }

    let data = client.post_master("/schemas", Value::Object(payload)).await?;
    json_text_result(&data)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct UpdateSchemaArgs {
    class_name: String,
    fields: Option<BTreeMap<String, FieldDef>>,
    class_level_permissions: Option<Map<String, Value>>,
}

pub async fn update_schema(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: UpdateSchemaArgs = parse_args(arguments)?;

    let mut payload = Map::new();
    if let Some(fields) = &args.fields {
        payload.insert("fields".to_string(), serde_json::to_value(fields)?);
    }
    if let Some(permissions) = args.class_level_permissions {
        payload.insert(
            "classLevelPermissions".to_string(),
            Value::Object(permissions),
        );
    }

    let data = client
        .put_master(&format!("/schemas/{}", args.class_name), Value::Object(payload))
        .await?;
    json_text_result(&data)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct DeleteClassArgs {
    class_name: String,
}

pub async fn delete_class(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: DeleteClassArgs = parse_args(arguments)?;

    let data = client
        .delete_master(&format!("/schemas/{}", args.class_name))
        .await?;
    json_text_result(&data)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct AddFieldArgs {
    class_name: String,
    field_name: String,
    field_type: String,
    target_class: Option<String>,
    required: Option<bool>,
    default_value: Option<Value>,
}

pub async fn add_field(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: AddFieldArgs = parse_args(arguments)?;

    let field_def = FieldDef {
        field_type: args.field_type,
        target_class: args.target_class,
        required: args.required,
        default_value: args.default_value,
    };

    let mut fields = Map::new();
    fields.insert(args.field_name.clone(), serde_json::to_value(&field_def)?);
    let payload = json!({ "fields": fields });

    let data = client
        .put_master(&format!("/schemas/{}", args.class_name), payload)
        .await?;
    json_text_result(&data)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct DeleteFieldArgs {
    class_name: String,
    field_name: String,
}

pub async fn delete_field(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: DeleteFieldArgs = parse_args(arguments)?;

    let mut fields = Map::new();
    fields.insert(args.field_name.clone(), ops::delete_field());
    let payload = json!({ "fields": fields });

    let data = client
        .put_master(&format!("/schemas/{}", args.class_name), payload)
        .await?;
    json_text_result(&data)
}
