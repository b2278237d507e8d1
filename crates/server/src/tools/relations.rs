//! Relation tools: membership edits and relation queries.
//!
//! `parse_query_relation` is the one tool that needs two upstream calls: the
//! relation's target class is not part of the owning object, so it is
//! resolved from the class schema before the data query.

use super::{json_text_result, parse_args, tool};
use crate::error::{Result, ServerError};
use parsebridge_rest::client::ParseClient;
use parsebridge_rest::ops;
use parsebridge_rest::query::QueryString;
use reqwest::Method;
use rmcp::model::{CallToolResult, Tool};
use serde::Deserialize;
use serde_json::{Map, Value, json};

pub const ADD_RELATION: &str = "parse_add_relation";
pub const REMOVE_RELATION: &str = "parse_remove_relation";
pub const QUERY_RELATION: &str = "parse_query_relation";
pub const LIST_CLASS_RELATIONS: &str = "parse_list_class_relations";

#[must_use]
pub fn catalog() -> Vec<Tool> {
    vec![
        tool(
            ADD_RELATION,
            "Add objects to a Relation field (many-to-many link). Provide the owning className/objectId, the relation field, the target class and the objectIds to add. Requires the master key.",
            &Method::PUT,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Class owning the relation field"},
                    "objectId": {"type": "string", "description": "objectId of the owning object"},
                    "relationField": {"type": "string", "description": "Relation field name"},
                    "targetClassName": {"type": "string", "description": "Class of the related objects"},
                    "objectIds": {"type": "array", "items": {"type": "string"}, "description": "objectIds to add to the relation"},
                },
                "required": ["className", "objectId", "relationField", "targetClassName", "objectIds"],
            }),
        ),
        tool(
            REMOVE_RELATION,
            "Remove objects from a Relation field. Provide the owning className/objectId, the relation field, the target class and the objectIds to remove. Requires the master key.",
            &Method::PUT,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Class owning the relation field"},
                    "objectId": {"type": "string", "description": "objectId of the owning object"},
                    "relationField": {"type": "string", "description": "Relation field name"},
                    "targetClassName": {"type": "string", "description": "Class of the related objects"},
                    "objectIds": {"type": "array", "items": {"type": "string"}, "description": "objectIds to remove from the relation"},
                },
                "required": ["className", "objectId", "relationField", "targetClassName", "objectIds"],
            }),
        ),
        tool(
            QUERY_RELATION,
            "Query the members of a Relation field with optional filters, ordering and pagination. Resolves the target class from the schema, then runs a $relatedTo query.",
            &Method::GET,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Class owning the relation field"},
                    "objectId": {"type": "string", "description": "objectId of the owning object"},
                    "relationField": {"type": "string", "description": "Relation field name"},
                    "where": {"type": "object", "description": "Extra filter merged into the $relatedTo query"},
                    "order": {"type": "string", "description": "Sort field, prefix with - for descending"},
                    "limit": {"type": "integer", "description": "Maximum results"},
                    "skip": {"type": "integer", "description": "Results to skip for pagination"},
                },
                "required": ["className", "objectId", "relationField"],
            }),
        ),
        tool(
            LIST_CLASS_RELATIONS,
            "List the Pointer and Relation fields of a class with their target classes. Requires the master key.",
            &Method::GET,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                },
                "required": ["className"],
            }),
        ),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct EditRelationArgs {
    class_name: String,
    object_id: String,
    relation_field: String,
    target_class_name: String,
    object_ids: Vec<String>,
}

async fn edit_relation(
    client: &ParseClient,
    args: EditRelationArgs,
    remove: bool,
) -> Result<CallToolResult> {
    let operation = if remove {
        ops::remove_relation(&args.target_class_name, &args.object_ids)
    } else {
        ops::add_relation(&args.target_class_name, &args.object_ids)
    };

    let mut body = Map::new();
    body.insert(args.relation_field.clone(), operation);

    let result = client
        .put_master(
            &format!("/classes/{}/{}", args.class_name, args.object_id),
            Value::Object(body),
        )
        .await?;

    let verb = if remove { "Removed" } else { "Added" };
    let preposition = if remove { "from" } else { "to" };
    json_text_result(&json!({
        "success": true,
        "message": format!(
            "{verb} {} object(s) {preposition} relation '{}'",
            args.object_ids.len(),
            args.relation_field
        ),
        "result": result,
    }))
}

pub async fn add_relation(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: EditRelationArgs = parse_args(arguments)?;
    edit_relation(client, args, false).await
}

pub async fn remove_relation(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: EditRelationArgs = parse_args(arguments)?;
    edit_relation(client, args, true).await
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct QueryRelationArgs {
    class_name: String,
    object_id: String,
    relation_field: String,
    #[serde(rename = "where")]
    where_filter: Option<Map<String, Value>>,
    order: Option<String>,
    limit: Option<u32>,
    skip: Option<u32>,
}

pub async fn query_relation(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: QueryRelationArgs = parse_args(arguments)?;

    // First call: resolve the relation's target class from the schema.
    let schema = client
        .get_master(&format!("/schemas/{}", args.class_name))
        .await?;
    let target_class = schema
        .get("fields")
        .and_then(|fields| fields.get(&args.relation_field))
        .and_then(|def| def.get("targetClass"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ServerError::Runtime(format!(
                "could not resolve the target class for relation field '{}'",
                args.relation_field
            ))
        })?;

    let mut where_filter = Map::new();
    where_filter.insert(
        "$relatedTo".to_string(),
        json!({
            "object": ops::pointer(&args.class_name, &args.object_id),
            "key": args.relation_field,
        }),
    );
    // Caller-provided keys win on conflict.
    if let Some(extra) = args.where_filter {
        where_filter.extend(extra);
    }

    let mut query = QueryString::new();
    query.push_json("where", &Value::Object(where_filter));
    if let Some(order) = &args.order {
        query.push("order", order);
    }
    if let Some(limit) = args.limit {
        query.push("limit", limit.to_string());
    }
    if let Some(skip) = args.skip {
        query.push("skip", skip.to_string());
    }

    // Second call: query the target class itself.
    let data = client
        .get_master(&format!("/classes/{target_class}{}", query.suffix()))
        .await?;

    let results = data
        .get("results")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    json_text_result(&json!({
        "count": results.len(),
        "results": results,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct ListClassRelationsArgs {
    class_name: String,
}

pub async fn list_class_relations(
    client: &ParseClient,
    arguments: Value,
) -> Result<CallToolResult> {
    let args: ListClassRelationsArgs = parse_args(arguments)?;

    let schema = client
        .get_master(&format!("/schemas/{}", args.class_name))
        .await?;

    let mut relations = Vec::new();
    if let Some(fields) = schema.get("fields").and_then(Value::as_object) {
        for (field, def) in fields {
            let field_type = def.get("type").and_then(Value::as_str).unwrap_or_default();
            if field_type == "Pointer" || field_type == "Relation" {
                relations.push(json!({
                    "field": field,
                    "type": field_type,
                    "targetClass": def.get("targetClass").cloned().unwrap_or(Value::Null),
                }));
            }
        }
    }

    json_text_result(&Value::Array(relations))
}
