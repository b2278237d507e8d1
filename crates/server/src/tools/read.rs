//! Read tools: object fetch, queries, relation reads, counting, aggregation.

use super::{json_text_result, parse_args, tool};
use crate::error::{Result, ServerError};
use parsebridge_rest::client::ParseClient;
use parsebridge_rest::query::QueryString;
use reqwest::Method;
use rmcp::model::{CallToolResult, Tool};
use serde::Deserialize;
use serde_json::{Value, json};

pub const GET_OBJECT: &str = "parse_get_object";
pub const QUERY: &str = "parse_query";
pub const GET_RELATION: &str = "parse_get_relation";
pub const COUNT: &str = "parse_count";
pub const AGGREGATE: &str = "parse_aggregate";

#[must_use]
pub fn catalog() -> Vec<Tool> {
    vec![
        tool(
            GET_OBJECT,
            "Fetch a single object from a Parse class by its objectId. Use include to inline pointer fields.",
            &Method::GET,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name, e.g. \"PatientRecord\""},
                    "objectId": {"type": "string", "description": "objectId of the record"},
                    "include": {"type": "string", "description": "Comma-separated pointer fields to inline, e.g. \"user,category\""},
                },
                "required": ["className", "objectId"],
            }),
        ),
        tool(
            QUERY,
            "Query objects of a class. Supports a Parse where filter (JSON), ordering, pagination (limit/skip), field selection (keys) and pointer inclusion (include). Where syntax: {\"field\": \"value\"} for equality, {\"field\": {\"$gt\": 10}} for comparisons.",
            &Method::GET,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                    "where": {"type": "object", "description": "Parse where filter, e.g. {\"isActive\": true}"},
                    "limit": {"type": "integer", "minimum": 1, "maximum": 1000, "description": "Maximum results (1-1000)"},
                    "skip": {"type": "integer", "minimum": 0, "description": "Results to skip for pagination"},
                    "order": {"type": "string", "description": "Sort field, prefix with - for descending, e.g. \"-createdAt\""},
                    "keys": {"type": "string", "description": "Comma-separated fields to return, e.g. \"name,email\""},
                    "include": {"type": "string", "description": "Comma-separated pointer fields to inline"},
                    "count": {"type": "boolean", "description": "Include the total result count"},
                },
                "required": ["className"],
            }),
        ),
        tool(
            GET_RELATION,
            "Fetch the objects linked through a Relation field. Returns only the related objects (null if the field is absent).",
            &Method::GET,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Owning class, e.g. \"_Role\""},
                    "objectId": {"type": "string", "description": "objectId of the owning object"},
                    "relationField": {"type": "string", "description": "Relation field name, e.g. \"permissions\""},
                },
                "required": ["className", "objectId", "relationField"],
            }),
        ),
        tool(
            COUNT,
            "Count the objects in a class, optionally restricted by a where filter. Returns {count} only.",
            &Method::GET,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                    "where": {"type": "object", "description": "Parse where filter"},
                },
                "required": ["className"],
            }),
        ),
        tool(
            AGGREGATE,
            "Run a MongoDB-style aggregation pipeline (match, group, sort, project, ...) over a class. Requires the master key.",
            &Method::POST,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                    "pipeline": {
                        "type": "array",
                        "items": {"type": "object"},
                        "description": "MongoDB aggregation pipeline stages",
                    },
                },
                "required": ["className", "pipeline"],
            }),
        ),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct GetObjectArgs {
    class_name: String,
    object_id: String,
    include: Option<String>,
}

pub async fn get_object(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: GetObjectArgs = parse_args(arguments)?;

    let mut query = QueryString::new();
    if let Some(include) = &args.include {
        query.push("include", include);
    }

    let path = format!(
        "/classes/{}/{}{}",
        args.class_name,
        args.object_id,
        query.suffix()
    );
    let data = client.get(&path).await?;
    json_text_result(&data)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct QueryArgs {
    class_name: String,
    #[serde(rename = "where")]
    where_filter: Option<Value>,
    limit: Option<u32>,
    skip: Option<u32>,
    order: Option<String>,
    keys: Option<String>,
    include: Option<String>,
    count: Option<bool>,
}

pub async fn query(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: QueryArgs = parse_args(arguments)?;
    if let Some(limit) = args.limit
        && !(1..=1000).contains(&limit)
    {
        return Err(ServerError::Validation(format!(
            "limit must be between 1 and 1000, got {limit}"
        )));
    }

    let mut query = QueryString::new();
    if let Some(where_filter) = &args.where_filter {
        query.push_json("where", where_filter);
    }
    if let Some(limit) = args.limit {
        query.push("limit", limit.to_string());
    }
    if let Some(skip) = args.skip {
        query.push("skip", skip.to_string());
    }
    if let Some(order) = &args.order {
        query.push("order", order);
    }
    if let Some(keys) = &args.keys {
        query.push("keys", keys);
    }
    if let Some(include) = &args.include {
        query.push("include", include);
    }
    if args.count.unwrap_or(false) {
        query.push("count", "1");
    }

    let path = format!("/classes/{}{}", args.class_name, query.suffix());
    let data = client.get(&path).await?;
    json_text_result(&data)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct GetRelationArgs {
    class_name: String,
    object_id: String,
    relation_field: String,
}

pub async fn get_relation(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: GetRelationArgs = parse_args(arguments)?;

    let mut query = QueryString::new();
    query.push("include", &args.relation_field);

    let path = format!(
        "/classes/{}/{}{}",
        args.class_name,
        args.object_id,
        query.suffix()
    );
    let data = client.get(&path).await?;

    let related = data.get(&args.relation_field).cloned().unwrap_or(Value::Null);
    json_text_result(&related)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct CountArgs {
    class_name: String,
    #[serde(rename = "where")]
    where_filter: Option<Value>,
}

pub async fn count(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: CountArgs = parse_args(arguments)?;

    // Counting never fetches rows: limit=0, count=1 regardless of input.
    let mut query = QueryString::new();
    query.push("count", "1");
    query.push("limit", "0");
    if let Some(where_filter) = &args.where_filter {
        query.push_json("where", where_filter);
    }

    let path = format!("/classes/{}{}", args.class_name, query.suffix());
    let data = client.get(&path).await?;

    let count = data.get("count").cloned().unwrap_or(Value::Null);
    json_text_result(&json!({ "count": count }))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct AggregateArgs {
    class_name: String,
    pipeline: Vec<Value>,
}

pub async fn aggregate(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: AggregateArgs = parse_args(arguments)?;
    if args.pipeline.iter().any(|stage| !stage.is_object()) {
        return Err(ServerError::Validation(
            "every pipeline stage must be an object".to_string(),
        ));
    }

    let path = format!("/aggregate/{}", args.class_name);
    let data = client
        .post_master(&path, json!({ "pipeline": args.pipeline }))
        .await?;
    json_text_result(&data)
}
