//! Cloud code tools: functions, background jobs, discovery.

use super::{json_text_result, parse_args, tool};
use crate::error::Result;
use parsebridge_rest::client::ParseClient;
use reqwest::Method;
use rmcp::model::{CallToolResult, Tool};
use serde::Deserialize;
use serde_json::{Map, Value, json};

pub const CALL_FUNCTION: &str = "parse_call_cloud_function";
pub const RUN_JOB: &str = "parse_run_job";
pub const GET_CLOUD_CODE_INFO: &str = "parse_get_cloud_code_info";

#[must_use]
pub fn catalog() -> Vec<Tool> {
    vec![
        tool(
            CALL_FUNCTION,
            "Call a Cloud Function by name with optional JSON params and return its result.",
            &Method::POST,
            json!({
                "type": "object",
                "properties": {
                    "functionName": {"type": "string", "description": "Cloud Function name"},
                    "params": {"type": "object", "description": "Function parameters, e.g. {\"patientId\": \"...\"}"},
                },
                "required": ["functionName"],
            }),
        ),
        tool(
            RUN_JOB,
            "Start a Background Job (heavy tasks, cleanups, reports). Requires the master key.",
            &Method::POST,
            json!({
                "type": "object",
                "properties": {
                    "jobName": {"type": "string", "description": "Job name"},
                    "params": {"type": "object", "description": "Job parameters"},
                },
                "required": ["jobName"],
            }),
        ),
        tool(
            GET_CLOUD_CODE_INFO,
            "List the Cloud Functions and Background Jobs defined on the server. Requires the master key.",
            &Method::GET,
            json!({"type": "object", "properties": {}}),
        ),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct CallFunctionArgs {
    function_name: String,
    params: Option<Map<String, Value>>,
}

pub async fn call_function(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: CallFunctionArgs = parse_args(arguments)?;

    let body = Value::Object(args.params.unwrap_or_default());
    let data = client
        .post(&format!("/functions/{}", args.function_name), body)
        .await?;
    json_text_result(&data)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RunJobArgs {
    job_name: String,
    params: Option<Map<String, Value>>,
}

pub async fn run_job(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: RunJobArgs = parse_args(arguments)?;

    let body = Value::Object(args.params.unwrap_or_default());
    let data = client
        .post_master(&format!("/jobs/{}", args.job_name), body)
        .await?;
    json_text_result(&data)
}

pub async fn get_cloud_code_info(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct NoArgs {}
    let _: NoArgs = parse_args(arguments)?;

    let data = client.get_master("/cloudCode").await?;
    json_text_result(&data)
}
