//! Tool implementations, grouped by concern the way the catalog is grouped.

pub mod cloud;
pub mod read;
pub mod relations;
pub mod schema;
pub mod security;
pub mod write;

use crate::error::{Result, ServerError};
use rmcp::model::{CallToolResult, Content, Tool};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Deserialize validated tool arguments. Unknown and missing required fields
/// fail here, before any network call is made.
pub(crate) fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| ServerError::Validation(e.to_string()))
}

/// Wrap a JSON value as the uniform pretty-printed text result.
pub(crate) fn json_text_result(value: &Value) -> Result<CallToolResult> {
    let text = serde_json::to_string_pretty(value)?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Build a catalog entry with method-derived annotations.
pub(crate) fn tool(
    name: &'static str,
    description: &'static str,
    method: &reqwest::Method,
    input_schema: Value,
) -> Tool {
    let schema_obj = input_schema.as_object().cloned().unwrap_or_default();
    let mut tool = Tool::new(name, description, Arc::new(schema_obj));
    tool.annotations = Some(crate::semantics::annotations_for_method(method));
    tool
}
