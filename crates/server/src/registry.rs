//! Flat catalog of Parse tools and name-based dispatch.

use crate::error::{Result, ServerError};
use crate::tools::{cloud, read, relations, schema, security, write};
use parsebridge_rest::client::ParseClient;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

/// Owns the shared [`ParseClient`] and routes tool calls to their handlers.
///
/// Tools hold no state of their own; concurrent invocations only share the
/// client's connection pool.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    client: ParseClient,
}

impl ToolRegistry {
    #[must_use]
    pub fn new(client: ParseClient) -> Self {
        Self { client }
    }

    /// Every tool exposed by this server, in catalog order.
    #[must_use]
    pub fn catalog() -> Vec<Tool> {
        let mut tools = Vec::new();
        tools.extend(read::catalog());
        tools.extend(write::catalog());
        tools.extend(schema::catalog());
        tools.extend(security::catalog());
        tools.extend(relations::catalog());
        tools.extend(cloud::catalog());
        tools
    }

    /// Dispatch one tool call.
    ///
    /// # Errors
    ///
    /// [`ServerError::UnknownTool`] for names not in the catalog; otherwise
    /// whatever the handler raises (validation before any network call,
    /// upstream and transport failures after).
    pub async fn call(&self, name: &str, arguments: Value) -> Result<CallToolResult> {
        let client = &self.client;
        match name {
            read::GET_OBJECT => read::get_object(client, arguments).await,
            read::QUERY => read::query(client, arguments).await,
            read::GET_RELATION => read::get_relation(client, arguments).await,
            read::COUNT => read::count(client, arguments).await,
            read::AGGREGATE => read::aggregate(client, arguments).await,

            write::CREATE_OBJECT => write::create_object(client, arguments).await,
            write::UPDATE_OBJECT => write::update_object(client, arguments).await,
            write::DELETE_OBJECT => write::delete_object(client, arguments).await,
            write::BATCH => write::batch(client, arguments).await,
            write::INCREMENT_FIELD => write::increment_field(client, arguments).await,
            write::ADD_TO_ARRAY => write::add_to_array(client, arguments).await,
            write::REMOVE_FROM_ARRAY => write::remove_from_array(client, arguments).await,

            schema::GET_SCHEMAS => schema::get_schemas(client, arguments).await,
            schema::GET_SCHEMA => schema::get_schema(client, arguments).await,
            schema::CREATE_CLASS => schema::create_class(client, arguments).await,
            schema::UPDATE_SCHEMA => schema::update_schema(client, arguments).await,
            schema::DELETE_CLASS => schema::delete_class(client, arguments).await,
            schema::ADD_FIELD => schema::add_field(client, arguments).await,
            schema::DELETE_FIELD => schema::delete_field(client, arguments).await,

            security::CREATE_ROLE => security::create_role(client, arguments).await,
            security::GET_ROLE => security::get_role(client, arguments).await,
            security::LIST_ROLES => security::list_roles(client, arguments).await,
            security::UPDATE_ROLE => security::update_role(client, arguments).await,
            security::DELETE_ROLE => security::delete_role(client, arguments).await,
            security::ADD_USERS_TO_ROLE => security::add_users_to_role(client, arguments).await,
            security::REMOVE_USERS_FROM_ROLE => {
                security::remove_users_from_role(client, arguments).await
            }
            security::UPDATE_CLP => security::update_clp(client, arguments).await,
            security::CREATE_USER => security::create_user(client, arguments).await,
            security::GET_USER => security::get_user(client, arguments).await,
            security::LIST_USERS => security::list_users(client, arguments).await,

            relations::ADD_RELATION => relations::add_relation(client, arguments).await,
            relations::REMOVE_RELATION => relations::remove_relation(client, arguments).await,
            relations::QUERY_RELATION => relations::query_relation(client, arguments).await,
            relations::LIST_CLASS_RELATIONS => {
                relations::list_class_relations(client, arguments).await
            }

            cloud::CALL_FUNCTION => cloud::call_function(client, arguments).await,
            cloud::RUN_JOB => cloud::run_job(client, arguments).await,
            cloud::GET_CLOUD_CODE_INFO => cloud::get_cloud_code_info(client, arguments).await,

            other => Err(ServerError::UnknownTool(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ToolRegistry;
    use std::collections::HashSet;

    #[test]
    fn catalog_names_are_unique_and_prefixed() {
        let tools = ToolRegistry::catalog();
        assert!(!tools.is_empty());

        let mut seen = HashSet::new();
        for tool in &tools {
            assert!(
                seen.insert(tool.name.to_string()),
                "duplicate tool name: {}",
                tool.name
            );
            assert!(
                tool.name.starts_with("parse_"),
                "unexpected tool name: {}",
                tool.name
            );
        }
    }

    #[test]
    fn catalog_entries_declare_object_schemas_and_annotations() {
        for tool in ToolRegistry::catalog() {
            assert_eq!(
                tool.input_schema.get("type").and_then(|t| t.as_str()),
                Some("object"),
                "tool {} must declare an object input schema",
                tool.name
            );
            let annotations = tool.annotations.as_ref().expect("annotations");
            assert_eq!(annotations.open_world_hint, Some(true));
        }
    }
}
