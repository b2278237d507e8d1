//! MCP server handler over the Parse tool registry.

use crate::registry::ToolRegistry;
use rmcp::{
    ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, ErrorData, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
};
use serde_json::Value;
use tracing::debug;

/// stdio-facing MCP handler; all behavior lives in the registry.
#[derive(Debug, Clone)]
pub struct ParseMcpServer {
    registry: ToolRegistry,
}

impl ParseMcpServer {
    #[must_use]
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }
}

impl ServerHandler for ParseMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Tools for reading and writing a Parse Server deployment over its REST API: \
                 objects and queries, schemas, roles and users, relations, and cloud code."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: ToolRegistry::catalog(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = request.arguments.map_or_else(
            || Value::Object(serde_json::Map::new()),
            Value::Object,
        );

        debug!(tool = %request.name, "tool call");
        self.registry
            .call(&request.name, arguments)
            .await
            .map_err(ErrorData::from)
    }
}
