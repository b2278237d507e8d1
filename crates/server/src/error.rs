//! Error types for the MCP server.

use parsebridge_rest::error::ParseRestError;
use rmcp::model::ErrorData;
use thiserror::Error;

/// Failures raised while handling a tool call.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Tool input failed its declared shape; raised before any network call.
    #[error("invalid tool input: {0}")]
    Validation(String),

    /// The requested tool is not in the catalog.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A tool could not complete despite valid input and a reachable
    /// upstream (e.g. a relation target class missing from the schema).
    #[error("{0}")]
    Runtime(String),

    /// Failure from the Parse REST layer, propagated unmodified.
    #[error(transparent)]
    Rest(#[from] ParseRestError),

    /// A tool result could not be serialized.
    #[error("result serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;

impl From<ServerError> for ErrorData {
    fn from(value: ServerError) -> Self {
        match value {
            ServerError::Validation(message) => ErrorData::invalid_params(message, None),
            ServerError::UnknownTool(name) => {
                ErrorData::invalid_params(format!("unknown tool: {name}"), None)
            }
            other => ErrorData::internal_error(other.to_string(), None),
        }
    }
}
