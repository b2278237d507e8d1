//! Parse Server MCP bridge entry point.
//!
//! Configuration comes from the environment (`PARSE_SERVER_URL`,
//! `PARSE_APP_ID`, and at least one of `PARSE_REST_KEY` /
//! `PARSE_MASTER_KEY`); a missing value refuses startup. The tool catalog is
//! served over MCP stdio.

use anyhow::Context as _;
use parsebridge_mcp::registry::ToolRegistry;
use parsebridge_mcp::server::ParseMcpServer;
use parsebridge_rest::client::ParseClient;
use parsebridge_rest::config::ParseConfig;
use rmcp::{ServiceExt as _, transport::stdio};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging goes to stderr only; stdout carries the MCP transport.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = ParseConfig::from_env().context("invalid Parse configuration")?;
    config.log_startup();

    let client = ParseClient::new(config).context("failed to build the Parse REST client")?;
    let server = ParseMcpServer::new(ToolRegistry::new(client));

    let service = server
        .serve(stdio())
        .await
        .context("failed to start the MCP stdio server")?;
    tracing::info!("parse MCP bridge started");

    service.waiting().await?;
    Ok(())
}
