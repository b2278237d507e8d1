//! Parse Server REST client layer.
//!
//! This crate is the HTTP half of the parsebridge MCP server:
//! - `config`: environment-driven configuration (base URL, app id, keys)
//! - `client`: the request dispatcher (`ParseClient::dispatch`)
//! - `normalize`: pointer/relation rewriting for object writes
//! - `ops`: `__op`/`__type` wire-format envelope builders
//! - `query`: query-string encoding for `/classes/...` endpoints
//!
//! It intentionally contains **no** MCP types; the tool surface lives in
//! `parsebridge-mcp`.

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod ops;
pub mod query;
