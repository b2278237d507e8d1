//! MCP server exposing Parse Server REST operations as tools.
//!
//! The binary speaks MCP over stdio; every tool validates its input shape,
//! issues one (in two cases, two) requests through `parsebridge-rest`, and
//! returns the upstream JSON as pretty-printed text content.

pub mod error;
pub mod registry;
pub mod semantics;
pub mod server;
pub mod tools;
