//! MCP tool implementations
//!
//! Business logic behind the server's tools, kept free of protocol types.

pub mod analyze;
pub mod status;
