//! plotdrop MCP server library.
//!
//! Provides the [`server::PlotdropMcpServer`] handler and the tool parameter types.
//! Used by the `plotdrop-mcp` binary and available for integration testing.

pub mod server;
pub mod tools;
