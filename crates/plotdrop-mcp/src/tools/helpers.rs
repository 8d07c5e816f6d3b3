//! Shared helper functions for MCP tool implementations.

use plotdrop_core::RenderError;

/// Build a structured error JSON string that LLMs can parse.
pub fn error_json(error_code: &str, message: &str) -> String {
    serde_json::json!({
        "error": error_code,
        "message": message,
        "valid": false
    })
    .to_string()
}

/// Error JSON for a failed render, keyed by the failure stage.
pub fn render_error_json(err: &RenderError) -> String {
    error_json(err.code(), &err.to_string())
}
