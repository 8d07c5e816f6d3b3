//! MCP tool parameter types and shared helpers.
//!
//! All parameter structs derive `Deserialize + JsonSchema` for MCP tool registration
//! and convert into the `plotdrop_core` input model.

pub mod helpers;
pub mod params;

pub use helpers::*;
pub use params::*;
