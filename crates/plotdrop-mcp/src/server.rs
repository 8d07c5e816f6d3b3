//! MCP ServerHandler implementation for plotdrop.
//!
//! Exposes three render tools, each turning structured data into a standalone
//! HTML document, publishing it and answering with a browser URL:
//!
//! - `render_csv_as_table`: sortable, filterable table from raw CSV
//! - `render_data_as_tree`: collapsible tree from a nested node hierarchy
//! - `render_network_as_graph`: force-directed graph from nodes and links
//!
//! Successful calls return a one-line confirmation carrying the URL. Failures
//! return structured error JSON whose `error` field names the failing stage.

use std::sync::Arc;

use plotdrop_core::storage::build_publisher;
use plotdrop_core::{
    Publisher, RenderError, RenderReceipt, RenderTools, StorageConfig, TemplateStore,
};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::service::RequestContext;
use rmcp::{tool, tool_handler, tool_router, RoleServer, ServerHandler};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::tools::*;

/// plotdrop MCP server handler.
#[derive(Debug, Clone)]
pub struct PlotdropMcpServer {
    tool_router: ToolRouter<Self>,
    tools: RenderTools,
    backend: &'static str,
}

impl PlotdropMcpServer {
    /// Create a server publishing through the configured backend.
    pub fn new(templates: &TemplateStore, storage: StorageConfig) -> Result<Self, RenderError> {
        let backend = storage.backend_name();
        Self::with_publisher(templates, build_publisher(storage), backend)
    }

    /// Create a server around an already-built publisher.
    pub fn with_publisher(
        templates: &TemplateStore,
        publisher: Arc<dyn Publisher>,
        backend: &'static str,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            tool_router: Self::tool_router(),
            tools: RenderTools::new(templates, publisher)?,
            backend,
        })
    }

    /// Name of the active storage backend.
    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Render a table, honoring `cancel` during the upload.
    pub async fn render_table(
        &self,
        params: RenderTableParams,
        cancel: &CancellationToken,
    ) -> String {
        let input = params.into();
        let result = self.tools.render_table(&input, cancel).await;
        respond("render_csv_as_table", result)
    }

    /// Render a tree, honoring `cancel` during the upload.
    pub async fn render_tree(
        &self,
        params: RenderTreeParams,
        cancel: &CancellationToken,
    ) -> String {
        let input = params.into();
        let result = self.tools.render_tree(&input, cancel).await;
        respond("render_data_as_tree", result)
    }

    /// Render a graph, honoring `cancel` during the upload.
    pub async fn render_graph(
        &self,
        params: RenderGraphParams,
        cancel: &CancellationToken,
    ) -> String {
        let input = params.into();
        let result = self.tools.render_graph(&input, cancel).await;
        respond("render_network_as_graph", result)
    }
}

fn respond(tool: &str, result: Result<RenderReceipt, RenderError>) -> String {
    match result {
        Ok(receipt) => {
            info!(
                tool,
                object = %receipt.object.key,
                url = %receipt.object.url,
                "Render published"
            );
            receipt.confirmation()
        }
        Err(e) => {
            warn!(tool, code = e.code(), error = %e, "Render failed");
            render_error_json(&e)
        }
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for PlotdropMcpServer {
    fn get_info(&self) -> ServerInfo {
        let instructions = format!(
            "plotdrop renders structured data into standalone HTML visualizations and \
             publishes them, returning a URL the user can open in a browser.\n\
             render_csv_as_table: raw CSV text, optionally with a header row.\n\
             render_data_as_tree: a nested hierarchy of named, classed nodes.\n\
             render_network_as_graph: nodes plus source/target links, optionally labelled.\n\
             Every call publishes a new document. Storage backend: {}.",
            self.backend
        );

        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "plotdrop-mcp".to_string(),
                title: Some("plotdrop MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some(
                    "MCP server rendering tables, trees and network graphs to shareable HTML"
                        .to_string(),
                ),
                icons: None,
                website_url: None,
            },
            instructions: Some(instructions),
        }
    }
}

#[tool_router(router = tool_router)]
impl PlotdropMcpServer {
    #[tool(
        name = "render_csv_as_table",
        description = "Render CSV data as an interactive HTML table and upload it, returning a link the user can open in a browser. The CSV must be well-formed: consistent field counts and balanced quotes."
    )]
    pub async fn render_csv_as_table(
        &self,
        Parameters(params): Parameters<RenderTableParams>,
        ctx: RequestContext<RoleServer>,
    ) -> String {
        self.render_table(params, &ctx.ct).await
    }

    #[tool(
        name = "render_data_as_tree",
        description = "Render hierarchical data (like an org, app and environment structure) as a collapsible HTML tree and upload it, returning a link the user can open in a browser."
    )]
    pub async fn render_data_as_tree(
        &self,
        Parameters(params): Parameters<RenderTreeParams>,
        ctx: RequestContext<RoleServer>,
    ) -> String {
        self.render_tree(params, &ctx.ct).await
    }

    #[tool(
        name = "render_network_as_graph",
        description = "Render an interconnected network as a force-directed HTML graph and upload it, returning a link the user can open in a browser. Links referencing unknown node ids are ignored."
    )]
    pub async fn render_network_as_graph(
        &self,
        Parameters(params): Parameters<RenderGraphParams>,
        ctx: RequestContext<RoleServer>,
    ) -> String {
        self.render_graph(params, &ctx.ct).await
    }
}
