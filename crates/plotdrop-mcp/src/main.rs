//! plotdrop MCP Server
//!
//! Model Context Protocol server that renders tables, trees and network graphs
//! to standalone HTML, publishes them to object storage and hands LLM agents a
//! URL to share with the user.

use std::path::PathBuf;

use clap::Parser;
use plotdrop_core::storage::BackendChoice;
use plotdrop_core::{StorageConfig, TemplateStore};
use plotdrop_mcp::server::PlotdropMcpServer;
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

/// MCP server publishing rendered HTML visualizations
#[derive(Parser, Debug)]
#[command(name = "plotdrop-mcp", version)]
#[command(about = "MCP server rendering tables, trees and graphs to shareable HTML")]
struct Args {
    /// Storage backend: auto, signed-url or static-endpoint
    ///
    /// `auto` picks the static endpoint when any MINIO_* variable is set.
    #[arg(long, default_value_t = BackendChoice::Auto)]
    backend: BackendChoice,

    /// Directory holding override templates (defaults to the home directory)
    #[arg(long)]
    template_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("plotdrop_mcp=info".parse()?)
                .add_directive("plotdrop_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let storage = StorageConfig::from_env(args.backend)?;
    let templates = match &args.template_dir {
        Some(dir) => TemplateStore::load_from(dir),
        None => TemplateStore::load(),
    };

    let server = PlotdropMcpServer::new(&templates, storage)?;
    tracing::info!(backend = server.backend(), "plotdrop-mcp starting (stdio transport)");

    let transport = rmcp::transport::io::stdio();
    let service = server.serve(transport).await?;
    service.waiting().await?;

    Ok(())
}
