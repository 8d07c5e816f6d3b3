//! MCP protocol integration test.
//!
//! Verifies that the server correctly handles the MCP protocol round-trip:
//! tool discovery via `list_tools` and tool invocation via `call_tool`, with a
//! recording publisher standing in for object storage.

use std::sync::Arc;

use plotdrop_core::storage::testing::{RecordingPublisher, RECORDED_URL};
use plotdrop_core::TemplateStore;
use plotdrop_mcp::server::PlotdropMcpServer;
use rmcp::model::{CallToolRequestParams, CallToolResult, ClientInfo};
use rmcp::service::RunningService;
use rmcp::{ClientHandler, RoleClient, ServiceExt};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default)]
struct DummyClient;

impl ClientHandler for DummyClient {
    fn get_info(&self) -> ClientInfo {
        ClientInfo::default()
    }
}

type Harness = (
    RunningService<RoleClient, DummyClient>,
    JoinHandle<anyhow::Result<()>>,
    Arc<RecordingPublisher>,
);

async fn start() -> anyhow::Result<Harness> {
    let (server_transport, client_transport) = tokio::io::duplex(64 * 1024);

    let publisher = Arc::new(RecordingPublisher::new());
    let server = PlotdropMcpServer::with_publisher(
        &TemplateStore::embedded(),
        publisher.clone(),
        "recording",
    )?;
    let server_handle = tokio::spawn(async move {
        let service = server.serve(server_transport).await?;
        service.waiting().await?;
        anyhow::Ok(())
    });

    let client = DummyClient.serve(client_transport).await?;
    Ok((client, server_handle, publisher))
}

fn request(name: &'static str, arguments: serde_json::Value) -> CallToolRequestParams {
    CallToolRequestParams {
        meta: None,
        name: name.into(),
        arguments: arguments.as_object().cloned(),
        task: None,
    }
}

fn text_of(result: &CallToolResult) -> &str {
    result
        .content
        .first()
        .and_then(|c| c.raw.as_text())
        .map(|t| t.text.as_str())
        .expect("Expected text content")
}

#[tokio::test]
async fn test_mcp_protocol_list_tools() -> anyhow::Result<()> {
    let (client, server_handle, _) = start().await?;

    let tools = client.list_tools(None).await?;
    let mut tool_names: Vec<&str> = tools.tools.iter().map(|t| t.name.as_ref()).collect();
    tool_names.sort_unstable();
    assert_eq!(
        tool_names,
        vec!["render_csv_as_table", "render_data_as_tree", "render_network_as_graph"]
    );

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_mcp_protocol_render_table() -> anyhow::Result<()> {
    let (client, server_handle, publisher) = start().await?;

    let result = client
        .call_tool(request(
            "render_csv_as_table",
            serde_json::json!({ "raw": "id,name\n1,alice", "first_row_is_header": true }),
        ))
        .await?;

    assert_eq!(
        text_of(&result),
        format!("Table rendered and uploaded: {RECORDED_URL}")
    );
    let html = publisher.last_document().expect("document was published");
    assert!(html.contains(r#"const RAW = "id,name\n1,alice";"#));

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_mcp_protocol_render_graph() -> anyhow::Result<()> {
    let (client, server_handle, publisher) = start().await?;

    let result = client
        .call_tool(request(
            "render_network_as_graph",
            serde_json::json!({
                "nodes": [{"id": "a", "class": "org"}, {"id": "b", "class": "app"}],
                "links": [{"source": "a", "target": "b"}]
            }),
        ))
        .await?;

    assert!(text_of(&result).starts_with("Graph rendered and uploaded: "));
    let html = publisher.last_document().expect("document was published");
    assert!(html.contains(r#""id":"a""#));
    assert!(html.contains(r#""id":"b""#));

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_mcp_protocol_invalid_csv_returns_error_json() -> anyhow::Result<()> {
    let (client, server_handle, publisher) = start().await?;

    let result = client
        .call_tool(request(
            "render_csv_as_table",
            serde_json::json!({ "raw": "a,\"b\n1,2" }),
        ))
        .await?;

    let parsed: serde_json::Value = serde_json::from_str(text_of(&result))?;
    assert_eq!(parsed["error"], "invalid_csv");
    assert_eq!(parsed["valid"], false);
    assert_eq!(publisher.calls(), 0);

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}
