//! The three render operations: validate, execute template, publish.

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::error::{RenderError, RenderResult};
use crate::model::{DocumentKind, GraphInput, TableInput, TreeInput};
use crate::storage::{PublishedObject, Publisher};
use crate::templates::{TemplateEngine, TemplateStore};
use crate::validate::validate_csv;

/// Outcome of a successful render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderReceipt {
    pub kind: DocumentKind,
    pub object: PublishedObject,
}

impl RenderReceipt {
    /// Short human-readable line carrying the published URL.
    pub fn confirmation(&self) -> String {
        format!("{} rendered and uploaded: {}", self.kind.label(), self.object.url)
    }
}

/// Render tools bound to one template set and one storage backend.
///
/// Invocations share nothing mutable; each renders into its own buffer and the
/// publisher owns any per-call client.
#[derive(Debug, Clone)]
pub struct RenderTools {
    engine: Arc<TemplateEngine>,
    publisher: Arc<dyn Publisher>,
}

impl RenderTools {
    pub fn new(store: &TemplateStore, publisher: Arc<dyn Publisher>) -> RenderResult<Self> {
        Ok(Self {
            engine: Arc::new(TemplateEngine::new(store)?),
            publisher,
        })
    }

    /// Render CSV text as a sortable table.
    ///
    /// The CSV is checked before the template runs; malformed input never
    /// reaches the publisher.
    pub async fn render_table(
        &self,
        input: &TableInput,
        cancel: &CancellationToken,
    ) -> RenderResult<RenderReceipt> {
        let records = validate_csv(&input.raw)?;
        debug!(records, first_row_is_header = input.first_row_is_header, "CSV input accepted");
        self.render_and_publish(DocumentKind::Table, input, cancel).await
    }

    /// Render a hierarchy as a collapsible tree.
    pub async fn render_tree(
        &self,
        input: &TreeInput,
        cancel: &CancellationToken,
    ) -> RenderResult<RenderReceipt> {
        self.render_and_publish(DocumentKind::Tree, input, cancel).await
    }

    /// Render nodes and links as a force-directed graph.
    pub async fn render_graph(
        &self,
        input: &GraphInput,
        cancel: &CancellationToken,
    ) -> RenderResult<RenderReceipt> {
        debug!(nodes = input.nodes.len(), links = input.links.len(), "Rendering graph");
        self.render_and_publish(DocumentKind::Graph, input, cancel).await
    }

    async fn render_and_publish<T: Serialize>(
        &self,
        kind: DocumentKind,
        data: &T,
        cancel: &CancellationToken,
    ) -> RenderResult<RenderReceipt> {
        let document = self.engine.render(kind, data).inspect_err(|e| {
            error!(%kind, error = %e, "Template execution failed");
        })?;

        let object = self.publisher.publish(document, cancel).await?;
        Ok(RenderReceipt { kind, object })
    }
}
