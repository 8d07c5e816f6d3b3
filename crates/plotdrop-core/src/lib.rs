//! # plotdrop-core
//!
//! Renders structured data (CSV tables, hierarchical trees, node/link graphs) into
//! self-contained HTML documents and publishes them to object storage, returning a
//! URL a browser can open.
//!
//! The pipeline for every render is single-pass:
//!
//! 1. A typed input ([`model::TableInput`], [`model::TreeInput`], [`model::GraphInput`])
//!    arrives at one of the [`render::RenderTools`] operations.
//! 2. Table input is pre-validated as CSV ([`validate`]).
//! 3. The matching template, resolved once by the [`templates::TemplateStore`], is
//!    executed by the [`templates::TemplateEngine`].
//! 4. The HTML buffer is handed to a [`storage::Publisher`], which names the object
//!    ([`naming`]), uploads it and returns a signed or public URL.
//!
//! Nothing is cached or deduplicated: every invocation produces a new object.

pub mod error;
pub mod model;
pub mod naming;
pub mod render;
pub mod storage;
pub mod templates;
pub mod validate;

pub use error::{PublishError, RenderError};
pub use model::{DocumentKind, GraphInput, GraphLink, GraphNode, TableInput, TreeInput, TreeNode};
pub use render::{RenderReceipt, RenderTools};
pub use storage::{PublishedObject, Publisher, StorageConfig};
pub use templates::{TemplateEngine, TemplateKind, TemplateStore};
