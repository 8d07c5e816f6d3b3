//! Document templates: compiled-in defaults with developer override files.
//!
//! Each document kind has a default template compiled into the binary. At startup
//! the [`TemplateStore`] looks for a well-known override file per template:
//!
//! - missing or unreadable: the compiled-in default is used
//! - non-empty: its content replaces the default for the life of the process
//! - empty: the default is written into it, so a developer can find and edit it,
//!   and the default is used for this run
//!
//! Resolution happens once; render calls never re-read the files.

mod engine;
mod filters;

pub use engine::TemplateEngine;

/// Alias kept for call sites that talk about templates rather than documents.
pub use crate::model::DocumentKind as TemplateKind;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::model::DocumentKind;

const TABLE_TEMPLATE: &str = include_str!("../../templates/table.html.tera");
const TREE_TEMPLATE: &str = include_str!("../../templates/tree.html.tera");
const GRAPH_TEMPLATE: &str = include_str!("../../templates/graph.html.tera");

impl DocumentKind {
    /// Name the template is registered under in the engine.
    ///
    /// The `.html` suffix turns on auto-escaping.
    pub fn template_name(self) -> &'static str {
        match self {
            Self::Table => "table.html",
            Self::Tree => "tree.html",
            Self::Graph => "graph.html",
        }
    }

    /// File name of the override template inside the override directory.
    pub fn override_file_name(self) -> &'static str {
        match self {
            Self::Table => "plotdrop-render-table-template.html.tera",
            Self::Tree => "plotdrop-render-tree-template.html.tera",
            Self::Graph => "plotdrop-render-graph-template.html.tera",
        }
    }

    /// The compiled-in template source.
    pub fn embedded_source(self) -> &'static str {
        match self {
            Self::Table => TABLE_TEMPLATE,
            Self::Tree => TREE_TEMPLATE,
            Self::Graph => GRAPH_TEMPLATE,
        }
    }
}

/// Where a resolved template came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    /// Compiled-in default, no override file involved.
    Embedded,
    /// Non-empty override file, used verbatim.
    Override(PathBuf),
    /// Empty override file that was populated with the compiled-in default.
    Seeded(PathBuf),
}

#[derive(Debug, Clone)]
struct ResolvedTemplate {
    source: String,
    origin: TemplateOrigin,
}

/// The three template sources, resolved once per process.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    table: ResolvedTemplate,
    tree: ResolvedTemplate,
    graph: ResolvedTemplate,
}

impl TemplateStore {
    /// Compiled-in defaults only; never touches the filesystem.
    pub fn embedded() -> Self {
        let embedded = |kind: DocumentKind| ResolvedTemplate {
            source: kind.embedded_source().to_string(),
            origin: TemplateOrigin::Embedded,
        };
        Self {
            table: embedded(DocumentKind::Table),
            tree: embedded(DocumentKind::Tree),
            graph: embedded(DocumentKind::Graph),
        }
    }

    /// Resolve overrides from the user's home directory.
    ///
    /// Falls back to [`TemplateStore::embedded`] when `HOME` is not set.
    pub fn load() -> Self {
        match home_dir() {
            Some(home) => Self::load_from(&home),
            None => {
                debug!("HOME not set, using embedded templates");
                Self::embedded()
            }
        }
    }

    /// Resolve overrides from an explicit directory.
    pub fn load_from(dir: &Path) -> Self {
        let resolve = |kind: DocumentKind| {
            resolve_template(&dir.join(kind.override_file_name()), kind.embedded_source())
        };
        Self {
            table: resolve(DocumentKind::Table),
            tree: resolve(DocumentKind::Tree),
            graph: resolve(DocumentKind::Graph),
        }
    }

    /// Template text for a document kind.
    pub fn source(&self, kind: DocumentKind) -> &str {
        &self.resolved(kind).source
    }

    /// How the template for a document kind was resolved.
    pub fn origin(&self, kind: DocumentKind) -> &TemplateOrigin {
        &self.resolved(kind).origin
    }

    fn resolved(&self, kind: DocumentKind) -> &ResolvedTemplate {
        match kind {
            DocumentKind::Table => &self.table,
            DocumentKind::Tree => &self.tree,
            DocumentKind::Graph => &self.graph,
        }
    }
}

fn resolve_template(path: &Path, default: &str) -> ResolvedTemplate {
    match std::fs::read_to_string(path) {
        Ok(content) if !content.is_empty() => {
            debug!(path = %path.display(), "Using override template");
            ResolvedTemplate {
                source: content,
                origin: TemplateOrigin::Override(path.to_path_buf()),
            }
        }
        Ok(_) => {
            if let Err(e) = std::fs::write(path, default) {
                warn!(path = %path.display(), error = %e, "Failed to seed empty override template");
            } else {
                debug!(path = %path.display(), "Seeded empty override template with default");
            }
            ResolvedTemplate {
                source: default.to_string(),
                origin: TemplateOrigin::Seeded(path.to_path_buf()),
            }
        }
        Err(_) => ResolvedTemplate {
            source: default.to_string(),
            origin: TemplateOrigin::Embedded,
        },
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}
