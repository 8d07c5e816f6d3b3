//! Input shapes accepted by the render tools.
//!
//! These are the data contexts handed to the templates: each struct serializes to
//! exactly the object the corresponding template reads.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which of the three documents is being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Table,
    Tree,
    Graph,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Table,
        DocumentKind::Tree,
        DocumentKind::Graph,
    ];

    /// Capitalized label used in confirmation messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Table => "Table",
            Self::Tree => "Tree",
            Self::Graph => "Graph",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Tree => write!(f, "tree"),
            Self::Graph => write!(f, "graph"),
        }
    }
}

/// Raw CSV text to render as an HTML table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInput {
    /// The raw multiline CSV content.
    pub raw: String,
    /// Whether the first record holds column names.
    #[serde(default)]
    pub first_row_is_header: bool,
}

/// A hierarchy to render as a collapsible tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeInput {
    pub root: TreeNode,
}

/// One node of a tree.
///
/// The input is tree-shaped by construction; no cycle detection is performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    /// Free-form category label (`org`, `app`, `env`, ... are conventional, not enforced).
    pub class: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            data: Map::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }
}

/// A network to render as a force-directed graph.
///
/// Links that reference unknown node ids are passed through untouched; the page's
/// script is responsible for dropping them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub class: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class: class.into(),
            data: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    /// Short label describing the relationship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl GraphLink {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            explanation: None,
        }
    }
}
