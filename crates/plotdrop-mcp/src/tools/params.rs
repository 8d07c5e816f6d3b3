//! Parameter structs for the render tools.

use plotdrop_core::{GraphInput, GraphLink, GraphNode, TableInput, TreeInput, TreeNode};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

// ── render_csv_as_table ──

/// Parameters for the `render_csv_as_table` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RenderTableParams {
    #[schemars(description = "The raw multiline csv content")]
    pub raw: String,

    #[serde(default)]
    #[schemars(description = "Whether the first row of csv is the header")]
    pub first_row_is_header: bool,
}

impl From<RenderTableParams> for TableInput {
    fn from(params: RenderTableParams) -> Self {
        TableInput {
            raw: params.raw,
            first_row_is_header: params.first_row_is_header,
        }
    }
}

// ── render_data_as_tree ──

/// A node in the tree structure.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TreeNodeParams {
    #[schemars(description = "The name of the node")]
    pub name: String,

    #[schemars(
        description = "The class of the node. Well known classes are: 'org', 'app', 'env_type', 'env', 'workload', 'resource', and 'other' but arbitrary strings can be used too"
    )]
    pub class: String,

    #[serde(default)]
    #[schemars(description = "Arbitrary additional metadata to include on the node visualisation")]
    pub data: Map<String, Value>,

    #[serde(default)]
    #[schemars(description = "Child nodes")]
    pub children: Vec<TreeNodeParams>,
}

impl From<TreeNodeParams> for TreeNode {
    fn from(params: TreeNodeParams) -> Self {
        TreeNode {
            name: params.name,
            class: params.class,
            data: params.data,
            children: params.children.into_iter().map(TreeNode::from).collect(),
        }
    }
}

/// Parameters for the `render_data_as_tree` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RenderTreeParams {
    #[schemars(description = "The root of the tree structure")]
    pub root: TreeNodeParams,
}

impl From<RenderTreeParams> for TreeInput {
    fn from(params: RenderTreeParams) -> Self {
        TreeInput {
            root: params.root.into(),
        }
    }
}

// ── render_network_as_graph ──

/// A node in the network graph.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GraphNodeParams {
    #[schemars(description = "Unique id of the node, referenced by links")]
    pub id: String,

    #[schemars(
        description = "The class of the node. Well known classes are: 'org', 'app', 'env_type', 'env', 'workload', 'resource', and 'other' but arbitrary strings can be used too"
    )]
    pub class: String,

    #[serde(default)]
    #[schemars(description = "Arbitrary additional metadata to include on the node visualisation")]
    pub data: Map<String, Value>,
}

/// A link in the network graph.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GraphLinkParams {
    #[schemars(description = "The source node id of the link")]
    pub source: String,

    #[schemars(description = "The target node id of the link")]
    pub target: String,

    #[serde(default)]
    #[schemars(
        description = "An optional short label for the link describing what the relationship is"
    )]
    pub explanation: Option<String>,
}

/// Parameters for the `render_network_as_graph` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RenderGraphParams {
    #[schemars(description = "The list of nodes in the network")]
    pub nodes: Vec<GraphNodeParams>,

    #[schemars(description = "The list of links between nodes in the network")]
    pub links: Vec<GraphLinkParams>,
}

impl From<RenderGraphParams> for GraphInput {
    fn from(params: RenderGraphParams) -> Self {
        GraphInput {
            nodes: params
                .nodes
                .into_iter()
                .map(|node| GraphNode {
                    id: node.id,
                    class: node.class,
                    data: node.data,
                })
                .collect(),
            links: params
                .links
                .into_iter()
                .map(|link| GraphLink {
                    source: link.source,
                    target: link.target,
                    explanation: link.explanation,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_header_flag_defaults_to_false() {
        let params: RenderTableParams = serde_json::from_str(r#"{"raw": "a,b\n1,2"}"#).unwrap();
        let input = TableInput::from(params);
        assert_eq!(input.raw, "a,b\n1,2");
        assert!(!input.first_row_is_header);
    }

    #[test]
    fn test_tree_params_convert_recursively() {
        let params: RenderTreeParams = serde_json::from_value(serde_json::json!({
            "root": {
                "name": "acme",
                "class": "org",
                "children": [
                    {"name": "billing", "class": "app", "data": {"owner": "team-a"},
                     "children": [{"name": "prod", "class": "env"}]}
                ]
            }
        }))
        .unwrap();

        let input = TreeInput::from(params);
        assert_eq!(input.root.name, "acme");
        let app = &input.root.children[0];
        assert_eq!(app.class, "app");
        assert_eq!(app.data["owner"], "team-a");
        assert_eq!(app.children[0].name, "prod");
        assert!(app.children[0].children.is_empty());
    }

    #[test]
    fn test_graph_params_require_class() {
        let result: Result<RenderGraphParams, _> = serde_json::from_value(serde_json::json!({
            "nodes": [{"id": "a"}],
            "links": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_graph_params_convert() {
        let params: RenderGraphParams = serde_json::from_value(serde_json::json!({
            "nodes": [{"id": "a", "class": "org"}, {"id": "b", "class": "app"}],
            "links": [{"source": "a", "target": "b", "explanation": "owns"}]
        }))
        .unwrap();

        let input = GraphInput::from(params);
        assert_eq!(input.nodes.len(), 2);
        assert_eq!(input.links[0].explanation.as_deref(), Some("owns"));
    }

    #[test]
    fn test_tree_schema_mentions_well_known_classes() {
        let schema = serde_json::to_string(&schemars::schema_for!(RenderTreeParams)).unwrap();
        assert!(schema.contains("env_type"));
        assert!(schema.contains("root"));
    }
}
