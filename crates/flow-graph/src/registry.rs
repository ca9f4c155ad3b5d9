//! Node type registry
//!
//! Maps each node type tag to its default label and config, the renderer
//! that draws it, and its connection handles. Used when nodes are created
//! from the palette and when edges are checked against node shapes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::NodeConfig;
use crate::error::GraphError;
use crate::types::{NodeData, NodeStatus};

/// The closed set of node types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Start,
    End,
    Task,
    Decision,
    Condition,
    Parallel,
    Merge,
    Api,
    Transform,
    Notification,
}

/// The visual component responsible for drawing a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRenderer {
    Start,
    End,
    Task,
    Decision,
    Api,
}

/// Outgoing connection handles of a node type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceHandles {
    /// No outgoing connections
    None,
    /// One unnamed handle
    Single,
    /// Named handles, one per branch
    Named(&'static [&'static str]),
}

impl SourceHandles {
    /// Whether an edge may leave through `handle`
    ///
    /// Edges persisted without handle information are accepted on any node
    /// that has outputs at all.
    pub fn accepts(&self, handle: Option<&str>) -> bool {
        match (self, handle) {
            (SourceHandles::None, _) => false,
            (SourceHandles::Single, None) => true,
            (SourceHandles::Single, Some(_)) => false,
            (SourceHandles::Named(_), None) => true,
            (SourceHandles::Named(names), Some(h)) => names.contains(&h),
        }
    }
}

impl NodeType {
    /// Every node type
    pub const ALL: [NodeType; 10] = [
        NodeType::Start,
        NodeType::End,
        NodeType::Task,
        NodeType::Decision,
        NodeType::Condition,
        NodeType::Parallel,
        NodeType::Merge,
        NodeType::Api,
        NodeType::Transform,
        NodeType::Notification,
    ];

    /// Node types offered in the editor's "add node" menu
    pub const PALETTE: [NodeType; 5] = [
        NodeType::Start,
        NodeType::End,
        NodeType::Task,
        NodeType::Decision,
        NodeType::Api,
    ];

    /// The wire tag of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Start => "start",
            NodeType::End => "end",
            NodeType::Task => "task",
            NodeType::Decision => "decision",
            NodeType::Condition => "condition",
            NodeType::Parallel => "parallel",
            NodeType::Merge => "merge",
            NodeType::Api => "api",
            NodeType::Transform => "transform",
            NodeType::Notification => "notification",
        }
    }

    /// Label given to freshly created nodes of this type
    pub fn default_label(&self) -> String {
        match self {
            NodeType::Start => "Start".to_string(),
            NodeType::End => "End".to_string(),
            NodeType::Task => "Task".to_string(),
            NodeType::Decision => "Decision".to_string(),
            NodeType::Api => "API Call".to_string(),
            other => {
                let tag = other.as_str();
                let mut chars = tag.chars();
                match chars.next() {
                    Some(first) => format!("{}{} Node", first.to_uppercase(), chars.as_str()),
                    None => "Node".to_string(),
                }
            }
        }
    }

    /// Config given to freshly created nodes of this type
    pub fn default_config(&self) -> NodeConfig {
        NodeConfig::for_type(*self)
    }

    /// Renderer for this type; the types without their own look use the task renderer
    pub fn renderer(&self) -> NodeRenderer {
        match self {
            NodeType::Start => NodeRenderer::Start,
            NodeType::End => NodeRenderer::End,
            NodeType::Decision => NodeRenderer::Decision,
            NodeType::Api => NodeRenderer::Api,
            NodeType::Task
            | NodeType::Condition
            | NodeType::Parallel
            | NodeType::Merge
            | NodeType::Transform
            | NodeType::Notification => NodeRenderer::Task,
        }
    }

    /// Whether edges may enter this node
    pub fn accepts_input(&self) -> bool {
        self.renderer() != NodeRenderer::Start
    }

    /// Outgoing handles of this node
    pub fn source_handles(&self) -> SourceHandles {
        match self.renderer() {
            NodeRenderer::End => SourceHandles::None,
            NodeRenderer::Decision => SourceHandles::Named(&["true", "false"]),
            NodeRenderer::Start | NodeRenderer::Task | NodeRenderer::Api => SourceHandles::Single,
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| GraphError::UnknownNodeType(s.to_string()))
    }
}

/// Build the default data payload for a new node
///
/// The file system root is derived from the node's own id.
pub fn create_node_data(node_type: NodeType, node_id: &str) -> NodeData {
    NodeData {
        label: node_type.default_label(),
        config: node_type.default_config(),
        file_system_root: format!("/nodes/{}/", node_id),
        status: Some(NodeStatus::Pending),
    }
}
