//! Flow definitions as exchanged with the persistence collaborator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{FlowEdge, FlowNode, GraphSnapshot};

/// Publication state of a flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// Descriptive metadata of a flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowMetadata {
    pub tags: Vec<String>,
    pub category: String,
    pub author: String,
    pub last_modified_by: String,
}

/// A named, versioned workflow definition inside a workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
    #[serde(default)]
    pub status: FlowStatus,
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
    #[serde(default)]
    pub metadata: FlowMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flow {
    /// Create an empty draft flow
    pub fn new(
        id: impl Into<String>,
        workspace_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            workspace_id: workspace_id.into(),
            name: name.into(),
            description: None,
            version: "1.0.0".to_string(),
            status: FlowStatus::Draft,
            nodes: Vec::new(),
            edges: Vec::new(),
            metadata: FlowMetadata::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Take nodes and edges from a snapshot
    pub fn with_graph(mut self, graph: GraphSnapshot) -> Self {
        self.nodes = graph.nodes;
        self.edges = graph.edges;
        self
    }

    /// The flow's nodes and edges
    pub fn graph(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Replace nodes and edges with an edited graph and bump `updated_at`
    pub fn replace_graph(&mut self, graph: GraphSnapshot) {
        self.nodes = graph.nodes;
        self.edges = graph.edges;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::registry::NodeType;
    use serde_json::json;

    #[test]
    fn test_flow_round_trip() {
        let flow = Flow::new("flow_1", "ws_1", "Order intake").with_graph(
            GraphBuilder::new()
                .add_node("node_1", NodeType::Start, (0.0, 0.0))
                .add_node("node_2", NodeType::Notification, (150.0, 0.0))
                .add_edge("node_1", "node_2")
                .build(),
        );

        let json = serde_json::to_string(&flow).unwrap();
        assert!(json.contains("\"workspaceId\":\"ws_1\""));
        assert!(json.contains("\"status\":\"draft\""));

        let back: Flow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flow);
    }

    #[test]
    fn test_loads_persisted_flow() {
        let flow: Flow = serde_json::from_value(json!({
            "id": "flow_9",
            "workspaceId": "ws_2",
            "name": "QA run",
            "version": "2.1.0",
            "status": "published",
            "nodes": [{
                "id": "node_1",
                "type": "decision",
                "position": {"x": 10, "y": 10},
                "data": {
                    "label": "Passed?",
                    "config": {"conditions": []},
                    "fileSystemRoot": "/nodes/node_1/"
                }
            }],
            "edges": [],
            "metadata": {
                "tags": ["qa"],
                "category": "testing",
                "author": "user_1",
                "lastModifiedBy": "user_1"
            },
            "createdAt": "2024-01-03T00:00:00Z",
            "updatedAt": "2024-01-10T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(flow.status, FlowStatus::Published);
        assert_eq!(flow.metadata.tags, vec!["qa"]);
        assert_eq!(flow.graph().nodes[0].node_type, NodeType::Decision);
    }

    #[test]
    fn test_replace_graph_touches_updated_at() {
        let mut flow = Flow::new("flow_1", "ws_1", "Empty");
        let before = flow.updated_at;
        flow.replace_graph(GraphBuilder::new().add_node("n", NodeType::Task, (0.0, 0.0)).build());

        assert_eq!(flow.nodes.len(), 1);
        assert!(flow.updated_at >= before);
    }
}
