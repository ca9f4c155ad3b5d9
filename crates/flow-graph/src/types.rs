//! Core types for flow graphs
//!
//! These types define the canonical nodes and edges of the flow being
//! edited, and the partial updates the store merges into them.

use serde::{Deserialize, Serialize};

use crate::config::NodeConfig;
use crate::registry::NodeType;

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// Canvas position of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round to the nearest point of a `step_x` by `step_y` grid
    pub fn snapped(self, step_x: f64, step_y: f64) -> Self {
        let snap = |v: f64, step: f64| {
            if step > 0.0 {
                (v / step).round() * step
            } else {
                v
            }
        };
        Self {
            x: snap(self.x, step_x),
            y: snap(self.y, step_y),
        }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Run status of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Pending,
    Running,
    Completed,
    Error,
}

/// Payload carried by every node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    pub config: NodeConfig,
    /// Root folder of the node's files
    pub file_system_root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
}

/// A node instance in a flow
///
/// Deserialization goes through [`NodeRecord`] because the config shape
/// depends on the sibling `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "NodeRecord")]
pub struct FlowNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub position: Position,
    pub data: NodeData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl FlowNode {
    /// Create a node with the given data
    pub fn new(
        id: impl Into<String>,
        node_type: NodeType,
        position: impl Into<Position>,
        data: NodeData,
    ) -> Self {
        Self {
            id: id.into(),
            node_type,
            position: position.into(),
            data,
            width: None,
            height: None,
        }
    }
}

/// Wire shape of a node, with the config still untyped
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeRecord {
    id: NodeId,
    #[serde(rename = "type")]
    node_type: NodeType,
    #[serde(default)]
    position: Position,
    data: NodeDataRecord,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeDataRecord {
    #[serde(default)]
    label: String,
    #[serde(default)]
    config: serde_json::Value,
    #[serde(default)]
    file_system_root: String,
    #[serde(default)]
    status: Option<NodeStatus>,
}

impl From<NodeRecord> for FlowNode {
    fn from(record: NodeRecord) -> Self {
        let config = NodeConfig::decode(record.node_type, record.data.config);
        Self {
            id: record.id,
            node_type: record.node_type,
            position: record.position,
            data: NodeData {
                label: record.data.label,
                config,
                file_system_root: record.data.file_system_root,
                status: record.data.status,
            },
            width: record.width,
            height: record.height,
        }
    }
}

/// Optional label and condition of an edge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// A directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    /// Handle the edge leaves through (e.g. "true" / "false" on decisions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EdgeData>,
}

impl FlowEdge {
    /// Create an untyped edge between two nodes
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            edge_type: None,
            data: None,
        }
    }

    /// Set the edge's visual type
    pub fn with_type(mut self, edge_type: impl Into<String>) -> Self {
        self.edge_type = Some(edge_type.into());
        self
    }

    /// Set the source and target handles
    pub fn with_handles(
        mut self,
        source_handle: Option<String>,
        target_handle: Option<String>,
    ) -> Self {
        self.source_handle = source_handle;
        self.target_handle = target_handle;
        self
    }

    /// Set the edge label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.get_or_insert_with(EdgeData::default).label = Some(label.into());
        self
    }

    /// Whether this edge starts or ends at `node_id`
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Changes to the data payload of a node, merged field by field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeDataUpdate {
    pub label: Option<String>,
    pub config: Option<NodeConfig>,
    pub file_system_root: Option<String>,
    /// `Some(None)` clears the status
    pub status: Option<Option<NodeStatus>>,
}

impl From<NodeData> for NodeDataUpdate {
    fn from(data: NodeData) -> Self {
        Self {
            label: Some(data.label),
            config: Some(data.config),
            file_system_root: Some(data.file_system_root),
            status: Some(data.status),
        }
    }
}

/// A partial node, merged into an existing node by `GraphStore::update_node`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    pub position: Option<Position>,
    pub data: Option<NodeDataUpdate>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl NodeUpdate {
    /// Move a node
    pub fn position(position: impl Into<Position>) -> Self {
        Self {
            position: Some(position.into()),
            ..Self::default()
        }
    }

    /// Replace a node's data (a complete `NodeData` overwrites every field)
    pub fn data(data: impl Into<NodeDataUpdate>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::default()
        }
    }

    /// Resize a node
    pub fn dimensions(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub(crate) fn apply_to(self, node: &mut FlowNode) {
        if let Some(position) = self.position {
            node.position = position;
        }
        if let Some(width) = self.width {
            node.width = Some(width);
        }
        if let Some(height) = self.height {
            node.height = Some(height);
        }
        if let Some(data) = self.data {
            if let Some(label) = data.label {
                node.data.label = label;
            }
            if let Some(config) = data.config {
                node.data.config = config;
            }
            if let Some(root) = data.file_system_root {
                node.data.file_system_root = root;
            }
            if let Some(status) = data.status {
                node.data.status = status;
            }
        }
    }
}

/// A partial edge, merged into an existing edge by `GraphStore::update_edge`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeUpdate {
    pub source: Option<NodeId>,
    pub target: Option<NodeId>,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
    pub edge_type: Option<String>,
    pub data: Option<EdgeData>,
}

impl EdgeUpdate {
    pub(crate) fn apply_to(self, edge: &mut FlowEdge) {
        if let Some(source) = self.source {
            edge.source = source;
        }
        if let Some(target) = self.target {
            edge.target = target;
        }
        if let Some(handle) = self.source_handle {
            edge.source_handle = Some(handle);
        }
        if let Some(handle) = self.target_handle {
            edge.target_handle = Some(handle);
        }
        if let Some(edge_type) = self.edge_type {
            edge.edge_type = Some(edge_type);
        }
        if let Some(data) = self.data {
            edge.data = Some(data);
        }
    }
}

/// Complete node and edge collections of one flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaskConfig;
    use crate::registry::create_node_data;
    use serde_json::json;

    #[test]
    fn test_node_wire_shape() {
        let node = FlowNode::new(
            "node_1",
            NodeType::Task,
            (10.0, 20.0),
            create_node_data(NodeType::Task, "node_1"),
        );
        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(
            value,
            json!({
                "id": "node_1",
                "type": "task",
                "position": {"x": 10.0, "y": 20.0},
                "data": {
                    "label": "Task",
                    "config": {"timeout": 300, "retries": 3},
                    "fileSystemRoot": "/nodes/node_1/",
                    "status": "pending"
                }
            })
        );
    }

    #[test]
    fn test_node_deserializes_typed_config() {
        let node: FlowNode = serde_json::from_value(json!({
            "id": "node_4",
            "type": "task",
            "position": {"x": 0, "y": 0},
            "data": {
                "label": "Import",
                "config": {"timeout": 60, "retries": 1, "label": "Import"},
                "fileSystemRoot": "/nodes/node_4/"
            },
            "width": 160.0
        }))
        .unwrap();

        match &node.data.config {
            NodeConfig::Task(TaskConfig { timeout, retries, extra }) => {
                assert_eq!(*timeout, 60);
                assert_eq!(*retries, 1);
                assert_eq!(extra.get("label"), Some(&json!("Import")));
            }
            other => panic!("Expected task config, got {:?}", other),
        }
        assert_eq!(node.data.status, None);
        assert_eq!(node.width, Some(160.0));
    }

    #[test]
    fn test_node_with_mismatched_config_still_loads() {
        let cases = [
            ("api", json!({"method": "FETCH"})),
            ("task", json!({"timeout": 1.5})),
            ("decision", json!({"conditions": ["x > 1"]})),
        ];

        for (node_type, config) in cases {
            let value = json!({
                "id": "node_1",
                "type": node_type,
                "position": {"x": 0.0, "y": 0.0},
                "data": {"label": "Odd", "config": config.clone(), "fileSystemRoot": ""}
            });
            let node: FlowNode = serde_json::from_value(value.clone()).unwrap();
            assert_eq!(node.data.config, NodeConfig::Untyped(config));
            assert_eq!(serde_json::to_value(&node).unwrap(), value);
        }
    }

    #[test]
    fn test_edge_wire_shape() {
        let edge = FlowEdge::new("edge_1", "a", "b")
            .with_type("custom")
            .with_label("yes");
        let value = serde_json::to_value(&edge).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "edge_1",
                "source": "a",
                "target": "b",
                "type": "custom",
                "data": {"label": "yes"}
            })
        );

        let back: FlowEdge = serde_json::from_value(value).unwrap();
        assert_eq!(back, edge);
    }

    #[test]
    fn test_node_update_merges_data_fields() {
        let mut node = FlowNode::new(
            "node_1",
            NodeType::Task,
            (0.0, 0.0),
            create_node_data(NodeType::Task, "node_1"),
        );
        NodeUpdate {
            data: Some(NodeDataUpdate {
                label: Some("Renamed".to_string()),
                ..NodeDataUpdate::default()
            }),
            ..NodeUpdate::default()
        }
        .apply_to(&mut node);

        assert_eq!(node.data.label, "Renamed");
        assert_eq!(node.data.file_system_root, "/nodes/node_1/");
        assert_eq!(node.data.config, NodeConfig::for_type(NodeType::Task));
    }

    #[test]
    fn test_complete_data_replaces_status() {
        let mut node = FlowNode::new(
            "node_1",
            NodeType::Task,
            (0.0, 0.0),
            create_node_data(NodeType::Task, "node_1"),
        );
        assert_eq!(node.data.status, Some(NodeStatus::Pending));

        let mut data = node.data.clone();
        data.status = None;
        NodeUpdate::data(data).apply_to(&mut node);
        assert_eq!(node.data.status, None);

        NodeUpdate::data(NodeDataUpdate {
            label: Some("Kept".to_string()),
            ..NodeDataUpdate::default()
        })
        .apply_to(&mut node);
        assert_eq!(node.data.status, None);
        assert_eq!(node.data.label, "Kept");
    }

    #[test]
    fn test_snap_to_grid() {
        let p = Position::new(22.0, 37.0).snapped(15.0, 15.0);
        assert_eq!(p, Position::new(15.0, 30.0));

        let unchanged = Position::new(22.0, 37.0).snapped(0.0, 0.0);
        assert_eq!(unchanged, Position::new(22.0, 37.0));
    }
}
