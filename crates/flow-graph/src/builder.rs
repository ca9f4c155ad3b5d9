//! Fluent builder for flow graphs
//!
//! Provides a fluent API for constructing node/edge collections
//! programmatically, e.g. seed flows and fixtures.

use crate::config::NodeConfig;
use crate::registry::{create_node_data, NodeType};
use crate::types::{FlowEdge, FlowNode, GraphSnapshot, Position};

/// Fluent builder for a flow's nodes and edges
///
/// # Example
///
/// ```
/// use flow_graph::{GraphBuilder, NodeType};
///
/// let graph = GraphBuilder::new()
///     .add_node("start", NodeType::Start, (0.0, 0.0))
///     .add_node("fetch", NodeType::Api, (200.0, 0.0))
///     .with_label("Fetch orders")
///     .add_edge("start", "fetch")
///     .build();
///
/// assert_eq!(graph.nodes.len(), 2);
/// assert_eq!(graph.edges[0].id, "edge-1");
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
    edge_counter: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with its type's default data
    pub fn add_node(
        mut self,
        id: impl Into<String>,
        node_type: NodeType,
        position: impl Into<Position>,
    ) -> Self {
        let id = id.into();
        let data = create_node_data(node_type, &id);
        self.nodes.push(FlowNode::new(id, node_type, position, data));
        self
    }

    /// Set the label of the most recently added node
    ///
    /// Must be called immediately after `add_node`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.data.label = label.into();
        }
        self
    }

    /// Set the config of the most recently added node
    pub fn with_config(mut self, config: NodeConfig) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.data.config = config;
        }
        self
    }

    /// Add an edge between two nodes (auto-generates edge ID)
    pub fn add_edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edge_counter += 1;
        let id = format!("edge-{}", self.edge_counter);
        self.edges.push(FlowEdge::new(id, source, target));
        self
    }

    /// Add an edge with an explicit ID
    pub fn add_edge_with_id(
        mut self,
        edge_id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.edges.push(FlowEdge::new(edge_id, source, target));
        self
    }

    /// Add a prebuilt edge
    pub fn edge(mut self, edge: FlowEdge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Build the graph without validation
    pub fn build(self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}
