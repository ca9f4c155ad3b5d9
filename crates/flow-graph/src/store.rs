//! Graph store
//!
//! The single owner of the nodes and edges of the flow currently open in
//! the editor. Every mutation is total: an id that matches nothing makes
//! the call a no-op, logged at debug level, never an error.
//!
//! Deleting a node removes the node, every edge touching it and its entry
//! in the selection list within the same `&mut self` call, so no caller can
//! observe a dangling edge.

use crate::ids::IdAllocator;
use crate::registry::{create_node_data, NodeType};
use crate::types::{
    EdgeId, EdgeUpdate, FlowEdge, FlowNode, GraphSnapshot, NodeId, NodeUpdate, Position,
};

/// Canonical node/edge state of one open flow
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
    selected_nodes: Vec<NodeId>,
    is_loading: bool,
    ids: IdAllocator,
}

impl GraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn selected_nodes(&self) -> &[NodeId] {
        &self.selected_nodes
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find an edge by ID
    pub fn find_edge(&self, id: &str) -> Option<&FlowEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Get edges coming into a node
    pub fn incoming_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a FlowEdge> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Get edges going out of a node
    pub fn outgoing_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a FlowEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }

    /// Replace every node; used when a flow is loaded
    ///
    /// Cross references are not checked. The id counter is moved past any
    /// loaded `node_<n>` id.
    pub fn set_nodes(&mut self, nodes: Vec<FlowNode>) {
        for node in &nodes {
            self.ids.observe_node_id(&node.id);
        }
        self.nodes = nodes;
    }

    /// Replace every edge; used when a flow is loaded
    pub fn set_edges(&mut self, edges: Vec<FlowEdge>) {
        self.edges = edges;
    }

    /// Append a fully formed node
    pub fn add_node(&mut self, node: FlowNode) {
        self.ids.observe_node_id(&node.id);
        self.nodes.push(node);
    }

    /// Merge `update` into the node with the given id
    ///
    /// Returns whether a node matched.
    pub fn update_node(&mut self, id: &str, update: NodeUpdate) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                update.apply_to(node);
                true
            }
            None => {
                log::debug!("update_node: no node '{}'", id);
                false
            }
        }
    }

    /// Remove a node together with every edge touching it
    ///
    /// Returns whether a node matched.
    pub fn delete_node(&mut self, id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        let removed = self.nodes.len() != before;

        // Cascade regardless, so edges loaded without their node go too.
        self.edges.retain(|e| !e.touches(id));
        self.selected_nodes.retain(|n| n != id);

        if !removed {
            log::debug!("delete_node: no node '{}'", id);
        }
        removed
    }

    /// Append an edge
    ///
    /// Endpoints are not checked: edges come from connection events between
    /// nodes that exist at that moment, or from trusted loads.
    pub fn add_edge(&mut self, edge: FlowEdge) {
        self.edges.push(edge);
    }

    /// Merge `update` into the edge with the given id
    pub fn update_edge(&mut self, id: &str, update: EdgeUpdate) -> bool {
        match self.edges.iter_mut().find(|e| e.id == id) {
            Some(edge) => {
                update.apply_to(edge);
                true
            }
            None => {
                log::debug!("update_edge: no edge '{}'", id);
                false
            }
        }
    }

    /// Remove an edge by id
    pub fn delete_edge(&mut self, id: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        let removed = self.edges.len() != before;
        if !removed {
            log::debug!("delete_edge: no edge '{}'", id);
        }
        removed
    }

    /// Replace the multi-selection list
    pub fn set_selected_nodes(&mut self, node_ids: Vec<NodeId>) {
        self.selected_nodes = node_ids;
    }

    /// Build a new node with a fresh id and the type's default data
    ///
    /// The node is not inserted; pass it to [`GraphStore::add_node`].
    pub fn create_new_node(
        &mut self,
        node_type: NodeType,
        position: impl Into<Position>,
    ) -> FlowNode {
        let id = self.ids.next_node_id();
        let data = create_node_data(node_type, &id);
        FlowNode::new(id, node_type, position, data)
    }

    /// A fresh, collision-proof edge id
    pub fn allocate_edge_id(&self) -> EdgeId {
        self.ids.next_edge_id()
    }

    /// Empty the flow and reset id allocation
    pub fn clear_flow(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.selected_nodes.clear();
        self.ids.reset();
    }

    /// Copy of the current nodes and edges
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Replace nodes and edges with a snapshot
    ///
    /// Selection entries for nodes missing from the snapshot are dropped.
    pub fn restore(&mut self, snapshot: GraphSnapshot) {
        self.set_nodes(snapshot.nodes);
        self.set_edges(snapshot.edges);
        let nodes = &self.nodes;
        self.selected_nodes.retain(|id| nodes.iter().any(|n| &n.id == id));
    }
}
