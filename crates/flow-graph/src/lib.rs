//! Flow Graph - canonical node/edge model for the flow editor
//!
//! This crate holds the in-memory model of the flow currently being edited:
//!
//! - `GraphStore`: sole owner of the nodes and edges, with total mutations
//!   and cascade delete
//! - `NodeType` registry: default labels, typed default configs, renderers
//!   and connection handles per node type
//! - `NodeConfig`: one typed config struct per node type, stored as an open
//!   JSON map on the wire
//! - `validate_graph`: structural checks before a flow is handed back for
//!   storage
//!
//! # Example
//!
//! ```
//! use flow_graph::{FlowEdge, GraphStore, NodeType};
//!
//! let mut store = GraphStore::new();
//! let start = store.create_new_node(NodeType::Start, (0.0, 0.0));
//! let task = store.create_new_node(NodeType::Task, (200.0, 0.0));
//! let (start_id, task_id) = (start.id.clone(), task.id.clone());
//! store.add_node(start);
//! store.add_node(task);
//!
//! let edge_id = store.allocate_edge_id();
//! store.add_edge(FlowEdge::new(edge_id, &start_id, &task_id));
//!
//! store.delete_node(&task_id);
//! assert!(store.edges().is_empty());
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod flow;
pub mod ids;
pub mod registry;
pub mod store;
pub mod types;
pub mod validation;

// Re-export key types
pub use builder::GraphBuilder;
pub use config::{
    ApiConfig, DecisionCondition, DecisionConfig, EndConfig, GenericConfig, HttpMethod,
    NodeConfig, StartConfig, TaskConfig,
};
pub use error::{GraphError, Result};
pub use flow::{Flow, FlowMetadata, FlowStatus};
pub use registry::{create_node_data, NodeRenderer, NodeType, SourceHandles};
pub use store::GraphStore;
pub use types::{
    EdgeData, EdgeId, EdgeUpdate, FlowEdge, FlowNode, GraphSnapshot, NodeData, NodeDataUpdate,
    NodeId, NodeStatus, NodeUpdate, Position,
};
pub use validation::{validate_graph, ValidationError};
