//! Id allocation for nodes and edges
//!
//! Node ids come from a per-store counter (`node_1`, `node_2`, ...), unique
//! only for the lifetime of one loaded flow. Edge ids carry a random v4 UUID
//! so edges created in quick succession can never collide.

use uuid::Uuid;

use crate::types::{EdgeId, NodeId};

const NODE_PREFIX: &str = "node_";
const EDGE_PREFIX: &str = "edge_";

/// Session-scoped id allocator
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next_node: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next_node: 1 }
    }

    /// Allocate the next node id
    pub fn next_node_id(&mut self) -> NodeId {
        let id = format!("{}{}", NODE_PREFIX, self.next_node);
        self.next_node = self.next_node.saturating_add(1);
        id
    }

    /// Advance the counter past an id that already exists in the flow
    ///
    /// Ids not of the form `node_<n>` are ignored. The counter never moves
    /// backwards.
    pub fn observe_node_id(&mut self, id: &str) {
        if let Some(n) = id
            .strip_prefix(NODE_PREFIX)
            .and_then(|suffix| suffix.parse::<u64>().ok())
        {
            if n >= self.next_node {
                self.next_node = n.saturating_add(1);
            }
        }
    }

    /// Allocate a new edge id
    pub fn next_edge_id(&self) -> EdgeId {
        format!("{}{}", EDGE_PREFIX, Uuid::new_v4().simple())
    }

    /// Back to the initial state
    pub fn reset(&mut self) {
        self.next_node = 1;
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
