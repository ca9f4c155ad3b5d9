//! Structural validation for flow graphs
//!
//! The store never rejects a mutation, so a loaded or edited flow can hold
//! duplicate ids, edges into missing nodes or edges on handles a node type
//! does not have. This module reports all of them at once.

use std::collections::{HashMap, HashSet};

use crate::registry::{NodeType, SourceHandles};
use crate::types::{FlowEdge, FlowNode};

/// A structural problem found in a flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Two nodes share an id
    DuplicateNodeId { node_id: String },
    /// Two edges share an id
    DuplicateEdgeId { edge_id: String },
    /// An edge references a non-existent node
    UnknownNode { edge_id: String, node_id: String },
    /// An edge leaves a node type that has no outputs
    NoOutputs { edge_id: String, node_id: String },
    /// An edge leaves through a handle the node type does not have
    UnknownSourceHandle {
        edge_id: String,
        node_id: String,
        handle: String,
    },
    /// An edge enters a node type that has no inputs
    NoInputs { edge_id: String, node_id: String },
    /// A node's config has the shape of another node type
    ConfigMismatch { node_id: String, node_type: NodeType },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateNodeId { node_id } => write!(f, "Duplicate node id '{}'", node_id),
            Self::DuplicateEdgeId { edge_id } => write!(f, "Duplicate edge id '{}'", edge_id),
            Self::UnknownNode { edge_id, node_id } => {
                write!(f, "Edge '{}' references unknown node '{}'", edge_id, node_id)
            }
            Self::NoOutputs { edge_id, node_id } => {
                write!(f, "Edge '{}' leaves node '{}' which has no outputs", edge_id, node_id)
            }
            Self::UnknownSourceHandle {
                edge_id,
                node_id,
                handle,
            } => write!(
                f,
                "Edge '{}' leaves node '{}' through unknown handle '{}'",
                edge_id, node_id, handle
            ),
            Self::NoInputs { edge_id, node_id } => {
                write!(f, "Edge '{}' enters node '{}' which has no inputs", edge_id, node_id)
            }
            Self::ConfigMismatch { node_id, node_type } => {
                write!(f, "Node '{}' has a config that does not fit type '{}'", node_id, node_type)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a flow's nodes and edges
///
/// Returns all validation errors found (not just the first).
pub fn validate_graph(nodes: &[FlowNode], edges: &[FlowEdge]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_unique_ids(nodes, edges, &mut errors);
    validate_configs(nodes, &mut errors);
    validate_edge_endpoints(nodes, edges, &mut errors);

    errors
}

fn validate_unique_ids(nodes: &[FlowNode], edges: &[FlowEdge], errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.id.as_str()) {
            errors.push(ValidationError::DuplicateNodeId {
                node_id: node.id.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for edge in edges {
        if !seen.insert(edge.id.as_str()) {
            errors.push(ValidationError::DuplicateEdgeId {
                edge_id: edge.id.clone(),
            });
        }
    }
}

fn validate_configs(nodes: &[FlowNode], errors: &mut Vec<ValidationError>) {
    for node in nodes {
        if !node.data.config.fits(node.node_type) {
            errors.push(ValidationError::ConfigMismatch {
                node_id: node.id.clone(),
                node_type: node.node_type,
            });
        }
    }
}

/// Check that every edge joins existing nodes through handles they have
fn validate_edge_endpoints(
    nodes: &[FlowNode],
    edges: &[FlowEdge],
    errors: &mut Vec<ValidationError>,
) {
    let types: HashMap<&str, NodeType> =
        nodes.iter().map(|n| (n.id.as_str(), n.node_type)).collect();

    for edge in edges {
        match types.get(edge.source.as_str()) {
            None => errors.push(ValidationError::UnknownNode {
                edge_id: edge.id.clone(),
                node_id: edge.source.clone(),
            }),
            Some(source_type) => {
                let handles = source_type.source_handles();
                if !handles.accepts(edge.source_handle.as_deref()) {
                    let error = match (handles, &edge.source_handle) {
                        (SourceHandles::None, _) | (_, None) => ValidationError::NoOutputs {
                            edge_id: edge.id.clone(),
                            node_id: edge.source.clone(),
                        },
                        (_, Some(handle)) => ValidationError::UnknownSourceHandle {
                            edge_id: edge.id.clone(),
                            node_id: edge.source.clone(),
                            handle: handle.clone(),
                        },
                    };
                    errors.push(error);
                }
            }
        }

        match types.get(edge.target.as_str()) {
            None => errors.push(ValidationError::UnknownNode {
                edge_id: edge.id.clone(),
                node_id: edge.target.clone(),
            }),
            Some(target_type) if !target_type.accepts_input() => {
                errors.push(ValidationError::NoInputs {
                    edge_id: edge.id.clone(),
                    node_id: edge.target.clone(),
                })
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::config::NodeConfig;
    use crate::types::FlowEdge;

    #[test]
    fn test_valid_graph() {
        let graph = GraphBuilder::new()
            .add_node("start", NodeType::Start, (0.0, 0.0))
            .add_node("check", NodeType::Decision, (100.0, 0.0))
            .add_node("end", NodeType::End, (200.0, 0.0))
            .add_edge("start", "check")
            .edge(FlowEdge::new("yes", "check", "end").with_handles(Some("true".to_string()), None))
            .build();

        assert!(validate_graph(&graph.nodes, &graph.edges).is_empty());
    }

    #[test]
    fn test_edge_references_missing_node() {
        let graph = GraphBuilder::new()
            .add_node("a", NodeType::Task, (0.0, 0.0))
            .add_edge_with_id("e1", "a", "ghost")
            .build();

        let errors = validate_graph(&graph.nodes, &graph.edges);
        assert_eq!(
            errors,
            vec![ValidationError::UnknownNode {
                edge_id: "e1".to_string(),
                node_id: "ghost".to_string(),
            }]
        );
    }

    #[test]
    fn test_handles_follow_node_type() {
        let graph = GraphBuilder::new()
            .add_node("start", NodeType::Start, (0.0, 0.0))
            .add_node("check", NodeType::Decision, (0.0, 0.0))
            .add_node("end", NodeType::End, (0.0, 0.0))
            .add_edge_with_id("into-start", "check", "start")
            .add_edge_with_id("from-end", "end", "check")
            .edge(
                FlowEdge::new("maybe", "check", "end")
                    .with_handles(Some("maybe".to_string()), None),
            )
            .build();

        let errors = validate_graph(&graph.nodes, &graph.edges);
        assert!(errors.contains(&ValidationError::NoInputs {
            edge_id: "into-start".to_string(),
            node_id: "start".to_string(),
        }));
        assert!(errors.contains(&ValidationError::NoOutputs {
            edge_id: "from-end".to_string(),
            node_id: "end".to_string(),
        }));
        assert!(errors.contains(&ValidationError::UnknownSourceHandle {
            edge_id: "maybe".to_string(),
            node_id: "check".to_string(),
            handle: "maybe".to_string(),
        }));
    }

    #[test]
    fn test_collects_multiple_errors() {
        let graph = GraphBuilder::new()
            .add_node("a", NodeType::Task, (0.0, 0.0))
            .add_node("a", NodeType::Merge, (0.0, 0.0))
            .with_config(NodeConfig::for_type(NodeType::Api))
            .add_edge_with_id("e", "a", "a")
            .add_edge_with_id("e", "a", "a")
            .build();

        let errors = validate_graph(&graph.nodes, &graph.edges);
        assert!(errors.contains(&ValidationError::DuplicateNodeId {
            node_id: "a".to_string()
        }));
        assert!(errors.contains(&ValidationError::DuplicateEdgeId {
            edge_id: "e".to_string()
        }));
        assert!(errors.contains(&ValidationError::ConfigMismatch {
            node_id: "a".to_string(),
            node_type: NodeType::Merge,
        }));
    }

    #[test]
    fn test_display() {
        let error = ValidationError::UnknownNode {
            edge_id: "e1".to_string(),
            node_id: "x".to_string(),
        };
        assert_eq!(error.to_string(), "Edge 'e1' references unknown node 'x'");
    }
}
