//! Error types for the flow graph model

use thiserror::Error;

/// Result type alias using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised at the fallible edges of the graph model
///
/// Store mutations never fail; these come from decoding configs and parsing
/// type tags.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node's config does not match the shape its type expects
    #[error("Invalid config for '{node_type}' node: {message}")]
    InvalidConfig { node_type: String, message: String },

    /// A type tag outside the closed node type set
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),
}

impl GraphError {
    /// Create an invalid config error for a node type tag
    pub fn invalid_config(node_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            node_type: node_type.into(),
            message: message.into(),
        }
    }
}
