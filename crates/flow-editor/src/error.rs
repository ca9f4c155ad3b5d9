//! Error types for the editor layer

use thiserror::Error;

use crate::forms::FormError;

/// Result type alias using EditorError
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors that can occur at the editor's fallible boundaries
#[derive(Debug, Error)]
pub enum EditorError {
    /// Error from the graph model (snapshot decoding, config decoding)
    #[error("Graph error: {0}")]
    Graph(#[from] flow_graph::GraphError),

    /// Node parameter form rejected its input
    #[error("Invalid node parameters: {0}")]
    Form(#[from] FormError),

    /// The flow repository failed
    #[error("Repository error: {0}")]
    Repository(String),

    /// An operation needs an open flow
    #[error("No flow is open")]
    NoFlowOpen,

    /// The edited node does not exist
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Configuration could not be parsed
    #[error("Invalid editor config: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditorError {
    /// Create a repository error with a message
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
