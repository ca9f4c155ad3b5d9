//! Node parameter form
//!
//! The params panel edits one node at a time: its label plus the handful of
//! typed config fields its node type exposes. Submitting produces a complete
//! replacement [`NodeData`] for the store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use flow_graph::{FlowNode, HttpMethod, NodeConfig, NodeData, NodeId, NodeType};

/// Smallest accepted timeout, in seconds
pub const MIN_TIMEOUT: u32 = 1;
/// Largest accepted timeout, in seconds
pub const MAX_TIMEOUT: u32 = 3600;
/// Largest accepted retry count
pub const MAX_RETRIES: u32 = 10;

/// A rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Label is required")]
    LabelRequired,

    #[error("Timeout must be between 1 and 3600 seconds, got {0}")]
    TimeoutOutOfRange(u32),

    #[error("Retries must be between 0 and 10, got {0}")]
    RetriesOutOfRange(u32),
}

/// Editable parameters of one node
///
/// Fields that the node's type does not have stay `None` and are ignored on
/// submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeParamsForm {
    pub node_id: NodeId,
    pub node_type: NodeType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_start: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalize_data: Option<bool>,
}

impl NodeParamsForm {
    /// Fill the form from a node's current data
    pub fn from_node(node: &FlowNode) -> Self {
        let mut form = Self {
            node_id: node.id.clone(),
            node_type: node.node_type,
            label: node.data.label.clone(),
            timeout: None,
            retries: None,
            method: None,
            auto_start: None,
            finalize_data: None,
        };

        match &node.data.config {
            NodeConfig::Start(c) => form.auto_start = Some(c.auto_start),
            NodeConfig::End(c) => form.finalize_data = Some(c.finalize_data),
            NodeConfig::Task(c) => {
                form.timeout = Some(c.timeout);
                form.retries = Some(c.retries);
            }
            NodeConfig::Api(c) => {
                form.method = Some(c.method);
                form.timeout = Some(c.timeout);
            }
            NodeConfig::Decision(_) | NodeConfig::Generic(_) | NodeConfig::Untyped(_) => {}
        }

        form
    }

    /// Check every field, reporting the first problem
    pub fn validate(&self) -> Result<(), FormError> {
        if self.label.trim().is_empty() {
            return Err(FormError::LabelRequired);
        }
        if let Some(timeout) = self.timeout {
            if !(MIN_TIMEOUT..=MAX_TIMEOUT).contains(&timeout) {
                return Err(FormError::TimeoutOutOfRange(timeout));
            }
        }
        if let Some(retries) = self.retries {
            if retries > MAX_RETRIES {
                return Err(FormError::RetriesOutOfRange(retries));
            }
        }
        Ok(())
    }

    /// Build the node's new data from its current data and this form
    ///
    /// Config keys the form does not expose are carried over untouched.
    pub fn apply(&self, data: &NodeData) -> Result<NodeData, FormError> {
        self.validate()?;

        let mut data = data.clone();
        data.label = self.label.clone();

        match &mut data.config {
            NodeConfig::Start(c) => {
                if let Some(auto_start) = self.auto_start {
                    c.auto_start = auto_start;
                }
            }
            NodeConfig::End(c) => {
                if let Some(finalize_data) = self.finalize_data {
                    c.finalize_data = finalize_data;
                }
            }
            NodeConfig::Task(c) => {
                if let Some(timeout) = self.timeout {
                    c.timeout = timeout;
                }
                if let Some(retries) = self.retries {
                    c.retries = retries;
                }
            }
            NodeConfig::Api(c) => {
                if let Some(method) = self.method {
                    c.method = method;
                }
                if let Some(timeout) = self.timeout {
                    c.timeout = timeout;
                }
            }
            NodeConfig::Decision(_) | NodeConfig::Generic(_) | NodeConfig::Untyped(_) => {}
        }

        Ok(data)
    }
}
