//! Typed per-type node configuration
//!
//! On the wire a node's config is an open JSON map under `data.config`.
//! In memory it is a [`NodeConfig`] whose variant is chosen by the node's
//! [`NodeType`], so form code never has to guess at shapes. Keys a variant
//! does not know about are kept in its `extra` map and written back out
//! unchanged.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{GraphError, Result};
use crate::registry::NodeType;

/// Configuration of a `start` node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartConfig {
    /// Start the flow without a manual trigger
    pub auto_start: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for StartConfig {
    fn default() -> Self {
        Self {
            auto_start: true,
            extra: Map::new(),
        }
    }
}

/// Configuration of an `end` node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndConfig {
    /// Finalize collected data when the flow completes
    pub finalize_data: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for EndConfig {
    fn default() -> Self {
        Self {
            finalize_data: true,
            extra: Map::new(),
        }
    }
}

/// Configuration of a `task` node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskConfig {
    /// Timeout in seconds
    pub timeout: u32,
    /// Retry count
    pub retries: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            timeout: 300,
            retries: 3,
            extra: Map::new(),
        }
    }
}

/// A single branch condition of a decision node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecisionCondition {
    pub label: String,
    pub expression: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Configuration of a `decision` node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecisionConfig {
    pub conditions: Vec<DecisionCondition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// HTTP method of an `api` node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Every method the api node supports, in menu order
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration of an `api` node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiConfig {
    pub method: HttpMethod,
    /// Timeout in seconds
    pub timeout: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            timeout: 30,
            extra: Map::new(),
        }
    }
}

/// Untyped configuration shared by the node types that render as tasks
/// but carry no settings of their own yet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericConfig {
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

/// Node configuration, one variant per config shape
#[derive(Debug, Clone, PartialEq)]
pub enum NodeConfig {
    Start(StartConfig),
    End(EndConfig),
    Task(TaskConfig),
    Decision(DecisionConfig),
    Api(ApiConfig),
    /// condition, parallel, merge, transform and notification
    Generic(GenericConfig),
    /// A stored config that does not fit its node type's shape, kept verbatim
    Untyped(Value),
}

impl NodeConfig {
    /// The default config for a node type
    pub fn for_type(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Start => NodeConfig::Start(StartConfig::default()),
            NodeType::End => NodeConfig::End(EndConfig::default()),
            NodeType::Task => NodeConfig::Task(TaskConfig::default()),
            NodeType::Decision => NodeConfig::Decision(DecisionConfig::default()),
            NodeType::Api => NodeConfig::Api(ApiConfig::default()),
            NodeType::Condition
            | NodeType::Parallel
            | NodeType::Merge
            | NodeType::Transform
            | NodeType::Notification => NodeConfig::Generic(GenericConfig::default()),
        }
    }

    /// Decode a wire config for the given node type
    ///
    /// `null` yields the type's default. Missing keys take their defaults;
    /// known keys with the wrong JSON type are an error.
    pub fn from_value(node_type: NodeType, value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::for_type(node_type));
        }
        if !value.is_object() {
            return Err(GraphError::invalid_config(
                node_type.as_str(),
                "config must be a JSON object",
            ));
        }

        let invalid =
            |e: serde_json::Error| GraphError::invalid_config(node_type.as_str(), e.to_string());

        let config = match node_type {
            NodeType::Start => NodeConfig::Start(serde_json::from_value(value).map_err(invalid)?),
            NodeType::End => NodeConfig::End(serde_json::from_value(value).map_err(invalid)?),
            NodeType::Task => NodeConfig::Task(serde_json::from_value(value).map_err(invalid)?),
            NodeType::Decision => {
                NodeConfig::Decision(serde_json::from_value(value).map_err(invalid)?)
            }
            NodeType::Api => NodeConfig::Api(serde_json::from_value(value).map_err(invalid)?),
            NodeType::Condition
            | NodeType::Parallel
            | NodeType::Merge
            | NodeType::Transform
            | NodeType::Notification => {
                NodeConfig::Generic(serde_json::from_value(value).map_err(invalid)?)
            }
        };
        Ok(config)
    }

    /// Decode a stored config without rejecting it
    ///
    /// Configs that [`NodeConfig::from_value`] refuses become
    /// [`NodeConfig::Untyped`], so loading never fails and the config is
    /// written back exactly as it was read.
    pub fn decode(node_type: NodeType, value: Value) -> Self {
        match Self::from_value(node_type, value.clone()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Keeping config untyped: {}", e);
                NodeConfig::Untyped(value)
            }
        }
    }

    /// Whether this config has the shape `node_type` expects
    pub fn fits(&self, node_type: NodeType) -> bool {
        matches!(
            (self, node_type),
            (NodeConfig::Start(_), NodeType::Start)
                | (NodeConfig::End(_), NodeType::End)
                | (NodeConfig::Task(_), NodeType::Task)
                | (NodeConfig::Decision(_), NodeType::Decision)
                | (NodeConfig::Api(_), NodeType::Api)
                | (
                    NodeConfig::Generic(_),
                    NodeType::Condition
                        | NodeType::Parallel
                        | NodeType::Merge
                        | NodeType::Transform
                        | NodeType::Notification
                )
        )
    }
}

impl Serialize for NodeConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            NodeConfig::Start(c) => c.serialize(serializer),
            NodeConfig::End(c) => c.serialize(serializer),
            NodeConfig::Task(c) => c.serialize(serializer),
            NodeConfig::Decision(c) => c.serialize(serializer),
            NodeConfig::Api(c) => c.serialize(serializer),
            NodeConfig::Generic(c) => c.serialize(serializer),
            NodeConfig::Untyped(value) => value.serialize(serializer),
        }
    }
}
