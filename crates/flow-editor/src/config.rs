//! Configuration types for the editor

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Editor settings
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Edge type given to edges that carry none
    pub default_edge_type: String,
    /// Stroke color of rendered edges
    pub edge_stroke: String,
    /// Grid committed drag positions snap to (x step, y step); `null` disables snapping
    pub snap_grid: Option<[f64; 2]>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_edge_type: "custom".to_string(),
            edge_stroke: "hsl(var(--edge-default))".to_string(),
            snap_grid: Some([15.0, 15.0]),
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&content)?;
        log::debug!("Loaded editor config from {:?}", path.as_ref());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EditorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.default_edge_type, "custom");
        assert_eq!(config.snap_grid, Some([15.0, 15.0]));
    }

    #[test]
    fn test_partial_config() {
        let config =
            EditorConfig::from_json_str(r#"{"edgeStroke": "black", "snapGrid": null}"#).unwrap();
        assert_eq!(config.edge_stroke, "black");
        assert_eq!(config.snap_grid, None);
        assert_eq!(config.default_edge_type, "custom");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{"defaultEdgeType": "smoothstep"}"#).unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.default_edge_type, "smoothstep");

        let missing = EditorConfig::load(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(EditorError::Io(_))));
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let result = EditorConfig::from_json_str(r#"{"snapGrid": "fine"}"#);
        assert!(matches!(result, Err(EditorError::Config(_))));
    }
}
