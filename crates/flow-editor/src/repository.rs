//! Flow storage seam
//!
//! The editor loads a flow from, and hands it back to, a [`FlowRepository`].
//! [`LocalFlowRepository`] keeps flows in memory per workspace, optionally
//! mirrored to `<dir>/<workspace_id>/<flow_id>.json`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use flow_graph::{Flow, FlowStatus};

use crate::error::{EditorError, Result};

/// Listing entry for a stored flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSummary {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    pub status: FlowStatus,
    pub node_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl From<&Flow> for FlowSummary {
    fn from(flow: &Flow) -> Self {
        Self {
            id: flow.id.clone(),
            workspace_id: flow.workspace_id.clone(),
            name: flow.name.clone(),
            status: flow.status,
            node_count: flow.nodes.len(),
            updated_at: flow.updated_at,
        }
    }
}

/// Where flows live between editing sessions
pub trait FlowRepository {
    /// Fetch a flow, or `None` if the workspace has no such flow
    fn load_flow(&self, workspace_id: &str, flow_id: &str) -> Result<Option<Flow>>;

    /// Insert or replace a flow under its own workspace
    fn save_flow(&mut self, flow: Flow) -> Result<()>;

    /// List a workspace's flows, most recently updated first
    fn list_flows(&self, workspace_id: &str) -> Vec<FlowSummary>;

    /// Remove a flow, returning it if it existed
    fn delete_flow(&mut self, workspace_id: &str, flow_id: &str) -> Result<Option<Flow>>;
}

/// In-memory flow repository with optional file persistence
///
/// # Example
///
/// ```
/// use flow_editor::{FlowRepository, LocalFlowRepository};
/// use flow_graph::Flow;
///
/// let mut repo = LocalFlowRepository::new();
/// repo.save_flow(Flow::new("flow-1", "ws-1", "Onboarding")).unwrap();
///
/// assert_eq!(repo.list_flows("ws-1").len(), 1);
/// assert!(repo.load_flow("ws-2", "flow-1").unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct LocalFlowRepository {
    /// Flows keyed by workspace, then by flow id
    flows: HashMap<String, HashMap<String, Flow>>,
    persist_path: Option<PathBuf>,
}

impl LocalFlowRepository {
    /// Create a repository that only lives in memory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository that mirrors every change to the given directory
    ///
    /// The directory is created on first save.
    pub fn with_persistence(path: impl AsRef<Path>) -> Self {
        Self {
            flows: HashMap::new(),
            persist_path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Load every flow found under the persistence directory
    ///
    /// Files that fail to parse are skipped with a warning. Returns the
    /// number of flows loaded.
    pub fn load_from_disk(&mut self) -> Result<usize> {
        let Some(root) = self.persist_path.clone() else {
            return Ok(0);
        };
        if !root.exists() {
            return Ok(0);
        }

        let mut count = 0;
        for workspace_dir in std::fs::read_dir(&root)? {
            let workspace_dir = workspace_dir?.path();
            if !workspace_dir.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&workspace_dir)? {
                let file_path = entry?.path();
                if file_path.extension().is_none_or(|e| e != "json") {
                    continue;
                }

                let content = std::fs::read_to_string(&file_path)?;
                match serde_json::from_str::<Flow>(&content) {
                    Ok(flow) => {
                        log::info!("Loaded flow '{}' from {:?}", flow.id, file_path);
                        self.insert(flow);
                        count += 1;
                    }
                    Err(e) => {
                        log::warn!("Failed to parse flow from {:?}: {}", file_path, e);
                    }
                }
            }
        }
        Ok(count)
    }

    /// Number of stored flows across all workspaces
    pub fn len(&self) -> usize {
        self.flows.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, flow: Flow) {
        self.flows
            .entry(flow.workspace_id.clone())
            .or_default()
            .insert(flow.id.clone(), flow);
    }

    /// File of a flow under the persistence root, `None` when not persisting
    ///
    /// Both ids become path segments, so they must name a single entry
    /// inside the root.
    fn file_path(&self, workspace_id: &str, flow_id: &str) -> Result<Option<PathBuf>> {
        let Some(root) = self.persist_path.as_ref() else {
            return Ok(None);
        };
        check_path_segment("workspace", workspace_id)?;
        check_path_segment("flow", flow_id)?;
        Ok(Some(root.join(workspace_id).join(format!("{}.json", flow_id))))
    }

    fn save_to_disk(&self, flow: &Flow) -> Result<()> {
        let Some(file_path) = self.file_path(&flow.workspace_id, &flow.id)? else {
            return Ok(());
        };

        if let Some(dir) = file_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(flow)?;
        std::fs::write(&file_path, content)?;
        log::debug!("Saved flow '{}' to {:?}", flow.id, file_path);
        Ok(())
    }

    fn delete_from_disk(&self, workspace_id: &str, flow_id: &str) -> Result<()> {
        let Some(file_path) = self.file_path(workspace_id, flow_id)? else {
            return Ok(());
        };

        if file_path.exists() {
            std::fs::remove_file(&file_path)?;
            log::debug!("Deleted flow '{}' from {:?}", flow_id, file_path);
        }
        Ok(())
    }
}

fn check_path_segment(kind: &str, id: &str) -> Result<()> {
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
        return Err(EditorError::repository(format!(
            "Invalid {} id for file storage: {:?}",
            kind, id
        )));
    }
    Ok(())
}

impl FlowRepository for LocalFlowRepository {
    fn load_flow(&self, workspace_id: &str, flow_id: &str) -> Result<Option<Flow>> {
        Ok(self
            .flows
            .get(workspace_id)
            .and_then(|flows| flows.get(flow_id))
            .cloned())
    }

    fn save_flow(&mut self, flow: Flow) -> Result<()> {
        self.save_to_disk(&flow)?;
        self.insert(flow);
        Ok(())
    }

    fn list_flows(&self, workspace_id: &str) -> Vec<FlowSummary> {
        let mut summaries: Vec<FlowSummary> = self
            .flows
            .get(workspace_id)
            .map(|flows| flows.values().map(FlowSummary::from).collect())
            .unwrap_or_default();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        summaries
    }

    fn delete_flow(&mut self, workspace_id: &str, flow_id: &str) -> Result<Option<Flow>> {
        self.delete_from_disk(workspace_id, flow_id)?;
        Ok(self
            .flows
            .get_mut(workspace_id)
            .and_then(|flows| flows.remove(flow_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use flow_graph::{GraphBuilder, NodeType};

    fn sample_flow(id: &str, workspace_id: &str) -> Flow {
        let graph = GraphBuilder::new()
            .add_node("node_1", NodeType::Start, (0.0, 0.0))
            .add_node("node_2", NodeType::End, (0.0, 150.0))
            .add_edge("node_1", "node_2")
            .build();
        Flow::new(id, workspace_id, format!("Flow {}", id)).with_graph(graph)
    }

    #[test]
    fn test_save_and_load() {
        let mut repo = LocalFlowRepository::new();
        repo.save_flow(sample_flow("f1", "ws")).unwrap();

        let loaded = repo.load_flow("ws", "f1").unwrap().unwrap();
        assert_eq!(loaded.nodes.len(), 2);
        assert!(repo.load_flow("ws", "f2").unwrap().is_none());
        assert!(repo.load_flow("other", "f1").unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_existing() {
        let mut repo = LocalFlowRepository::new();
        repo.save_flow(sample_flow("f1", "ws")).unwrap();

        let mut renamed = sample_flow("f1", "ws");
        renamed.name = "Renamed".to_string();
        repo.save_flow(renamed).unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.load_flow("ws", "f1").unwrap().unwrap().name, "Renamed");
    }

    #[test]
    fn test_list_is_per_workspace_newest_first() {
        let mut repo = LocalFlowRepository::new();
        let mut older = sample_flow("old", "ws");
        older.updated_at -= Duration::hours(1);
        repo.save_flow(older).unwrap();
        repo.save_flow(sample_flow("new", "ws")).unwrap();
        repo.save_flow(sample_flow("elsewhere", "ws-2")).unwrap();

        let ids: Vec<_> = repo.list_flows("ws").into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert_eq!(repo.list_flows("ws-2")[0].node_count, 2);
        assert!(repo.list_flows("missing").is_empty());
    }

    #[test]
    fn test_delete() {
        let mut repo = LocalFlowRepository::new();
        repo.save_flow(sample_flow("f1", "ws")).unwrap();

        assert!(repo.delete_flow("ws", "f1").unwrap().is_some());
        assert!(repo.delete_flow("ws", "f1").unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();

        let mut repo = LocalFlowRepository::with_persistence(dir.path());
        repo.save_flow(sample_flow("f1", "ws")).unwrap();
        repo.save_flow(sample_flow("f2", "ws")).unwrap();
        repo.delete_flow("ws", "f2").unwrap();
        assert!(dir.path().join("ws").join("f1.json").exists());
        assert!(!dir.path().join("ws").join("f2.json").exists());

        std::fs::write(dir.path().join("ws").join("broken.json"), "{not json").unwrap();

        let mut reopened = LocalFlowRepository::with_persistence(dir.path());
        assert_eq!(reopened.load_from_disk().unwrap(), 1);
        assert_eq!(
            reopened.load_flow("ws", "f1").unwrap(),
            repo.load_flow("ws", "f1").unwrap()
        );
    }

    #[test]
    fn test_ids_cannot_leave_the_storage_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().join("flows");
        let mut repo = LocalFlowRepository::with_persistence(&root);

        let err = repo.save_flow(sample_flow("../../escaped", "ws")).unwrap_err();
        assert!(matches!(err, EditorError::Repository(_)));
        assert!(!dir.path().join("escaped.json").exists());
        assert!(repo.is_empty());

        for (flow_id, workspace_id) in [("f1", "a/b"), ("f1", ".."), ("", "ws"), ("a\\b", "ws")] {
            let result = repo.save_flow(sample_flow(flow_id, workspace_id));
            assert!(matches!(result, Err(EditorError::Repository(_))));
        }
        assert!(matches!(repo.delete_flow("..", "f1"), Err(EditorError::Repository(_))));

        repo.save_flow(sample_flow("f1", "ws")).unwrap();
        assert!(root.join("ws").join("f1.json").exists());
    }

    #[test]
    fn test_ids_are_free_form_in_memory() {
        let mut repo = LocalFlowRepository::new();
        repo.save_flow(sample_flow("../f1", "ws/a")).unwrap();
        assert!(repo.load_flow("ws/a", "../f1").unwrap().is_some());
    }

    #[test]
    fn test_load_without_persistence() {
        let mut repo = LocalFlowRepository::new();
        assert_eq!(repo.load_from_disk().unwrap(), 0);
    }
}
