//! One open editor
//!
//! An [`EditorSession`] owns the graph store, the view state and the widget
//! adapter of a single editor. Every entry point mutates through the store
//! and, when the graph or selection changed, pushes fresh widget state to
//! the sink.

use std::sync::Arc;

use flow_graph::{
    validate_graph, EdgeId, Flow, GraphStore, NodeDataUpdate, NodeId, NodeStatus, NodeType,
    NodeUpdate, Position, ValidationError,
};

use crate::adapter::{ChangeOutcome, ViewAdapter};
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::events::{NullWidgetSink, WidgetSink};
use crate::forms::NodeParamsForm;
use crate::repository::FlowRepository;
use crate::view::{PanelMode, ViewState};
use crate::widget::{Connection, EdgeChange, NodeChange, WidgetEdge, WidgetNode};

/// State of one editor instance
pub struct EditorSession {
    config: EditorConfig,
    store: GraphStore,
    view: ViewState,
    adapter: ViewAdapter,
    sink: Arc<dyn WidgetSink>,
    workspace_id: Option<String>,
    flow: Option<Flow>,
}

impl EditorSession {
    pub fn new(config: EditorConfig, sink: Arc<dyn WidgetSink>) -> Self {
        Self {
            adapter: ViewAdapter::new(&config),
            config,
            store: GraphStore::new(),
            view: ViewState::new(),
            sink,
            workspace_id: None,
            flow: None,
        }
    }

    /// A session with default settings whose widget updates go nowhere
    pub fn headless() -> Self {
        Self::new(EditorConfig::default(), Arc::new(NullWidgetSink))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn selected_node(&self) -> Option<&str> {
        self.view.selected_node()
    }

    pub fn panel(&self) -> PanelMode {
        self.view.panel()
    }

    /// Nodes as the widget currently shows them
    pub fn widget_nodes(&self) -> &[WidgetNode] {
        self.adapter.nodes()
    }

    /// Edges as the widget currently shows them
    pub fn widget_edges(&self) -> &[WidgetEdge] {
        self.adapter.edges()
    }

    pub fn current_workspace(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    /// The open flow as it was loaded or last saved
    pub fn current_flow(&self) -> Option<&Flow> {
        self.flow.as_ref()
    }

    // =========================================================================
    // Workspace and flow lifecycle
    // =========================================================================

    /// Switch workspaces, closing any open flow
    pub fn set_current_workspace(&mut self, workspace_id: Option<String>) {
        if self.workspace_id == workspace_id {
            return;
        }
        self.close_flow();
        self.workspace_id = workspace_id;
    }

    /// Replace the edited graph with a flow's nodes and edges
    ///
    /// The selection starts over.
    pub fn open_flow(&mut self, flow: Flow) {
        self.store.set_loading(true);
        self.store.clear_flow();
        self.view.reset();
        self.store.restore(flow.graph());
        self.store.set_loading(false);

        log::info!(
            "Opened flow '{}' ({} nodes, {} edges)",
            flow.id,
            flow.nodes.len(),
            flow.edges.len()
        );
        self.workspace_id = Some(flow.workspace_id.clone());
        self.flow = Some(flow);
        self.sync();
    }

    /// Load a flow from a repository and open it
    ///
    /// Returns `false` when the repository has no such flow; the current
    /// graph is left alone in that case.
    pub fn open_from(
        &mut self,
        repo: &dyn FlowRepository,
        workspace_id: &str,
        flow_id: &str,
    ) -> Result<bool> {
        match repo.load_flow(workspace_id, flow_id)? {
            Some(flow) => {
                self.open_flow(flow);
                Ok(true)
            }
            None => {
                log::warn!("Flow '{}' not found in workspace '{}'", flow_id, workspace_id);
                Ok(false)
            }
        }
    }

    /// Empty the editor
    pub fn close_flow(&mut self) {
        if let Some(flow) = self.flow.take() {
            log::info!("Closed flow '{}'", flow.id);
        }
        self.store.clear_flow();
        self.view.reset();
        self.sync();
    }

    /// The open flow with the edited nodes and edges
    pub fn to_flow(&self) -> Option<Flow> {
        let mut flow = self.flow.clone()?;
        flow.replace_graph(self.store.snapshot());
        Some(flow)
    }

    /// Hand the edited flow back to a repository
    ///
    /// Structural problems are logged but do not block the save.
    pub fn save(&mut self, repo: &mut dyn FlowRepository) -> Result<()> {
        let flow = self.to_flow().ok_or(EditorError::NoFlowOpen)?;

        for finding in self.validate() {
            log::warn!("Saving flow '{}' with problem: {}", flow.id, finding);
        }

        repo.save_flow(flow.clone())?;
        log::info!("Saved flow '{}' ({} nodes)", flow.id, flow.nodes.len());
        self.flow = Some(flow);
        Ok(())
    }

    /// Structural problems in the edited graph
    pub fn validate(&self) -> Vec<ValidationError> {
        validate_graph(self.store.nodes(), self.store.edges())
    }

    // =========================================================================
    // Graph editing
    // =========================================================================

    /// Create a node of the given type from the palette
    pub fn add_node(&mut self, node_type: NodeType, position: impl Into<Position>) -> NodeId {
        let node = self.store.create_new_node(node_type, position);
        let id = node.id.clone();
        self.store.add_node(node);
        self.sync();
        id
    }

    /// Delete a node and its edges, dropping it from the selection
    pub fn delete_node(&mut self, node_id: &str) -> bool {
        let deleted = self.store.delete_node(node_id);
        let deselected = self.view.node_removed(node_id);
        self.settle(ChangeOutcome {
            graph_changed: deleted,
            selection_changed: deselected,
        });
        deleted
    }

    /// The params form's delete action
    pub fn delete_selected_node(&mut self) -> Option<NodeId> {
        let node_id = self.view.selected_node()?.to_string();
        self.delete_node(&node_id);
        self.view.clear_selection();
        Some(node_id)
    }

    /// Form for the selected node's parameters
    pub fn params_form(&self) -> Option<NodeParamsForm> {
        let node_id = self.view.selected_node()?;
        self.store.find_node(node_id).map(NodeParamsForm::from_node)
    }

    /// Validate a submitted params form and write it to its node
    pub fn submit_params(&mut self, form: &NodeParamsForm) -> Result<()> {
        let node = self
            .store
            .find_node(&form.node_id)
            .ok_or_else(|| EditorError::NodeNotFound(form.node_id.clone()))?;
        let data = form.apply(&node.data)?;

        self.store.update_node(&form.node_id, NodeUpdate::data(data));
        self.sync();
        Ok(())
    }

    /// Show a node's run status
    pub fn set_node_status(&mut self, node_id: &str, status: NodeStatus) -> bool {
        let update = NodeUpdate::data(NodeDataUpdate {
            status: Some(Some(status)),
            ..NodeDataUpdate::default()
        });
        let updated = self.store.update_node(node_id, update);
        if updated {
            self.sync();
        }
        updated
    }

    // =========================================================================
    // Widget events
    // =========================================================================

    pub fn apply_node_changes(&mut self, changes: Vec<NodeChange>) -> ChangeOutcome {
        let outcome = self
            .adapter
            .handle_node_changes(changes, &mut self.store, &mut self.view);
        self.settle(outcome);
        outcome
    }

    pub fn apply_edge_changes(&mut self, changes: Vec<EdgeChange>) -> ChangeOutcome {
        let outcome = self.adapter.handle_edge_changes(changes, &mut self.store);
        self.settle(outcome);
        outcome
    }

    /// Create an edge from a completed connection gesture
    pub fn connect(&mut self, connection: Connection) -> Option<EdgeId> {
        let id = self.adapter.connect(connection, &mut self.store)?;
        self.sync();
        Some(id)
    }

    pub fn pane_click(&mut self) {
        let outcome = self.adapter.pane_click(&mut self.view);
        self.settle(outcome);
    }

    pub fn node_click(&mut self, node_id: &str) {
        let outcome = self.adapter.node_click(node_id, &self.store, &mut self.view);
        self.settle(outcome);
    }

    /// Double click selects like a single click
    pub fn node_double_click(&mut self, node_id: &str) {
        self.node_click(node_id);
    }

    // =========================================================================
    // Side panel
    // =========================================================================

    pub fn toggle_params_panel(&mut self) {
        self.view.toggle_params();
    }

    pub fn toggle_files_panel(&mut self) {
        self.view.toggle_files();
    }

    pub fn close_panel(&mut self) {
        self.view.close_panel();
    }

    // =========================================================================
    // Sync
    // =========================================================================

    fn settle(&mut self, outcome: ChangeOutcome) {
        if outcome.needs_sync() {
            self.sync();
        }
    }

    fn sync(&mut self) {
        let update = self.adapter.sync(&self.store, &self.view);
        if let Err(e) = self.sink.push(update) {
            log::warn!("Failed to push widget update: {}", e);
        }
    }
}
