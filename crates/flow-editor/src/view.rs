//! Selection and side panel state
//!
//! At most one node is selected. Selecting a node always opens the
//! parameters panel; the files panel is only reached through an explicit
//! toggle. Losing the selection closes whichever panel was open.

use serde::{Deserialize, Serialize};

use flow_graph::NodeId;

/// Which side panel is shown for the selected node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelMode {
    #[default]
    Closed,
    Params,
    Files,
}

/// Transient view state of one editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    selected_node: Option<NodeId>,
    panel: PanelMode,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_node(&self) -> Option<&str> {
        self.selected_node.as_deref()
    }

    pub fn panel(&self) -> PanelMode {
        self.panel
    }

    pub fn is_selected(&self, node_id: &str) -> bool {
        self.selected_node.as_deref() == Some(node_id)
    }

    /// Select a node and open its parameters, whatever panel was open before
    pub fn select_node(&mut self, node_id: impl Into<NodeId>) {
        self.selected_node = Some(node_id.into());
        self.panel = PanelMode::Params;
    }

    /// Drop the selection and close the panel
    pub fn clear_selection(&mut self) {
        self.selected_node = None;
        self.panel = PanelMode::Closed;
    }

    /// Params ↔ closed; files switches to params. Ignored without a selection.
    pub fn toggle_params(&mut self) {
        self.toggle(PanelMode::Params);
    }

    /// Files ↔ closed; params switches to files. Ignored without a selection.
    pub fn toggle_files(&mut self) {
        self.toggle(PanelMode::Files);
    }

    /// Close the panel but keep the selection
    pub fn close_panel(&mut self) {
        self.panel = PanelMode::Closed;
    }

    /// A node left the graph; forget it if it was selected
    ///
    /// Returns whether the selection changed.
    pub fn node_removed(&mut self, node_id: &str) -> bool {
        if self.is_selected(node_id) {
            self.clear_selection();
            true
        } else {
            false
        }
    }

    /// Back to the initial state; used on workspace or flow change
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn toggle(&mut self, mode: PanelMode) {
        if self.selected_node.is_none() {
            log::debug!("Ignoring {:?} panel toggle without a selected node", mode);
            return;
        }
        self.panel = if self.panel == mode {
            PanelMode::Closed
        } else {
            mode
        };
    }
}
