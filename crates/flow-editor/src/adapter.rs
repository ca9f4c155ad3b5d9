//! View adapter between the graph store and the rendering widget
//!
//! Canonical nodes and edges are derived into widget shapes (adding the
//! `selected` flag and the default edge style), and widget events are
//! translated back into store mutations.
//!
//! The adapter keeps a mirror of the widget's own state. Intermediate drag
//! frames only move the mirror; the store sees one position update per
//! completed drag.

use flow_graph::{EdgeId, FlowEdge, GraphStore, NodeUpdate, Position};

use crate::config::EditorConfig;
use crate::events::WidgetUpdate;
use crate::view::ViewState;
use crate::widget::{Connection, EdgeChange, EdgeStyle, NodeChange, WidgetEdge, WidgetNode};

/// What a batch of widget events changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeOutcome {
    /// Nodes or edges were added, removed, moved or edited
    pub graph_changed: bool,
    /// The selected node or panel changed
    pub selection_changed: bool,
}

impl ChangeOutcome {
    /// Whether the widget needs a fresh push
    pub fn needs_sync(&self) -> bool {
        self.graph_changed || self.selection_changed
    }

    fn graph() -> Self {
        Self {
            graph_changed: true,
            ..Self::default()
        }
    }

    fn selection() -> Self {
        Self {
            selection_changed: true,
            ..Self::default()
        }
    }

    fn merge(&mut self, other: ChangeOutcome) {
        self.graph_changed |= other.graph_changed;
        self.selection_changed |= other.selection_changed;
    }
}

/// Two-way adapter for one editor's widget
#[derive(Debug, Clone)]
pub struct ViewAdapter {
    default_edge_type: String,
    edge_stroke: String,
    snap_grid: Option<[f64; 2]>,
    nodes: Vec<WidgetNode>,
    edges: Vec<WidgetEdge>,
}

impl ViewAdapter {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            default_edge_type: config.default_edge_type.clone(),
            edge_stroke: config.edge_stroke.clone(),
            snap_grid: config.snap_grid,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// The widget's current nodes, including uncommitted drag positions
    pub fn nodes(&self) -> &[WidgetNode] {
        &self.nodes
    }

    /// The widget's current edges
    pub fn edges(&self) -> &[WidgetEdge] {
        &self.edges
    }

    /// Derive widget nodes from the store
    ///
    /// A node that is mid-drag in the widget keeps its transient position.
    pub fn derive_nodes(&self, store: &GraphStore, view: &ViewState) -> Vec<WidgetNode> {
        store
            .nodes()
            .iter()
            .map(|node| {
                let dragging = self.nodes.iter().find(|n| n.id == node.id && n.dragging);
                WidgetNode {
                    id: node.id.clone(),
                    node_type: node.node_type,
                    position: dragging.map_or(node.position, |n| n.position),
                    data: node.data.clone(),
                    selected: view.is_selected(&node.id),
                    dragging: dragging.is_some(),
                    width: node.width,
                    height: node.height,
                }
            })
            .collect()
    }

    /// Derive widget edges from the store
    pub fn derive_edges(&self, store: &GraphStore) -> Vec<WidgetEdge> {
        store
            .edges()
            .iter()
            .map(|edge| WidgetEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                source_handle: edge.source_handle.clone(),
                target_handle: edge.target_handle.clone(),
                edge_type: edge
                    .edge_type
                    .clone()
                    .unwrap_or_else(|| self.default_edge_type.clone()),
                data: edge.data.clone(),
                style: EdgeStyle {
                    stroke: self.edge_stroke.clone(),
                },
                selected: self.edges.iter().any(|e| e.id == edge.id && e.selected),
            })
            .collect()
    }

    /// Re-derive the widget state and return it for pushing
    pub fn sync(&mut self, store: &GraphStore, view: &ViewState) -> WidgetUpdate {
        self.nodes = self.derive_nodes(store, view);
        self.edges = self.derive_edges(store);
        WidgetUpdate {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Apply a batch of node changes from the widget
    pub fn handle_node_changes(
        &mut self,
        changes: Vec<NodeChange>,
        store: &mut GraphStore,
        view: &mut ViewState,
    ) -> ChangeOutcome {
        let mut outcome = ChangeOutcome::default();

        for change in changes {
            self.apply_to_mirror(&change);

            match change {
                NodeChange::Position {
                    id,
                    position,
                    dragging: Some(false),
                } => {
                    let committed = position.or_else(|| self.mirror_position(&id));
                    if let Some(position) = committed {
                        let position = self.snap(position);
                        if store.update_node(&id, NodeUpdate::position(position)) {
                            outcome.merge(ChangeOutcome::graph());
                        }
                    }
                }
                NodeChange::Position { .. } => {}
                NodeChange::Dimensions {
                    id,
                    dimensions: Some(d),
                } => {
                    if store.update_node(&id, NodeUpdate::dimensions(d.width, d.height)) {
                        outcome.merge(ChangeOutcome::graph());
                    }
                }
                NodeChange::Dimensions { .. } => {}
                NodeChange::Select { id, selected: true } => {
                    if store.find_node(&id).is_some() && !view.is_selected(&id) {
                        view.select_node(id);
                        outcome.merge(ChangeOutcome::selection());
                    }
                }
                NodeChange::Select { .. } => {}
                NodeChange::Remove { id } => {
                    if store.delete_node(&id) {
                        outcome.merge(ChangeOutcome::graph());
                    }
                    if view.node_removed(&id) {
                        outcome.merge(ChangeOutcome::selection());
                    }
                }
            }
        }

        outcome
    }

    /// Apply a batch of edge changes from the widget
    pub fn handle_edge_changes(
        &mut self,
        changes: Vec<EdgeChange>,
        store: &mut GraphStore,
    ) -> ChangeOutcome {
        let mut outcome = ChangeOutcome::default();

        for change in changes {
            match change {
                EdgeChange::Select { id, selected } => {
                    if let Some(edge) = self.edges.iter_mut().find(|e| e.id == id) {
                        edge.selected = selected;
                    }
                }
                EdgeChange::Remove { id } => {
                    self.edges.retain(|e| e.id != id);
                    if store.delete_edge(&id) {
                        outcome.merge(ChangeOutcome::graph());
                    }
                }
            }
        }

        outcome
    }

    /// Turn a completed connection gesture into a new edge
    ///
    /// Returns the new edge's id, or `None` when the gesture lacks an endpoint.
    pub fn connect(&mut self, connection: Connection, store: &mut GraphStore) -> Option<EdgeId> {
        let (Some(source), Some(target)) = (connection.source, connection.target) else {
            log::debug!("Ignoring connection without both endpoints");
            return None;
        };

        let id = store.allocate_edge_id();
        let edge = FlowEdge::new(id.clone(), source, target)
            .with_type(self.default_edge_type.clone())
            .with_handles(connection.source_handle, connection.target_handle);
        store.add_edge(edge);
        Some(id)
    }

    /// A click on empty canvas
    pub fn pane_click(&mut self, view: &mut ViewState) -> ChangeOutcome {
        if view.selected_node().is_some() {
            view.clear_selection();
            ChangeOutcome::selection()
        } else {
            ChangeOutcome::default()
        }
    }

    /// A click (or double click) on a node
    pub fn node_click(
        &mut self,
        node_id: &str,
        store: &GraphStore,
        view: &mut ViewState,
    ) -> ChangeOutcome {
        if store.find_node(node_id).is_none() {
            log::debug!("Ignoring click on unknown node '{}'", node_id);
            return ChangeOutcome::default();
        }
        view.select_node(node_id);
        ChangeOutcome::selection()
    }

    fn apply_to_mirror(&mut self, change: &NodeChange) {
        if let NodeChange::Remove { id } = change {
            self.nodes.retain(|n| &n.id != id);
            return;
        }
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == change.id()) else {
            log::debug!("Widget change for unmirrored node '{}'", change.id());
            return;
        };

        match change {
            NodeChange::Position {
                position, dragging, ..
            } => {
                if let Some(position) = position {
                    node.position = *position;
                }
                node.dragging = dragging.unwrap_or(false);
            }
            NodeChange::Dimensions {
                dimensions: Some(d),
                ..
            } => {
                node.width = Some(d.width);
                node.height = Some(d.height);
            }
            NodeChange::Select { selected, .. } => node.selected = *selected,
            NodeChange::Dimensions { dimensions: None, .. } | NodeChange::Remove { .. } => {}
        }
    }

    fn mirror_position(&self, id: &str) -> Option<Position> {
        self.nodes.iter().find(|n| n.id == id).map(|n| n.position)
    }

    fn snap(&self, position: Position) -> Position {
        match self.snap_grid {
            Some([x, y]) => position.snapped(x, y),
            None => position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::PanelMode;
    use flow_graph::{GraphBuilder, NodeType};

    fn setup() -> (ViewAdapter, GraphStore, ViewState) {
        let graph = GraphBuilder::new()
            .add_node("A", NodeType::Start, (0.0, 0.0))
            .add_node("B", NodeType::Task, (150.0, 0.0))
            .add_node("C", NodeType::End, (300.0, 0.0))
            .add_edge_with_id("A-B", "A", "B")
            .add_edge_with_id("B-C", "B", "C")
            .build();
        let mut store = GraphStore::new();
        store.set_nodes(graph.nodes);
        store.set_edges(graph.edges);

        let view = ViewState::new();
        let mut adapter = ViewAdapter::new(&EditorConfig::default());
        adapter.sync(&store, &view);
        (adapter, store, view)
    }

    fn drag(id: &str, x: f64, y: f64, dragging: bool) -> NodeChange {
        NodeChange::Position {
            id: id.to_string(),
            position: Some(Position::new(x, y)),
            dragging: Some(dragging),
        }
    }

    #[test]
    fn test_derived_shapes() {
        let (adapter, store, mut view) = setup();
        view.select_node("B");

        let nodes = adapter.derive_nodes(&store, &view);
        assert_eq!(nodes.len(), 3);
        assert!(nodes.iter().find(|n| n.id == "B").unwrap().selected);
        assert!(!nodes.iter().find(|n| n.id == "A").unwrap().selected);

        let edges = adapter.derive_edges(&store);
        assert!(edges.iter().all(|e| e.edge_type == "custom"));
        assert!(edges.iter().all(|e| e.style.stroke == "hsl(var(--edge-default))"));
    }

    #[test]
    fn test_drag_frames_do_not_touch_store() {
        let (mut adapter, mut store, mut view) = setup();

        let outcome = adapter.handle_node_changes(
            vec![drag("B", 160.0, 10.0, true), drag("B", 170.0, 20.0, true)],
            &mut store,
            &mut view,
        );

        assert!(!outcome.needs_sync());
        assert_eq!(store.find_node("B").unwrap().position, Position::new(150.0, 0.0));
        let mirrored = adapter.nodes().iter().find(|n| n.id == "B").unwrap();
        assert_eq!(mirrored.position, Position::new(170.0, 20.0));
        assert!(mirrored.dragging);
    }

    #[test]
    fn test_drag_end_commits_snapped_position() {
        let (mut adapter, mut store, mut view) = setup();

        adapter.handle_node_changes(vec![drag("B", 171.0, 22.0, true)], &mut store, &mut view);
        let outcome = adapter.handle_node_changes(
            vec![NodeChange::Position {
                id: "B".to_string(),
                position: None,
                dragging: Some(false),
            }],
            &mut store,
            &mut view,
        );

        assert!(outcome.graph_changed);
        assert_eq!(store.find_node("B").unwrap().position, Position::new(165.0, 15.0));
    }

    #[test]
    fn test_sync_keeps_position_of_node_being_dragged() {
        let (mut adapter, mut store, mut view) = setup();
        adapter.handle_node_changes(vec![drag("B", 400.0, 400.0, true)], &mut store, &mut view);

        view.select_node("A");
        adapter.sync(&store, &view);

        let b = adapter.nodes().iter().find(|n| n.id == "B").unwrap();
        assert_eq!(b.position, Position::new(400.0, 400.0));
    }

    #[test]
    fn test_remove_deletes_node_and_selection() {
        let (mut adapter, mut store, mut view) = setup();
        view.select_node("B");
        view.toggle_files();

        let outcome = adapter.handle_node_changes(
            vec![NodeChange::Remove { id: "B".to_string() }],
            &mut store,
            &mut view,
        );

        assert!(outcome.graph_changed && outcome.selection_changed);
        assert!(store.find_node("B").is_none());
        assert!(store.edges().is_empty());
        assert_eq!(view.selected_node(), None);
        assert_eq!(view.panel(), PanelMode::Closed);
    }

    #[test]
    fn test_multi_remove() {
        let (mut adapter, mut store, mut view) = setup();
        adapter.handle_node_changes(
            vec![
                NodeChange::Remove { id: "A".to_string() },
                NodeChange::Remove { id: "C".to_string() },
            ],
            &mut store,
            &mut view,
        );

        let ids: Vec<_> = store.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["B"]);
        assert!(store.edges().is_empty());
    }

    #[test]
    fn test_select_change_opens_params() {
        let (mut adapter, mut store, mut view) = setup();
        let outcome = adapter.handle_node_changes(
            vec![
                NodeChange::Select { id: "A".to_string(), selected: false },
                NodeChange::Select { id: "C".to_string(), selected: true },
            ],
            &mut store,
            &mut view,
        );

        assert!(outcome.selection_changed);
        assert_eq!(view.selected_node(), Some("C"));
        assert_eq!(view.panel(), PanelMode::Params);
    }

    #[test]
    fn test_dimensions_are_stored() {
        let (mut adapter, mut store, mut view) = setup();
        let outcome = adapter.handle_node_changes(
            vec![NodeChange::Dimensions {
                id: "A".to_string(),
                dimensions: Some(crate::widget::Dimensions {
                    width: 160.0,
                    height: 60.0,
                }),
            }],
            &mut store,
            &mut view,
        );

        assert!(outcome.graph_changed && !outcome.selection_changed);
        assert_eq!(store.find_node("A").unwrap().width, Some(160.0));
    }

    #[test]
    fn test_connect_creates_edge() {
        let (mut adapter, mut store, _view) = setup();

        let id = adapter
            .connect(Connection::new("A", "C").from_handle("true"), &mut store)
            .unwrap();

        let edge = store.find_edge(&id).unwrap();
        assert_eq!(edge.source, "A");
        assert_eq!(edge.target, "C");
        assert_eq!(edge.edge_type.as_deref(), Some("custom"));
        assert_eq!(edge.source_handle.as_deref(), Some("true"));
        assert!(id.starts_with("edge_"));
    }

    #[test]
    fn test_connect_without_target_is_ignored() {
        let (mut adapter, mut store, _view) = setup();
        let connection = Connection {
            target: None,
            ..Connection::new("A", "B")
        };

        assert!(adapter.connect(connection, &mut store).is_none());
        assert_eq!(store.edges().len(), 2);
    }

    #[test]
    fn test_edge_remove() {
        let (mut adapter, mut store, _view) = setup();
        let outcome = adapter.handle_edge_changes(
            vec![
                EdgeChange::Select { id: "B-C".to_string(), selected: true },
                EdgeChange::Remove { id: "A-B".to_string() },
            ],
            &mut store,
        );

        assert!(outcome.graph_changed);
        assert!(store.find_edge("A-B").is_none());
        assert!(adapter.edges().iter().find(|e| e.id == "B-C").unwrap().selected);
    }

    #[test]
    fn test_clicks() {
        let (mut adapter, store, mut view) = setup();

        assert!(adapter.node_click("B", &store, &mut view).selection_changed);
        assert_eq!(view.panel(), PanelMode::Params);

        assert!(!adapter.node_click("missing", &store, &mut view).needs_sync());
        assert_eq!(view.selected_node(), Some("B"));

        assert!(adapter.pane_click(&mut view).selection_changed);
        assert_eq!(view.selected_node(), None);
        assert_eq!(view.panel(), PanelMode::Closed);
        assert!(!adapter.pane_click(&mut view).needs_sync());
    }
}
