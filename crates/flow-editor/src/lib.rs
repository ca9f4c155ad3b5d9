//! Flow Editor - selection, side panel and widget sync on top of `flow-graph`
//!
//! An [`EditorSession`] is one open editor. It routes every user gesture
//! through the graph store and keeps the rendering widget in step:
//!
//! - `ViewState`: the selected node and which side panel is open
//! - `ViewAdapter`: derives widget nodes/edges from the store and turns
//!   widget change events back into store mutations
//! - `WidgetSink`: where fresh widget state is pushed after each change
//! - `NodeParamsForm`: validated edits of a node's label and typed config
//! - `FlowRepository`: where flows are loaded from and saved to
//!
//! # Example
//!
//! ```
//! use flow_editor::{EditorSession, NodeChange, PanelMode};
//! use flow_graph::{NodeType, Position};
//!
//! let mut session = EditorSession::headless();
//! let task = session.add_node(NodeType::Task, (0.0, 0.0));
//!
//! session.node_click(&task);
//! assert_eq!(session.panel(), PanelMode::Params);
//!
//! session.apply_node_changes(vec![NodeChange::Position {
//!     id: task.clone(),
//!     position: Some(Position::new(31.0, 59.0)),
//!     dragging: Some(false),
//! }]);
//! assert_eq!(
//!     session.store().find_node(&task).unwrap().position,
//!     Position::new(30.0, 60.0)
//! );
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod events;
pub mod forms;
pub mod repository;
pub mod session;
pub mod view;
pub mod widget;

// Re-export key types
pub use adapter::{ChangeOutcome, ViewAdapter};
pub use config::EditorConfig;
pub use error::{EditorError, Result};
pub use events::{NullWidgetSink, SinkError, VecWidgetSink, WidgetSink, WidgetUpdate};
pub use forms::{FormError, NodeParamsForm};
pub use repository::{FlowRepository, FlowSummary, LocalFlowRepository};
pub use session::EditorSession;
pub use view::{PanelMode, ViewState};
pub use widget::{
    Connection, Dimensions, EdgeChange, EdgeStyle, NodeChange, WidgetEdge, WidgetNode,
};
