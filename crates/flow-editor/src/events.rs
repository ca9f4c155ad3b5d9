//! Widget state pushes
//!
//! After every change the adapter re-derives the widget's nodes and edges
//! and hands them to a [`WidgetSink`]. The trait abstracts over the
//! transport (webview bridge, channel, test collector).

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::widget::{WidgetEdge, WidgetNode};

/// Full widget state after a change
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WidgetUpdate {
    pub nodes: Vec<WidgetNode>,
    pub edges: Vec<WidgetEdge>,
}

/// Receiver of widget state pushes
pub trait WidgetSink: Send + Sync {
    /// Push new widget state
    ///
    /// Returns an error if the update could not be delivered (e.g., the
    /// widget is gone)
    fn push(&self, update: WidgetUpdate) -> Result<(), SinkError>;
}

/// Error when pushing widget state fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Widget sink error: {message}")]
pub struct SinkError {
    pub message: String,
}

impl SinkError {
    pub fn disconnected() -> Self {
        Self {
            message: "Widget disconnected".to_string(),
        }
    }
}

/// A sink that discards all updates
pub struct NullWidgetSink;

impl WidgetSink for NullWidgetSink {
    fn push(&self, _update: WidgetUpdate) -> Result<(), SinkError> {
        Ok(())
    }
}

/// A sink that collects every update
///
/// Useful for testing to verify what the widget was shown.
#[derive(Default)]
pub struct VecWidgetSink {
    updates: Mutex<Vec<WidgetUpdate>>,
}

impl VecWidgetSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Get all collected updates
    pub fn updates(&self) -> Vec<WidgetUpdate> {
        self.updates.lock().clone()
    }

    /// The most recent update, if any
    pub fn last(&self) -> Option<WidgetUpdate> {
        self.updates.lock().last().cloned()
    }

    /// Clear all collected updates
    pub fn clear(&self) {
        self.updates.lock().clear();
    }
}

impl WidgetSink for VecWidgetSink {
    fn push(&self, update: WidgetUpdate) -> Result<(), SinkError> {
        self.updates.lock().push(update);
        Ok(())
    }
}
