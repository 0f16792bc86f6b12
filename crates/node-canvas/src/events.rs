//! Notifications emitted by the canvas
//!
//! Events are sent from the controller to the host (or any consumer) to
//! report finished moves and selection intents. The host decides how to act
//! on selection intents; the canvas never changes selection on its own after
//! a click.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Trait for sending canvas events
///
/// This abstracts over the transport mechanism (UI bus, channel, etc.)
/// allowing the controller to be used in different contexts.
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be sent (e.g., channel closed)
    fn send(&self, event: CanvasEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// Events emitted by the canvas controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CanvasEvent {
    /// A node was moved by a drag gesture
    #[serde(rename_all = "camelCase")]
    Moved { node_name: String, position: Position },

    /// The node should be selected
    #[serde(rename_all = "camelCase")]
    NodeSelected { node_name: String },

    /// The node should be deselected
    #[serde(rename_all = "camelCase")]
    DeselectNode { node_name: String },

    /// Every node should be deselected
    DeselectAllNodes,

    /// A node's endpoint set was replaced
    #[serde(rename_all = "camelCase")]
    EndpointsRebuilt {
        node_name: String,
        type_name: String,
        endpoint_count: usize,
    },
}

impl CanvasEvent {
    pub fn moved(node_name: &str, position: Position) -> Self {
        Self::Moved {
            node_name: node_name.to_string(),
            position,
        }
    }

    pub fn node_selected(node_name: &str) -> Self {
        Self::NodeSelected {
            node_name: node_name.to_string(),
        }
    }

    pub fn deselect_node(node_name: &str) -> Self {
        Self::DeselectNode {
            node_name: node_name.to_string(),
        }
    }
}

/// A no-op event sink that discards all events
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: CanvasEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: Mutex<Vec<CanvasEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<CanvasEvent> {
        self.events.lock().clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: CanvasEvent) -> Result<(), EventError> {
        self.events.lock().push(event);
        Ok(())
    }
}
