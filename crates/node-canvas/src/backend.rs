//! Connector-drawing collaborator
//!
//! The library that paints nodes and connection lines is external. The
//! canvas registers endpoints with it, enables dragging on node elements,
//! and reads back where the renderer placed an element after a drag.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::drag::HitRegion;
use crate::layout::EndpointDescriptor;
use crate::types::{NodeId, Position};

/// Handle to an endpoint registered with the connector layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointHandle(pub u64);

/// Options used when making a node element draggable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragOptions {
    /// Snap grid (x, y)
    pub grid: (i64, i64),
    /// Regions of the node a drag may start from
    pub handles: Vec<HitRegion>,
}

/// Operations the canvas needs from the connector-drawing layer
pub trait ConnectorBackend {
    /// Register an endpoint on a node element
    fn add_endpoint(&mut self, node_id: &str, endpoint: &EndpointDescriptor) -> EndpointHandle;

    /// Remove every endpoint registered on a node element
    fn remove_endpoints(&mut self, node_id: &str);

    /// Make a node element draggable
    fn draggable(&mut self, node_id: &str, options: &DragOptions);

    /// Stop a node element from being draggable
    fn remove_draggable(&mut self, node_id: &str);

    /// Drop the renderer's own multi-drag selection
    fn clear_drag_selection(&mut self);

    /// Where the node element is currently drawn, if it exists
    fn element_position(&self, node_id: &str) -> Option<Position>;

    /// Move the node element without recording anything
    fn set_element_position(&mut self, node_id: &str, position: Position);
}

/// In-memory connector layer
///
/// Useful for testing and for headless hosts.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    endpoints: HashMap<NodeId, Vec<(EndpointHandle, EndpointDescriptor)>>,
    draggables: HashMap<NodeId, DragOptions>,
    elements: HashMap<NodeId, Position>,
    drag_selection_clears: usize,
    next_handle: u64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Endpoints currently registered on a node element
    pub fn endpoints(&self, node_id: &str) -> &[(EndpointHandle, EndpointDescriptor)] {
        self.endpoints.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drag options a node element was made draggable with
    pub fn drag_options(&self, node_id: &str) -> Option<&DragOptions> {
        self.draggables.get(node_id)
    }

    /// How many times the drag selection was cleared
    pub fn drag_selection_clears(&self) -> usize {
        self.drag_selection_clears
    }

    /// Remove a node element entirely
    pub fn remove_element(&mut self, node_id: &str) {
        self.elements.remove(node_id);
    }
}

impl ConnectorBackend for MemoryBackend {
    fn add_endpoint(&mut self, node_id: &str, endpoint: &EndpointDescriptor) -> EndpointHandle {
        self.next_handle += 1;
        let handle = EndpointHandle(self.next_handle);
        self.endpoints
            .entry(node_id.to_string())
            .or_default()
            .push((handle, endpoint.clone()));
        handle
    }

    fn remove_endpoints(&mut self, node_id: &str) {
        self.endpoints.remove(node_id);
    }

    fn draggable(&mut self, node_id: &str, options: &DragOptions) {
        self.draggables.insert(node_id.to_string(), options.clone());
    }

    fn remove_draggable(&mut self, node_id: &str) {
        self.draggables.remove(node_id);
    }

    fn clear_drag_selection(&mut self) {
        self.drag_selection_clears += 1;
    }

    fn element_position(&self, node_id: &str) -> Option<Position> {
        self.elements.get(node_id).copied()
    }

    fn set_element_position(&mut self, node_id: &str, position: Position) {
        self.elements.insert(node_id.to_string(), position);
    }
}
