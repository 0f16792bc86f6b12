//! Workflow and UI state collaborators
//!
//! The canvas never owns node data or selection. It reads both through the
//! traits in this module and requests changes through narrow update calls.
//! `MemoryWorkflow` and `MemoryUiState` are plain in-memory implementations
//! for hosts without a store of their own, and for tests.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::events::CanvasEvent;
use crate::types::{NodeRef, Position};

/// UI action flag set while a drag gesture is (or just was) active
pub const DRAG_ACTIVE: &str = "dragActive";

/// Properties of a node the canvas may change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// A requested change to one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdate {
    pub name: String,
    pub properties: NodeProperties,
}

impl NodeUpdate {
    /// Update only the node's position
    pub fn position(name: &str, position: Position) -> Self {
        Self {
            name: name.to_string(),
            properties: NodeProperties {
                position: Some(position),
            },
        }
    }
}

/// Access to the nodes of the current workflow
pub trait WorkflowStore {
    /// Find a node by name
    fn get_node_by_name(&self, name: &str) -> Option<NodeRef>;

    /// Apply an update to a node; unknown names are ignored
    fn update_node_properties(&mut self, update: NodeUpdate);
}

/// Access to selection and transient UI action flags
pub trait UiState {
    /// Names of the selected nodes, in selection order
    fn selected_nodes(&self) -> Vec<String>;

    fn is_node_selected(&self, name: &str) -> bool;

    fn reset_selected_nodes(&mut self);

    fn add_active_action(&mut self, action: &str);

    fn is_action_active(&self, action: &str) -> bool;

    fn remove_active_action(&mut self, action: &str);
}

/// In-memory workflow keeping nodes in insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryWorkflow {
    nodes: Vec<NodeRef>,
}

impl MemoryWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a workflow from existing nodes
    pub fn from_nodes(nodes: impl IntoIterator<Item = NodeRef>) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
        }
    }

    /// Insert a node, replacing any node with the same name
    pub fn insert(&mut self, node: NodeRef) {
        match self.nodes.iter_mut().find(|n| n.name == node.name) {
            Some(existing) => *existing = node,
            None => self.nodes.push(node),
        }
    }

    /// Remove a node by name
    pub fn remove(&mut self, name: &str) -> Option<NodeRef> {
        let pos = self.nodes.iter().position(|n| n.name == name)?;
        Some(self.nodes.remove(pos))
    }

    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }
}

impl WorkflowStore for MemoryWorkflow {
    fn get_node_by_name(&self, name: &str) -> Option<NodeRef> {
        self.nodes.iter().find(|n| n.name == name).cloned()
    }

    fn update_node_properties(&mut self, update: NodeUpdate) {
        let Some(node) = self.nodes.iter_mut().find(|n| n.name == update.name) else {
            return;
        };
        if let Some(position) = update.properties.position {
            node.position = position;
        }
    }
}

/// In-memory selection and action flags
#[derive(Debug, Clone, Default)]
pub struct MemoryUiState {
    selected: Vec<String>,
    actions: HashSet<String>,
}

impl MemoryUiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the selection
    pub fn select_node(&mut self, name: &str) {
        if !self.is_node_selected(name) {
            self.selected.push(name.to_string());
        }
    }

    /// Remove a node from the selection
    pub fn deselect_node(&mut self, name: &str) {
        self.selected.retain(|n| n != name);
    }

    /// Apply a selection intent emitted by the canvas
    ///
    /// Events that do not concern selection are ignored.
    pub fn apply_event(&mut self, event: &CanvasEvent) {
        match event {
            CanvasEvent::NodeSelected { node_name } => self.select_node(node_name),
            CanvasEvent::DeselectNode { node_name } => self.deselect_node(node_name),
            CanvasEvent::DeselectAllNodes => self.selected.clear(),
            _ => {}
        }
    }
}

impl UiState for MemoryUiState {
    fn selected_nodes(&self) -> Vec<String> {
        self.selected.clone()
    }

    fn is_node_selected(&self, name: &str) -> bool {
        self.selected.iter().any(|n| n == name)
    }

    fn reset_selected_nodes(&mut self) {
        self.selected.clear();
    }

    fn add_active_action(&mut self, action: &str) {
        self.actions.insert(action.to_string());
    }

    fn is_action_active(&self, action: &str) -> bool {
        self.actions.contains(action)
    }

    fn remove_active_action(&mut self, action: &str) {
        self.actions.remove(action);
    }
}
