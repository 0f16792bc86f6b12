//! Live endpoints per node
//!
//! The registry owns the endpoint set of every mounted node and mirrors it
//! into the connector layer. A node's set is always replaced as a whole:
//! whenever its type changes the old endpoints are removed and a freshly
//! laid out set is registered in their place.

use std::collections::HashMap;

use log::debug;

use crate::backend::{ConnectorBackend, EndpointHandle};
use crate::error::Result;
use crate::layout::{layout_endpoints, EndpointDescriptor, EndpointRole};
use crate::types::{NodeId, NodeRef, TypeDescriptor};

/// An endpoint together with its connector-layer handle
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredEndpoint {
    pub handle: EndpointHandle,
    pub descriptor: EndpointDescriptor,
}

/// Registry of the endpoints of every mounted node
#[derive(Debug, Default)]
pub struct EndpointRegistry {
    nodes: HashMap<NodeId, Vec<RegisteredEndpoint>>,
}

impl EndpointRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a node's endpoint set
    ///
    /// The layout is computed before anything is removed, so a failed
    /// layout leaves the previous set in place. Rebuilding with the same
    /// inputs produces the same uuids and anchors.
    pub fn rebuild<B: ConnectorBackend + ?Sized>(
        &mut self,
        node: &NodeRef,
        descriptor: &TypeDescriptor,
        read_only: bool,
        backend: &mut B,
    ) -> Result<&[RegisteredEndpoint]> {
        let layout = layout_endpoints(node, descriptor, read_only)?;

        backend.remove_endpoints(&node.id);
        let registered: Vec<RegisteredEndpoint> = layout
            .into_iter()
            .map(|descriptor| RegisteredEndpoint {
                handle: backend.add_endpoint(&node.id, &descriptor),
                descriptor,
            })
            .collect();

        debug!(
            "Rebuilt {} endpoint(s) for '{}' ({} v{})",
            registered.len(),
            node.name,
            descriptor.name,
            descriptor.version
        );

        let slot = self.nodes.entry(node.id.clone()).or_default();
        *slot = registered;
        Ok(slot.as_slice())
    }

    /// Endpoints of a node, empty if it is not mounted
    pub fn endpoints(&self, node_id: &str) -> &[RegisteredEndpoint] {
        self.nodes.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Find an endpoint by uuid and role
    pub fn find(&self, uuid: &str, role: EndpointRole) -> Option<&RegisteredEndpoint> {
        self.nodes
            .values()
            .flatten()
            .find(|e| e.descriptor.uuid == uuid && e.descriptor.role == role)
    }

    /// Find the endpoint behind a connector-layer handle
    pub fn by_handle(&self, handle: EndpointHandle) -> Option<&RegisteredEndpoint> {
        self.nodes.values().flatten().find(|e| e.handle == handle)
    }

    /// Unmount a node, removing its endpoints from the connector layer
    pub fn remove<B: ConnectorBackend + ?Sized>(
        &mut self,
        node_id: &str,
        backend: &mut B,
    ) -> usize {
        backend.remove_endpoints(node_id);
        self.nodes.remove(node_id).map(|e| e.len()).unwrap_or(0)
    }

    /// Whether a node has been mounted
    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// Number of mounted nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
