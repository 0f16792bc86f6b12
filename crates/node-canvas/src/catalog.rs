//! Node type lookup
//!
//! The canvas resolves a node's port schema through a `NodeTypeCatalog`.
//! Unknown types are not an error at this level: they fall back to a
//! configured pass-through type so the node still renders.
//!
//! # Usage
//!
//! ```ignore
//! use node_canvas::{MemoryCatalog, TypeDescriptor};
//!
//! let mut catalog = MemoryCatalog::new();
//! catalog.register(
//!     TypeDescriptor::new("core.if", 1)
//!         .with_inputs(["main"])
//!         .with_outputs(["main", "main"]),
//! );
//! ```

use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::types::{NodeRef, TypeDescriptor};

/// Lookup of node type descriptors
pub trait NodeTypeCatalog: Send + Sync {
    /// Find a type by name and version; `None` for the version means the latest
    fn get_node_type(&self, type_name: &str, version: Option<u32>) -> Option<TypeDescriptor>;
}

/// Resolve the descriptor used to lay out a node
///
/// Tries the node's own type, then the fallback type from the catalog, then
/// the built-in pass-through descriptor.
pub fn resolve_node_type(
    catalog: &dyn NodeTypeCatalog,
    node: &NodeRef,
    fallback_type: &str,
) -> TypeDescriptor {
    if let Some(descriptor) = catalog.get_node_type(&node.type_name, Some(node.type_version)) {
        return descriptor;
    }
    debug!(
        "Unknown node type '{}' v{} for '{}', using '{}'",
        node.type_name, node.type_version, node.name, fallback_type
    );
    catalog
        .get_node_type(fallback_type, None)
        .unwrap_or_else(|| TypeDescriptor::no_op(fallback_type))
}

/// Registry of node types, keyed by name and version
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    entries: HashMap<String, BTreeMap<u32, TypeDescriptor>>,
}

impl MemoryCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, replacing an existing one with the same name and version
    pub fn register(&mut self, descriptor: TypeDescriptor) {
        self.entries
            .entry(descriptor.name.clone())
            .or_default()
            .insert(descriptor.version, descriptor);
    }
}

impl NodeTypeCatalog for MemoryCatalog {
    fn get_node_type(&self, type_name: &str, version: Option<u32>) -> Option<TypeDescriptor> {
        let versions = self.entries.get(type_name)?;
        match version {
            Some(v) => versions.get(&v).cloned(),
            None => versions.values().next_back().cloned(),
        }
    }
}
