//! Node Canvas - interaction engine for a node-graph editor canvas
//!
//! This crate implements the part of a visual workflow editor that sits
//! between pointer events and the workflow document:
//!
//! - Endpoint layout: where each input/output connector sits on a node
//! - Endpoint registry: rebuilding a node's connectors when its type changes
//! - Drag sessions: moving one node or the whole selection
//! - Undo history: move commands batched into transactions
//! - Click and touch selection intents
//!
//! # Architecture
//!
//! Rendering, the workflow document and selection state are owned by the
//! host and reached through traits:
//!
//! - `ConnectorBackend`: the connector-drawing layer
//! - `WorkflowStore`: the canonical node positions
//! - `UiState`: selection and transient action flags
//! - `NodeTypeCatalog`: node type descriptors
//! - `EventSink`: where move and selection events go
//!
//! In-memory implementations of each are provided for tests and headless
//! hosts.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use node_canvas::{CanvasConfig, CanvasController, HitRegion, HitTest};
//!
//! let mut canvas = CanvasController::new(
//!     CanvasConfig::default(),
//!     Arc::new(catalog),
//!     Arc::new(sink),
//!     store,
//!     ui,
//!     backend,
//! );
//! canvas.mount_node("If")?;
//! canvas.drag_start("If", &HitTest::new(HitRegion::Header), &[])?;
//! canvas.drag_stop()?;
//! ```

pub mod anchors;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod drag;
pub mod error;
pub mod events;
pub mod layout;
pub mod registry;
pub mod store;
pub mod types;
pub mod undo;

// Re-export key types
pub use backend::{ConnectorBackend, DragOptions, EndpointHandle, MemoryBackend};
pub use catalog::{MemoryCatalog, NodeTypeCatalog};
pub use config::CanvasConfig;
pub use controller::{CanvasController, Click};
pub use drag::{
    DragOutcome, DragSession, DragSessionState, HitRegion, HitTest, Modifier, PointerKind,
};
pub use error::{CanvasError, Result};
pub use events::{CanvasEvent, EventSink, NullEventSink, VecEventSink};
pub use layout::{layout_endpoints, EndpointDescriptor, EndpointRole};
pub use registry::{EndpointRegistry, RegisteredEndpoint};
pub use store::{MemoryUiState, MemoryWorkflow, NodeUpdate, UiState, WorkflowStore, DRAG_ACTIVE};
pub use types::{Direction, NodeRef, Position, TypeDescriptor};
pub use undo::{MoveCommand, Transaction, UndoStack};
