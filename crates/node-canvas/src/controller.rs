//! Canvas controller
//!
//! Composes endpoint layout, drag handling and undo history for every node
//! on a canvas. The host forwards pointer events (drag start/stop, clicks,
//! touch end) to the controller; the controller talks to the workflow
//! store, the UI state and the connector layer through their traits and
//! reports moves and selection intents as `CanvasEvent`s.
//!
//! # Example
//!
//! ```ignore
//! let mut canvas = CanvasController::new(
//!     CanvasConfig::default(),
//!     Arc::new(catalog),
//!     Arc::new(NullEventSink),
//!     MemoryWorkflow::from_nodes(nodes),
//!     MemoryUiState::new(),
//!     MemoryBackend::new(),
//! );
//! canvas.mount_node("If")?;
//! canvas.drag_start("If", &HitTest::new(HitRegion::Header), &[])?;
//! canvas.drag_stop()?;
//! canvas.undo()?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};

use crate::backend::{ConnectorBackend, DragOptions};
use crate::catalog::{resolve_node_type, NodeTypeCatalog};
use crate::config::CanvasConfig;
use crate::drag::{DragSession, HitTest, Modifier, PointerKind};
use crate::error::{CanvasError, Result};
use crate::events::{CanvasEvent, EventSink};
use crate::registry::EndpointRegistry;
use crate::store::{NodeUpdate, UiState, WorkflowStore, DRAG_ACTIVE};
use crate::types::NodeId;
use crate::undo::{MoveCommand, UndoStack};

/// A click or tap on a node
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub hit: HitTest,
    pub modifiers: Vec<Modifier>,
    pub pointer: PointerKind,
}

impl Click {
    /// A plain mouse click on the given target
    pub fn new(hit: HitTest) -> Self {
        Self {
            hit,
            modifiers: Vec::new(),
            pointer: PointerKind::Mouse,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn touch(mut self) -> Self {
        self.pointer = PointerKind::Touch;
        self
    }
}

/// Interaction engine for one canvas
pub struct CanvasController<S, U, B> {
    config: CanvasConfig,
    catalog: Arc<dyn NodeTypeCatalog>,
    events: Arc<dyn EventSink>,
    store: S,
    ui: U,
    backend: B,
    registry: EndpointRegistry,
    /// Node id per mounted node name
    mounted: HashMap<String, NodeId>,
    drag: DragSession,
    history: UndoStack,
    read_only: bool,
}

impl<S, U, B> CanvasController<S, U, B>
where
    S: WorkflowStore,
    U: UiState,
    B: ConnectorBackend,
{
    pub fn new(
        config: CanvasConfig,
        catalog: Arc<dyn NodeTypeCatalog>,
        events: Arc<dyn EventSink>,
        store: S,
        ui: U,
        backend: B,
    ) -> Self {
        let history = UndoStack::new(config.undo_limit);
        Self {
            config,
            catalog,
            events,
            store,
            ui,
            backend,
            registry: EndpointRegistry::new(),
            mounted: HashMap::new(),
            drag: DragSession::new(),
            history,
            read_only: false,
        }
    }

    /// Put the whole canvas in or out of read-only mode
    ///
    /// Affects endpoints built afterwards and drags started afterwards.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn drag_session(&self) -> &DragSession {
        &self.drag
    }

    /// Build a node's endpoints and make it draggable
    ///
    /// Safe to call again whenever the node's type changes. A node that is
    /// not (yet) in the store is skipped; it gets mounted once the store
    /// catches up. Returns the number of endpoints registered.
    pub fn mount_node(&mut self, name: &str) -> Result<usize> {
        let Some(node) = self.store.get_node_by_name(name) else {
            debug!("Skipping mount of '{}': not in workflow yet", name);
            return Ok(0);
        };

        let descriptor =
            resolve_node_type(self.catalog.as_ref(), &node, &self.config.fallback_node_type);
        let read_only = self.read_only || node.read_only;
        let count = self
            .registry
            .rebuild(&node, &descriptor, read_only, &mut self.backend)?
            .len();

        let options = DragOptions {
            grid: (self.config.grid_size, self.config.grid_size),
            handles: self.config.drag_handles.clone(),
        };
        self.backend.draggable(&node.id, &options);
        self.mounted.insert(node.name.clone(), node.id.clone());

        self.emit(CanvasEvent::EndpointsRebuilt {
            node_name: node.name.clone(),
            type_name: descriptor.name,
            endpoint_count: count,
        });
        Ok(count)
    }

    /// Remove a node's endpoints and drag handling from the canvas
    ///
    /// Works after the node has already left the store. Returns the number
    /// of endpoints removed.
    pub fn unmount_node(&mut self, name: &str) -> usize {
        let node_id = match self.mounted.remove(name) {
            Some(id) => id,
            None => match self.store.get_node_by_name(name) {
                Some(node) => node.id,
                None => return 0,
            },
        };
        self.backend.remove_draggable(&node_id);
        let removed = self.registry.remove(&node_id, &mut self.backend);
        debug!("Unmounted '{}' ({} endpoint(s))", name, removed);
        removed
    }

    /// Pointer went down on a node and started moving
    ///
    /// Returns whether a drag session started. Gestures outside the drag
    /// handles, on read-only nodes, or on unknown nodes have no effect.
    pub fn drag_start(
        &mut self,
        name: &str,
        hit: &HitTest,
        modifiers: &[Modifier],
    ) -> Result<bool> {
        if let Some(state) = self.drag.state() {
            return Err(CanvasError::DragInProgress(state.active_node.clone()));
        }
        if !self.config.is_drag_handle(hit.region) {
            return Ok(false);
        }
        let Some(node) = self.store.get_node_by_name(name) else {
            return Ok(false);
        };
        if self.read_only || node.read_only {
            debug!("Refusing drag of '{}': read-only", name);
            return Ok(false);
        }

        let is_selected = self.ui.is_node_selected(name);
        if !is_selected && !self.config.is_multi_select(modifiers) {
            self.backend.clear_drag_selection();
            self.ui.reset_selected_nodes();
        }
        self.ui.add_active_action(DRAG_ACTIVE);

        if node.type_name == self.config.sticky_node_type && !is_selected {
            self.emit(CanvasEvent::node_selected(name));
        }

        let selection = self
            .ui
            .selected_nodes()
            .iter()
            .filter_map(|n| self.store.get_node_by_name(n))
            .collect();
        self.drag.begin(&node, selection)?;

        debug!(
            "Drag started on '{}' moving {} node(s)",
            name,
            self.drag.state().map(|s| s.move_set.len()).unwrap_or(0)
        );
        Ok(true)
    }

    /// Pointer released after a drag
    ///
    /// Records one move command per node that actually changed position,
    /// batching them into one undo step when several nodes took part.
    /// Returns the number of nodes moved.
    ///
    /// When the drag action flag was cleared in the meantime, the gesture
    /// is treated like a cancel: elements go back to their start positions
    /// and nothing is recorded.
    pub fn drag_stop(&mut self) -> Result<usize> {
        if self.drag.is_dragging() && !self.ui.is_action_active(DRAG_ACTIVE) {
            debug!("Drag ended without an active drag action, nothing recorded");
            self.cancel_drag();
            return Ok(0);
        }
        let backend = &self.backend;
        let Some(outcome) = self.drag.finish(|node| backend.element_position(&node.id)) else {
            return Ok(0);
        };
        for name in &outcome.skipped {
            warn!("No element for '{}' after drag, leaving it in place", name);
        }

        if outcome.is_batch() {
            self.history.start_transaction()?;
        }
        for command in &outcome.moves {
            self.apply_move(command);
        }
        if outcome.is_batch() {
            self.history.commit_transaction()?;
        }

        debug!(
            "Drag ended: {} of {} node(s) moved",
            outcome.moves.len(),
            outcome.move_set_len
        );
        Ok(outcome.moves.len())
    }

    /// Abandon the running drag and put every node back where it started
    ///
    /// Nothing is recorded and no events are emitted. Returns whether a
    /// drag was running.
    pub fn cancel_drag(&mut self) -> bool {
        let Some(state) = self.drag.cancel() else {
            return false;
        };
        for node in &state.move_set {
            let start = state
                .start_positions
                .get(&node.name)
                .copied()
                .unwrap_or(node.position);
            self.backend.set_element_position(&node.id, start);
        }
        debug!("Drag on '{}' cancelled", state.active_node);
        true
    }

    /// A click (or tap) on a node, once any drag has resolved
    ///
    /// The click right after a drag only clears the drag flag. Otherwise a
    /// plain click deselects everything else and toggles this node, and a
    /// multi-select click only toggles this node.
    pub fn click(&mut self, name: &str, click: &Click) {
        if click.hit.suppresses_selection(&self.config.no_select_tags) {
            return;
        }
        if click.pointer == PointerKind::Touch {
            return;
        }
        if self.ui.is_action_active(DRAG_ACTIVE) {
            self.ui.remove_active_action(DRAG_ACTIVE);
            return;
        }

        let was_selected = self.ui.is_node_selected(name);
        if !self.config.is_multi_select(&click.modifiers) {
            self.emit(CanvasEvent::DeselectAllNodes);
        }
        if was_selected {
            self.emit(CanvasEvent::deselect_node(name));
        } else {
            self.emit(CanvasEvent::node_selected(name));
        }
    }

    /// A touch ended on a node
    pub fn touch_end(&mut self) {
        if self.ui.is_action_active(DRAG_ACTIVE) {
            self.ui.remove_active_action(DRAG_ACTIVE);
        }
    }

    /// Undo the last move step; returns whether anything was undone
    pub fn undo(&mut self) -> Result<bool> {
        let names = match self.history.undo(&mut self.store)? {
            Some(transaction) => command_names(transaction.commands()),
            None => return Ok(false),
        };
        self.sync_elements(&names);
        Ok(true)
    }

    /// Redo the last undone move step; returns whether anything was redone
    pub fn redo(&mut self) -> Result<bool> {
        let names = match self.history.redo(&mut self.store)? {
            Some(transaction) => command_names(transaction.commands()),
            None => return Ok(false),
        };
        self.sync_elements(&names);
        Ok(true)
    }

    fn apply_move(&mut self, command: &MoveCommand) {
        self.history.push_command(command.clone());
        self.store.update_node_properties(NodeUpdate::position(
            command.node_name(),
            command.new_position(),
        ));
        self.emit(CanvasEvent::moved(command.node_name(), command.new_position()));
    }

    /// Move node elements to the positions now held by the store
    fn sync_elements(&mut self, names: &[String]) {
        for name in names {
            if let Some(node) = self.store.get_node_by_name(name) {
                self.backend.set_element_position(&node.id, node.position);
            }
        }
    }

    fn emit(&self, event: CanvasEvent) {
        if let Err(e) = self.events.send(event) {
            warn!("Failed to send canvas event: {}", e);
        }
    }
}

fn command_names(commands: &[MoveCommand]) -> Vec<String> {
    commands.iter().map(|c| c.node_name().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::catalog::MemoryCatalog;
    use crate::drag::HitRegion;
    use crate::events::{EventError, VecEventSink};
    use crate::layout::EndpointRole;
    use crate::store::{MemoryUiState, MemoryWorkflow};
    use crate::types::{NodeRef, Position, TypeDescriptor};

    type TestCanvas = CanvasController<MemoryWorkflow, MemoryUiState, MemoryBackend>;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn catalog() -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new();
        catalog.register(TypeDescriptor::no_op("core.noOp"));
        catalog.register(
            TypeDescriptor::new("core.if", 1)
                .with_inputs(["main"])
                .with_outputs(["main", "main"])
                .with_output_names(["true", "false"]),
        );
        catalog.register(TypeDescriptor::new("core.stickyNote", 1));
        catalog
    }

    fn canvas_with(nodes: Vec<NodeRef>) -> (TestCanvas, Arc<VecEventSink>) {
        init_logging();
        let sink = Arc::new(VecEventSink::new());
        let mut canvas = CanvasController::new(
            CanvasConfig::default(),
            Arc::new(catalog()),
            sink.clone(),
            MemoryWorkflow::from_nodes(nodes.clone()),
            MemoryUiState::new(),
            MemoryBackend::new(),
        );
        for node in &nodes {
            canvas.backend_mut().set_element_position(&node.id, node.position);
            canvas.mount_node(&node.name).unwrap();
        }
        sink.clear();
        (canvas, sink)
    }

    fn three_nodes() -> Vec<NodeRef> {
        vec![
            NodeRef::new("id-a", "A", "core.noOp", Position::new(100, 100)),
            NodeRef::new("id-b", "B", "core.if", Position::new(300, 100)),
            NodeRef::new("id-c", "C", "core.noOp", Position::new(500, 100)),
        ]
    }

    fn header() -> HitTest {
        HitTest::new(HitRegion::Header)
    }

    fn pos(canvas: &TestCanvas, name: &str) -> Position {
        canvas.store().get_node_by_name(name).unwrap().position
    }

    /// Simulate the renderer moving a node element during a drag
    fn drag_to(canvas: &mut TestCanvas, id: &str, to: Position) {
        canvas.backend_mut().set_element_position(id, to);
    }

    #[test]
    fn test_mount_builds_endpoints_and_draggable() {
        let (canvas, _) = canvas_with(three_nodes());

        // core.if: one input, two outputs with quick-adds
        let endpoints = canvas.registry().endpoints("id-b");
        assert_eq!(endpoints.len(), 5);
        assert_eq!(canvas.backend().endpoints("id-b").len(), 5);

        let options = canvas.backend().drag_options("id-b").unwrap();
        assert_eq!(options.grid, (20, 20));
        assert!(options.handles.contains(&HitRegion::Header));
    }

    #[test]
    fn test_mount_is_idempotent() {
        let (mut canvas, sink) = canvas_with(three_nodes());
        let before: Vec<_> = canvas
            .registry()
            .endpoints("id-b")
            .iter()
            .map(|e| (e.descriptor.uuid.clone(), e.descriptor.anchor))
            .collect();

        assert_eq!(canvas.mount_node("B").unwrap(), 5);
        let after: Vec<_> = canvas
            .registry()
            .endpoints("id-b")
            .iter()
            .map(|e| (e.descriptor.uuid.clone(), e.descriptor.anchor))
            .collect();
        assert_eq!(before, after);
        assert_eq!(canvas.backend().endpoints("id-b").len(), 5);
        assert!(matches!(
            sink.events()[0],
            CanvasEvent::EndpointsRebuilt { endpoint_count: 5, .. }
        ));
    }

    #[test]
    fn test_unmount_by_name() {
        let (mut canvas, _) = canvas_with(three_nodes());

        // Node already deleted from the workflow
        canvas.store_mut().remove("B");
        assert_eq!(canvas.unmount_node("B"), 5);
        assert!(!canvas.registry().contains("id-b"));
        assert!(canvas.backend().endpoints("id-b").is_empty());
        assert!(canvas.backend().drag_options("id-b").is_none());

        assert_eq!(canvas.unmount_node("B"), 0);
        assert_eq!(canvas.unmount_node("A"), 3);
        assert!(canvas.backend().drag_options("id-a").is_none());
        assert!(canvas.backend().drag_options("id-c").is_some());
    }

    #[test]
    fn test_unknown_type_uses_fallback() {
        let (mut canvas, sink) = canvas_with(Vec::new());
        canvas.store_mut().insert(NodeRef::new(
            "id-x",
            "X",
            "vendor.gone",
            Position::new(0, 0),
        ));

        assert_eq!(canvas.mount_node("X").unwrap(), 3);
        match &sink.events()[0] {
            CanvasEvent::EndpointsRebuilt { type_name, .. } => assert_eq!(type_name, "core.noOp"),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_mount_before_store_is_skipped() {
        let (mut canvas, sink) = canvas_with(Vec::new());
        assert_eq!(canvas.mount_node("Ghost").unwrap(), 0);
        assert_eq!(canvas.registry().node_count(), 0);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_read_only_canvas_mount() {
        let (mut canvas, _) = canvas_with(three_nodes());
        canvas.set_read_only(true);
        canvas.mount_node("B").unwrap();

        let endpoints = canvas.registry().endpoints("id-b");
        assert_eq!(endpoints.len(), 3);
        assert!(endpoints.iter().all(|e| !e.descriptor.enabled));
        assert!(endpoints
            .iter()
            .all(|e| e.descriptor.role == EndpointRole::Port));
    }

    #[test]
    fn test_single_unselected_node_move_and_undo() {
        let (mut canvas, sink) = canvas_with(three_nodes());

        assert!(canvas.drag_start("A", &header(), &[]).unwrap());
        drag_to(&mut canvas, "id-a", Position::new(140, 110));
        assert_eq!(canvas.drag_stop().unwrap(), 1);

        assert_eq!(pos(&canvas, "A"), Position::new(140, 110));
        let transaction = canvas.history().last_transaction().unwrap();
        assert_eq!(
            transaction.commands(),
            &[MoveCommand::new("A", Position::new(100, 100), Position::new(140, 110))]
        );
        assert_eq!(
            sink.events(),
            vec![CanvasEvent::moved("A", Position::new(140, 110))]
        );

        assert!(canvas.undo().unwrap());
        assert_eq!(pos(&canvas, "A"), Position::new(100, 100));
        assert_eq!(
            canvas.backend().element_position("id-a"),
            Some(Position::new(100, 100))
        );

        assert!(canvas.redo().unwrap());
        assert_eq!(pos(&canvas, "A"), Position::new(140, 110));
    }

    #[test]
    fn test_multi_node_move_is_one_transaction() {
        let (mut canvas, _) = canvas_with(three_nodes());
        for name in ["A", "B", "C"] {
            canvas.ui_mut().select_node(name);
        }

        assert!(canvas.drag_start("B", &header(), &[]).unwrap());
        // Only A and B end up somewhere else
        drag_to(&mut canvas, "id-a", Position::new(120, 140));
        drag_to(&mut canvas, "id-b", Position::new(320, 140));
        assert_eq!(canvas.drag_stop().unwrap(), 2);

        assert_eq!(canvas.history().undo_len(), 1);
        let transaction = canvas.history().last_transaction().unwrap();
        let names: Vec<_> = transaction.commands().iter().map(|c| c.node_name()).collect();
        assert_eq!(names, vec!["A", "B"]);

        canvas.undo().unwrap();
        assert_eq!(pos(&canvas, "A"), Position::new(100, 100));
        assert_eq!(pos(&canvas, "B"), Position::new(300, 100));
        assert_eq!(pos(&canvas, "C"), Position::new(500, 100));
        assert!(!canvas.history().can_undo());
    }

    #[test]
    fn test_drag_without_movement_records_nothing() {
        let (mut canvas, sink) = canvas_with(three_nodes());
        canvas.ui_mut().select_node("A");
        canvas.ui_mut().select_node("C");

        canvas.drag_start("A", &header(), &[]).unwrap();
        assert_eq!(canvas.drag_stop().unwrap(), 0);
        assert_eq!(canvas.history().undo_len(), 0);
        assert!(!canvas.history().in_transaction());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_drag_on_unselected_node_resets_selection() {
        let (mut canvas, _) = canvas_with(three_nodes());
        canvas.ui_mut().select_node("A");
        canvas.ui_mut().select_node("C");

        canvas.drag_start("B", &header(), &[]).unwrap();
        assert!(canvas.ui().selected_nodes().is_empty());
        assert_eq!(canvas.backend().drag_selection_clears(), 1);

        let moved: Vec<_> = canvas
            .drag_session()
            .state()
            .unwrap()
            .move_set
            .iter()
            .map(|n| n.name.clone())
            .collect();
        assert_eq!(moved, vec!["B"]);
    }

    #[test]
    fn test_drag_with_modifier_keeps_selection() {
        let (mut canvas, _) = canvas_with(three_nodes());
        canvas.ui_mut().select_node("A");

        canvas.drag_start("B", &header(), &[Modifier::Ctrl]).unwrap();
        drag_to(&mut canvas, "id-a", Position::new(100, 200));
        drag_to(&mut canvas, "id-b", Position::new(300, 200));
        assert_eq!(canvas.drag_stop().unwrap(), 2);

        let transaction = canvas.history().last_transaction().unwrap();
        let names: Vec<_> = transaction.commands().iter().map(|c| c.node_name()).collect();
        // The dragged node joins the move set last
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_drag_refused_outside_handles_and_when_read_only() {
        let (mut canvas, _) = canvas_with(three_nodes());
        assert!(!canvas.drag_start("A", &HitTest::new(HitRegion::Body), &[]).unwrap());
        assert!(!canvas.drag_start("Ghost", &header(), &[]).unwrap());

        canvas.set_read_only(true);
        assert!(!canvas.drag_start("A", &header(), &[]).unwrap());
        assert!(!canvas.ui().is_action_active(DRAG_ACTIVE));
        assert!(!canvas.drag_session().is_dragging());

        canvas.set_read_only(false);
        canvas
            .store_mut()
            .insert(NodeRef::new("id-l", "Locked", "core.noOp", Position::new(0, 0)).read_only());
        assert!(!canvas.drag_start("Locked", &header(), &[]).unwrap());
    }

    #[test]
    fn test_drag_end_without_drag_action_records_nothing() {
        let (mut canvas, sink) = canvas_with(three_nodes());
        canvas.drag_start("A", &header(), &[]).unwrap();
        drag_to(&mut canvas, "id-a", Position::new(140, 100));
        canvas.ui_mut().remove_active_action(DRAG_ACTIVE);

        assert_eq!(canvas.drag_stop().unwrap(), 0);
        assert!(!canvas.drag_session().is_dragging());
        assert!(!canvas.history().can_undo());
        assert!(sink.events().is_empty());
        // Element and store agree again
        assert_eq!(pos(&canvas, "A"), Position::new(100, 100));
        assert_eq!(
            canvas.backend().element_position("id-a"),
            Some(Position::new(100, 100))
        );
    }

    #[test]
    fn test_second_drag_start_is_rejected() {
        let (mut canvas, _) = canvas_with(three_nodes());
        canvas.drag_start("A", &header(), &[]).unwrap();
        assert!(matches!(
            canvas.drag_start("B", &header(), &[]),
            Err(CanvasError::DragInProgress(_))
        ));
    }

    #[test]
    fn test_missing_element_skips_only_that_node() {
        let (mut canvas, _) = canvas_with(three_nodes());
        canvas.ui_mut().select_node("A");
        canvas.ui_mut().select_node("B");

        canvas.drag_start("A", &header(), &[]).unwrap();
        drag_to(&mut canvas, "id-a", Position::new(0, 0));
        canvas.backend_mut().remove_element("id-b");
        assert_eq!(canvas.drag_stop().unwrap(), 1);
        assert_eq!(pos(&canvas, "A"), Position::new(0, 0));
        assert_eq!(pos(&canvas, "B"), Position::new(300, 100));
    }

    #[test]
    fn test_cancel_restores_elements() {
        let (mut canvas, sink) = canvas_with(three_nodes());
        canvas.drag_start("A", &header(), &[]).unwrap();
        drag_to(&mut canvas, "id-a", Position::new(900, 900));

        assert!(canvas.cancel_drag());
        assert_eq!(
            canvas.backend().element_position("id-a"),
            Some(Position::new(100, 100))
        );
        assert_eq!(canvas.drag_stop().unwrap(), 0);
        assert_eq!(canvas.history().undo_len(), 0);
        assert!(sink.events().is_empty());
        assert!(!canvas.cancel_drag());
    }

    #[test]
    fn test_click_after_drag_only_clears_flag() {
        let (mut canvas, sink) = canvas_with(three_nodes());
        canvas.drag_start("A", &header(), &[]).unwrap();
        drag_to(&mut canvas, "id-a", Position::new(120, 100));
        canvas.drag_stop().unwrap();
        sink.clear();

        canvas.click("A", &Click::new(header()));
        assert!(!canvas.ui().is_action_active(DRAG_ACTIVE));
        assert!(sink.events().is_empty());

        canvas.click("A", &Click::new(header()));
        assert_eq!(
            sink.events(),
            vec![CanvasEvent::DeselectAllNodes, CanvasEvent::node_selected("A")]
        );
    }

    #[test]
    fn test_plain_click_selection_intents() {
        let (mut canvas, sink) = canvas_with(three_nodes());
        canvas.ui_mut().select_node("A");

        canvas.click("A", &Click::new(HitTest::new(HitRegion::Body)));
        assert_eq!(
            sink.events(),
            vec![CanvasEvent::DeselectAllNodes, CanvasEvent::deselect_node("A")]
        );

        sink.clear();
        canvas.click("B", &Click::new(HitTest::new(HitRegion::Body)));
        assert_eq!(
            sink.events(),
            vec![CanvasEvent::DeselectAllNodes, CanvasEvent::node_selected("B")]
        );

        sink.clear();
        canvas.click(
            "C",
            &Click::new(HitTest::new(HitRegion::Body)).with_modifier(Modifier::Meta),
        );
        assert_eq!(sink.events(), vec![CanvasEvent::node_selected("C")]);
    }

    #[test]
    fn test_click_intents_drive_memory_selection() {
        let (mut canvas, sink) = canvas_with(three_nodes());
        canvas.ui_mut().select_node("A");
        canvas.ui_mut().select_node("B");

        canvas.click("C", &Click::new(header()));
        for event in sink.events() {
            canvas.ui_mut().apply_event(&event);
        }
        assert_eq!(canvas.ui().selected_nodes(), vec!["C"]);
    }

    #[test]
    fn test_suppressed_and_touch_clicks() {
        let (mut canvas, sink) = canvas_with(three_nodes());

        canvas.click("A", &Click::new(HitTest::new(HitRegion::Body).non_selectable()));
        canvas.click(
            "A",
            &Click::new(HitTest::new(HitRegion::Body).with_tag("no-select-on-click")),
        );
        canvas.click("A", &Click::new(header()).touch());
        assert!(sink.events().is_empty());

        canvas.ui_mut().add_active_action(DRAG_ACTIVE);
        canvas.touch_end();
        assert!(!canvas.ui().is_action_active(DRAG_ACTIVE));
    }

    #[test]
    fn test_sticky_note_selected_on_drag_start() {
        let (mut canvas, sink) = canvas_with(vec![NodeRef::new(
            "id-s",
            "Note",
            "core.stickyNote",
            Position::new(0, 0),
        )]);
        canvas.drag_start("Note", &header(), &[]).unwrap();
        assert_eq!(sink.events(), vec![CanvasEvent::node_selected("Note")]);
    }

    struct ClosedSink;

    impl EventSink for ClosedSink {
        fn send(&self, _event: CanvasEvent) -> std::result::Result<(), EventError> {
            Err(EventError::channel_closed())
        }
    }

    #[test]
    fn test_sink_failure_does_not_abort_batch() {
        init_logging();
        let nodes = three_nodes();
        let mut canvas = CanvasController::new(
            CanvasConfig::default(),
            Arc::new(catalog()),
            Arc::new(ClosedSink),
            MemoryWorkflow::from_nodes(nodes.clone()),
            MemoryUiState::new(),
            MemoryBackend::new(),
        );
        for node in &nodes {
            canvas.backend_mut().set_element_position(&node.id, node.position);
        }
        canvas.ui_mut().select_node("A");
        canvas.ui_mut().select_node("C");

        canvas.drag_start("A", &header(), &[]).unwrap();
        canvas.backend_mut().set_element_position("id-a", Position::new(0, 0));
        canvas.backend_mut().set_element_position("id-c", Position::new(0, 40));
        assert_eq!(canvas.drag_stop().unwrap(), 2);
        assert_eq!(canvas.history().last_transaction().unwrap().len(), 2);
    }
}
