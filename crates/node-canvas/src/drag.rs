//! Drag gesture state machine
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Dragging   (gesture starts on a node's drag handle)
//! Dragging -> Idle   (gesture ends: positions are diffed into move commands)
//! Dragging -> Idle   (cancel: nothing is diffed, start positions are handed back)
//! ```
//!
//! While dragging, the renderer moves the node elements directly; the
//! session only remembers which nodes take part and where they started.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, Result};
use crate::types::{NodeRef, Position};
use crate::undo::MoveCommand;

/// Region of a node box hit by the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitRegion {
    Header,
    Title,
    Subtitle,
    Body,
    Endpoint,
}

/// Keyboard modifier held during a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Ctrl,
    Meta,
    Shift,
    Alt,
}

/// Kind of pointer that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

/// Result of hit-testing a pointer event against a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitTest {
    pub region: HitRegion,
    /// The hit element opts out of click selection
    #[serde(default)]
    pub non_selectable: bool,
    /// Tags of the hit element and its ancestors
    #[serde(default)]
    pub tags: Vec<String>,
}

impl HitTest {
    pub fn new(region: HitRegion) -> Self {
        Self {
            region,
            non_selectable: false,
            tags: Vec::new(),
        }
    }

    /// Mark the hit element as not selectable
    pub fn non_selectable(mut self) -> Self {
        self.non_selectable = true;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Whether a click on this target must leave selection alone
    pub fn suppresses_selection(&self, excluded_tags: &[String]) -> bool {
        self.non_selectable || self.tags.iter().any(|t| excluded_tags.contains(t))
    }
}

/// Snapshot of one drag gesture
#[derive(Debug, Clone, PartialEq)]
pub struct DragSessionState {
    /// Name of the node under the pointer
    pub active_node: String,
    /// True while the session runs; false in the state handed back by `cancel`
    pub is_dragging: bool,
    /// Nodes moved by this gesture, in commit order
    pub move_set: Vec<NodeRef>,
    /// Stored positions at gesture start
    pub start_positions: HashMap<String, Position>,
}

/// Outcome of a finished drag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragOutcome {
    /// One command per node whose position changed, in move-set order
    pub moves: Vec<MoveCommand>,
    /// Nodes whose final position could not be read
    pub skipped: Vec<String>,
    /// Size of the move set
    pub move_set_len: usize,
}

impl DragOutcome {
    /// Whether the moves must be recorded as one batch
    pub fn is_batch(&self) -> bool {
        self.move_set_len > 1
    }
}

#[derive(Debug, Clone, Default)]
enum Phase {
    #[default]
    Idle,
    Dragging(DragSessionState),
}

/// State machine for one drag gesture at a time
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    phase: Phase,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging `dragged` together with `selection`
    ///
    /// The move set is the selection in order, with the dragged node
    /// appended when it is not part of it.
    pub fn begin(&mut self, dragged: &NodeRef, selection: Vec<NodeRef>) -> Result<()> {
        if let Phase::Dragging(state) = &self.phase {
            return Err(CanvasError::DragInProgress(state.active_node.clone()));
        }

        let mut move_set = selection;
        if !move_set.iter().any(|n| n.name == dragged.name) {
            move_set.push(dragged.clone());
        }
        let start_positions = move_set
            .iter()
            .map(|n| (n.name.clone(), n.position))
            .collect();

        self.phase = Phase::Dragging(DragSessionState {
            active_node: dragged.name.clone(),
            is_dragging: true,
            move_set,
            start_positions,
        });
        Ok(())
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    /// The running session, if any
    pub fn state(&self) -> Option<&DragSessionState> {
        match &self.phase {
            Phase::Dragging(state) => Some(state),
            Phase::Idle => None,
        }
    }

    /// End the gesture and diff every move-set node against its start position
    ///
    /// `final_position` reports where a node ended up; `None` skips that
    /// node without affecting the rest. Returns `None` when idle.
    pub fn finish<F>(&mut self, mut final_position: F) -> Option<DragOutcome>
    where
        F: FnMut(&NodeRef) -> Option<Position>,
    {
        let state = self.take()?;
        let mut outcome = DragOutcome {
            move_set_len: state.move_set.len(),
            ..DragOutcome::default()
        };

        for node in &state.move_set {
            let Some(new_position) = final_position(node) else {
                outcome.skipped.push(node.name.clone());
                continue;
            };
            let old_position = state
                .start_positions
                .get(&node.name)
                .copied()
                .unwrap_or(node.position);
            if old_position != new_position {
                outcome
                    .moves
                    .push(MoveCommand::new(node.name.clone(), old_position, new_position));
            }
        }

        Some(outcome)
    }

    /// Abandon the gesture, handing back the session so positions can be restored
    pub fn cancel(&mut self) -> Option<DragSessionState> {
        let mut state = self.take()?;
        state.is_dragging = false;
        Some(state)
    }

    fn take(&mut self) -> Option<DragSessionState> {
        match std::mem::take(&mut self.phase) {
            Phase::Dragging(state) => Some(state),
            Phase::Idle => None,
        }
    }
}
