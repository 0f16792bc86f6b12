//! Configuration for the canvas controller

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::drag::{HitRegion, Modifier};
use crate::error::Result;

/// Default values for configuration
pub mod defaults {
    /// Drag snap grid, in canvas units
    pub const GRID_SIZE: i64 = 20;
    /// Type used for nodes whose own type is unknown
    pub const FALLBACK_NODE_TYPE: &str = "core.noOp";
    /// Sticky notes get selected as soon as a drag starts
    pub const STICKY_NODE_TYPE: &str = "core.stickyNote";
    /// Maximum number of undo steps kept
    pub const UNDO_LIMIT: usize = 100;
    /// Hit-test tag marking targets that never toggle selection
    pub const NO_SELECT_TAG: &str = "no-select-on-click";
}

/// Canvas controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Drag snap grid size
    pub grid_size: i64,
    /// Node type used when a node's type is not in the catalog
    pub fallback_node_type: String,
    /// Node type treated as a sticky note
    pub sticky_node_type: String,
    /// Maximum number of undo steps kept
    pub undo_limit: usize,
    /// Node regions a drag may start from
    pub drag_handles: Vec<HitRegion>,
    /// Hit-test tags on which clicks do not change selection
    pub no_select_tags: Vec<String>,
    /// Modifiers that extend the selection instead of replacing it
    pub multi_select_modifiers: Vec<Modifier>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            grid_size: defaults::GRID_SIZE,
            fallback_node_type: defaults::FALLBACK_NODE_TYPE.to_string(),
            sticky_node_type: defaults::STICKY_NODE_TYPE.to_string(),
            undo_limit: defaults::UNDO_LIMIT,
            drag_handles: vec![HitRegion::Header, HitRegion::Title, HitRegion::Subtitle],
            no_select_tags: vec![defaults::NO_SELECT_TAG.to_string()],
            multi_select_modifiers: vec![Modifier::Ctrl, Modifier::Meta],
        }
    }
}

impl CanvasConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Whether a drag may start from the given region
    pub fn is_drag_handle(&self, region: HitRegion) -> bool {
        self.drag_handles.contains(&region)
    }

    /// Whether any held modifier extends the selection
    pub fn is_multi_select(&self, modifiers: &[Modifier]) -> bool {
        modifiers.iter().any(|m| self.multi_select_modifiers.contains(m))
    }
}
