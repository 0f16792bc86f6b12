//! Precomputed anchor slots for endpoints
//!
//! Every supported port count has a fixed set of slots per direction, so
//! endpoints land in the same place no matter which group names a type
//! declares. Inputs sit on the left edge facing left, outputs on the right
//! edge facing right.

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, Result};
use crate::types::Direction;

/// Largest number of endpoints per direction the table covers
pub const MAX_PORTS: usize = 4;

/// Vertical offsets (0..1 of the node height) for each supported total
const SLOT_OFFSETS: [&[f64]; MAX_PORTS] = [
    &[0.5],
    &[0.3, 0.7],
    &[0.25, 0.5, 0.75],
    &[0.2, 0.4, 0.6, 0.8],
];

const INPUT_EDGE: f64 = 0.01;
const OUTPUT_EDGE: f64 = 0.99;

/// Edge of the node box an anchor sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Position of an endpoint on the node perimeter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub side: Side,
    /// Horizontal position, relative to node width
    pub x: f64,
    /// Vertical position, relative to node height
    pub y: f64,
    /// Orientation vector the connector leaves along
    pub orientation: (i8, i8),
}

impl Anchor {
    fn slot(direction: Direction, y: f64) -> Self {
        match direction {
            Direction::Input => Self {
                side: Side::Left,
                x: INPUT_EDGE,
                y,
                orientation: (-1, 0),
            },
            Direction::Output => Self {
                side: Side::Right,
                x: OUTPUT_EDGE,
                y,
                orientation: (1, 0),
            },
        }
    }
}

/// Look up the anchor for endpoint `index` of `total` in `direction`
///
/// A combination missing from the table is a programming error and is
/// reported rather than defaulted, since a guessed slot would overlap
/// another port.
pub fn anchor_for(direction: Direction, total: usize, index: usize) -> Result<Anchor> {
    let offsets = total
        .checked_sub(1)
        .and_then(|slot| SLOT_OFFSETS.get(slot))
        .ok_or_else(|| CanvasError::anchor_unavailable(direction, total, index))?;

    offsets
        .get(index)
        .map(|&y| Anchor::slot(direction, y))
        .ok_or_else(|| CanvasError::anchor_unavailable(direction, total, index))
}

/// All anchors for a given total, in index order
pub fn anchors_for(direction: Direction, total: usize) -> Result<Vec<Anchor>> {
    (0..total).map(|i| anchor_for(direction, total, i)).collect()
}
