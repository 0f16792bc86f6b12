//! Error types for the canvas engine

use thiserror::Error;

use crate::types::Direction;

/// Result type alias using CanvasError
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Errors that can occur in the canvas engine
#[derive(Debug, Error)]
pub enum CanvasError {
    /// No precomputed anchor slot exists for this port layout
    #[error("No anchor for {direction} endpoint {index} of {total}")]
    AnchorUnavailable {
        direction: Direction,
        total: usize,
        index: usize,
    },

    /// A transaction was started while another one is still open
    #[error("Undo transaction {0} is still open")]
    TransactionAlreadyOpen(String),

    /// A transaction was committed or aborted without being started
    #[error("No undo transaction is open")]
    NoOpenTransaction,

    /// A drag gesture started while another one is active
    #[error("Drag already in progress for node '{0}'")]
    DragInProgress(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CanvasError {
    /// Create an anchor lookup failure
    pub fn anchor_unavailable(direction: Direction, total: usize, index: usize) -> Self {
        Self::AnchorUnavailable {
            direction,
            total,
            index,
        }
    }

    /// Whether this error is a violated caller contract rather than a runtime condition
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::AnchorUnavailable { .. }
                | Self::TransactionAlreadyOpen(_)
                | Self::NoOpenTransaction
                | Self::DragInProgress(_)
        )
    }
}
