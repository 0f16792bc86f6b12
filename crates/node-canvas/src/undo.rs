//! Undo/redo of node moves using the command pattern
//!
//! Every position change is recorded as a `MoveCommand` holding the old and
//! the new position. Commands are grouped into transactions; one transaction
//! is one user-visible undo step. A drag that moves several nodes opens a
//! transaction, pushes one command per moved node and commits it.
//!
//! Transaction state is an explicit field. Opening a second transaction or
//! committing one that was never opened is reported as an error and leaves
//! the stack untouched.

use std::collections::VecDeque;

use log::{debug, trace};
use uuid::Uuid;

use crate::error::{CanvasError, Result};
use crate::store::{NodeUpdate, WorkflowStore};
use crate::types::Position;

/// A single node move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCommand {
    node_name: String,
    old_position: Position,
    new_position: Position,
}

impl MoveCommand {
    pub fn new(
        node_name: impl Into<String>,
        old_position: Position,
        new_position: Position,
    ) -> Self {
        Self {
            node_name: node_name.into(),
            old_position,
            new_position,
        }
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn old_position(&self) -> Position {
        self.old_position
    }

    pub fn new_position(&self) -> Position {
        self.new_position
    }

    /// The command that undoes this one
    pub fn reverse(&self) -> Self {
        Self::new(self.node_name.clone(), self.new_position, self.old_position)
    }

    /// Reapply the old position
    pub fn undo<S: WorkflowStore + ?Sized>(&self, store: &mut S) {
        trace!("Undo move of '{}' to {}", self.node_name, self.old_position);
        store.update_node_properties(NodeUpdate::position(&self.node_name, self.old_position));
    }

    /// Reapply the new position
    pub fn redo<S: WorkflowStore + ?Sized>(&self, store: &mut S) {
        trace!("Redo move of '{}' to {}", self.node_name, self.new_position);
        store.update_node_properties(NodeUpdate::position(&self.node_name, self.new_position));
    }
}

/// A batch of commands undone and redone as one step
#[derive(Debug, Clone)]
pub struct Transaction {
    id: Uuid,
    commands: Vec<MoveCommand>,
}

impl Transaction {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            commands: Vec::new(),
        }
    }

    fn single(command: MoveCommand) -> Self {
        let mut transaction = Self::new();
        transaction.commands.push(command);
        transaction
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn commands(&self) -> &[MoveCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Undo/redo history of move transactions
pub struct UndoStack {
    /// Committed transactions, oldest first
    undo: VecDeque<Transaction>,
    /// Undone transactions, most recently undone last
    redo: Vec<Transaction>,
    /// Transaction currently collecting commands
    open: Option<Transaction>,
    /// Maximum number of transactions to keep
    max_transactions: usize,
}

impl UndoStack {
    /// Create a new undo stack with the specified maximum size
    pub fn new(max_transactions: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            open: None,
            max_transactions: max_transactions.max(1),
        }
    }

    /// Open a transaction that collects commands until committed
    pub fn start_transaction(&mut self) -> Result<Uuid> {
        if let Some(open) = &self.open {
            return Err(CanvasError::TransactionAlreadyOpen(open.id.to_string()));
        }
        let transaction = Transaction::new();
        let id = transaction.id;
        debug!("Started undo transaction {}", id);
        self.open = Some(transaction);
        Ok(id)
    }

    /// Close the open transaction and record it
    ///
    /// An empty transaction is dropped without touching the history.
    /// Returns the number of commands recorded.
    pub fn commit_transaction(&mut self) -> Result<usize> {
        let transaction = self.open.take().ok_or(CanvasError::NoOpenTransaction)?;
        let count = transaction.len();
        if transaction.is_empty() {
            debug!("Committed empty undo transaction {}", transaction.id);
        } else {
            debug!("Committed undo transaction {} with {} command(s)", transaction.id, count);
            self.record(transaction);
        }
        Ok(count)
    }

    /// Close the open transaction without recording it
    ///
    /// The commands are discarded; nothing is reverted.
    pub fn abort_transaction(&mut self) -> Result<usize> {
        let transaction = self.open.take().ok_or(CanvasError::NoOpenTransaction)?;
        debug!("Aborted undo transaction {}", transaction.id);
        Ok(transaction.len())
    }

    /// Whether a transaction is currently open
    pub fn in_transaction(&self) -> bool {
        self.open.is_some()
    }

    /// Commands collected so far by the open transaction
    pub fn pending(&self) -> &[MoveCommand] {
        self.open.as_ref().map(|t| t.commands()).unwrap_or(&[])
    }

    /// Record a command
    ///
    /// Goes into the open transaction if there is one, otherwise it becomes
    /// a transaction of its own. Either way the redo history is cleared.
    pub fn push_command(&mut self, command: MoveCommand) {
        trace!(
            "Recording move of '{}' {} -> {}",
            command.node_name,
            command.old_position,
            command.new_position
        );
        self.redo.clear();
        match self.open.as_mut() {
            Some(open) => open.commands.push(command),
            None => self.record(Transaction::single(command)),
        }
    }

    /// Undo the most recent transaction
    ///
    /// Commands are reverted in reverse order. Returns the undone
    /// transaction, or None if there is nothing to undo.
    pub fn undo<S: WorkflowStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<Option<&Transaction>> {
        self.ensure_closed()?;
        let Some(transaction) = self.undo.pop_back() else {
            return Ok(None);
        };
        debug!("Undoing transaction {}", transaction.id);
        for command in transaction.commands.iter().rev() {
            command.undo(store);
        }
        self.redo.push(transaction);
        Ok(self.redo.last())
    }

    /// Redo the most recently undone transaction
    ///
    /// Commands are reapplied in their original order.
    pub fn redo<S: WorkflowStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<Option<&Transaction>> {
        self.ensure_closed()?;
        let Some(transaction) = self.redo.pop() else {
            return Ok(None);
        };
        debug!("Redoing transaction {}", transaction.id);
        for command in &transaction.commands {
            command.redo(store);
        }
        self.undo.push_back(transaction);
        Ok(self.undo.back())
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undoable transactions
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redoable transactions
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// The transaction the next undo would revert
    pub fn last_transaction(&self) -> Option<&Transaction> {
        self.undo.back()
    }

    /// Drop all history, including any open transaction
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.open = None;
    }

    fn ensure_closed(&self) -> Result<()> {
        match &self.open {
            Some(open) => Err(CanvasError::TransactionAlreadyOpen(open.id.to_string())),
            None => Ok(()),
        }
    }

    fn record(&mut self, transaction: Transaction) {
        self.undo.push_back(transaction);
        while self.undo.len() > self.max_transactions {
            self.undo.pop_front();
        }
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(crate::config::defaults::UNDO_LIMIT)
    }
}
