//! Linear undo/redo over full-state snapshots.

use crate::shapes::{Shape, ShapeId};
use std::collections::VecDeque;

/// A value copy of the document state taken before a mutation.
///
/// Shapes own all their data, so a cloned snapshot shares nothing with the live store.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub shapes: Vec<Shape>,
    pub selected_id: Option<ShapeId>,
}

/// Undo and redo stacks.
///
/// `past` runs oldest to newest; `future` runs newest to oldest, so its front
/// is the next state to redo.
#[derive(Debug, Clone, Default)]
pub struct History {
    past: Vec<Snapshot>,
    future: VecDeque<Snapshot>,
    limit: Option<usize>,
}

impl History {
    /// Create an unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that keeps at most `limit` undo states.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Record the state as it was before a change.
    ///
    /// Starting a new branch discards everything that could have been redone.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.past.push(snapshot);
        self.future.clear();

        if let Some(limit) = self.limit {
            while self.past.len() > limit {
                self.past.remove(0);
            }
        }
    }

    /// Step back. `current` is pushed to the front of the redo stack.
    ///
    /// Returns the state to restore, or `None` when there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop()?;
        self.future.push_front(current);
        Some(previous)
    }

    /// Step forward. `current` is pushed onto the undo stack.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop_front()?;
        self.past.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Forget the `count` newest undo states. Returns how many were dropped.
    pub fn discard_recent(&mut self, count: usize) -> usize {
        let keep = self.past.len().saturating_sub(count);
        let dropped = self.past.len() - keep;
        self.past.truncate(keep);
        dropped
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}
