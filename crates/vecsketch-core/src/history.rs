//! Undo/redo stacks of shape-list snapshots.

use crate::shapes::ShapeHandle;

/// Default number of undo states to keep.
pub const DEFAULT_MAX_UNDO_HISTORY: usize = 100;

/// A snapshot of the document's shape list.
///
/// Holds clones of the shared handles, not of the shapes: edits made in
/// place after the snapshot was taken show through it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    shapes: Vec<ShapeHandle>,
}

impl Snapshot {
    pub fn capture(shapes: &[ShapeHandle]) -> Self {
        Self {
            shapes: shapes.to_vec(),
        }
    }

    pub fn into_shapes(self) -> Vec<ShapeHandle> {
        self.shapes
    }
}

/// Bounded undo stack plus redo stack.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO_HISTORY)
    }
}

impl History {
    /// Create an empty history keeping at most `limit` undo states (at least one).
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the state before a structural change. Clears the redo stack.
    pub fn push(&mut self, current: &[ShapeHandle]) {
        self.undo_stack.push(Snapshot::capture(current));
        self.redo_stack.clear();

        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
    }

    /// Swap `current` for the most recent undo state.
    /// Returns the restored list, or `None` if there is nothing to undo.
    pub fn undo(&mut self, current: &[ShapeHandle]) -> Option<Vec<ShapeHandle>> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(Snapshot::capture(current));
        Some(snapshot.into_shapes())
    }

    /// Swap `current` for the most recent redo state.
    pub fn redo(&mut self, current: &[ShapeHandle]) -> Option<Vec<ShapeHandle>> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(Snapshot::capture(current));
        Some(snapshot.into_shapes())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[cfg(test)]
    fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
