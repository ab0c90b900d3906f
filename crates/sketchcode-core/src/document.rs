//! The editable sketch: shapes, selection and undo history.

use crate::error::{EditorError, EditorResult};
use crate::history::{History, Snapshot};
use crate::selection::Selection;
use crate::shapes::{Shape, ShapeId, ShapePatch};
use crate::store::ShapeStore;
use std::collections::{HashSet, VecDeque};

/// A sketch document.
///
/// Every mutating operation snapshots the current state onto the undo stack
/// before it touches the store. That includes updates and deletes of ids that
/// do not exist, so N mutations are always undone by exactly N undos.
#[derive(Debug, Clone, Default)]
pub struct Document {
    store: ShapeStore,
    history: History,
    selection: Selection,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document that keeps at most `limit` undo steps.
    pub fn with_history_limit(limit: Option<usize>) -> Self {
        Self {
            history: History::with_limit(limit),
            ..Self::default()
        }
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    /// All shapes in collection order.
    pub fn shapes(&self) -> &[Shape] {
        self.store.shapes()
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.store.get(id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn max_z_index(&self) -> u32 {
        self.store.max_z_index()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The primary selection.
    pub fn selected_id(&self) -> Option<&ShapeId> {
        self.selection.primary()
    }

    pub fn selected_ids(&self) -> &HashSet<ShapeId> {
        self.selection.multi()
    }

    /// Value copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            shapes: self.store.to_vec(),
            selected_id: self.selection.primary().cloned(),
        }
    }

    fn record(&mut self) {
        self.history.record(self.snapshot());
        log::debug!("History entry recorded ({} undo steps)", self.history.undo_depth());
    }

    /// Add a shape on top of the others and make it the primary selection.
    ///
    /// Returns the id the shape was stored under.
    pub fn create(&mut self, shape: Shape) -> ShapeId {
        self.record();
        let id = self.store.insert(shape);
        self.selection.select(id.clone());
        id
    }

    /// Merge `patch` into a shape. Returns false if the id is unknown.
    pub fn update(&mut self, id: &ShapeId, patch: &ShapePatch) -> bool {
        self.record();
        self.store.update(id, patch)
    }

    /// Apply several patches as one undo step. Returns how many shapes changed.
    pub fn update_many(&mut self, patches: &[(ShapeId, ShapePatch)]) -> usize {
        self.record();
        let mut changed = 0;
        for (id, patch) in patches {
            if self.store.update(id, patch) {
                changed += 1;
            }
        }
        changed
    }

    /// Merge `patch` without recording history. Used for gesture previews.
    pub(crate) fn update_untracked(&mut self, id: &ShapeId, patch: &ShapePatch) -> bool {
        self.store.update(id, patch)
    }

    /// Remove a shape without recording history.
    pub(crate) fn remove_untracked(&mut self, id: &ShapeId) -> bool {
        let removed = self.store.remove(id).is_some();
        self.selection.remove(id);
        removed
    }

    /// Drop the `count` newest undo entries, e.g. those of a cancelled gesture.
    pub(crate) fn discard_recent(&mut self, count: usize) {
        let dropped = self.history.discard_recent(count);
        log::debug!("Discarded {} history entries", dropped);
    }

    /// Remove a shape. Returns false if the id is unknown.
    pub fn delete(&mut self, id: &ShapeId) -> bool {
        self.record();
        let removed = self.store.remove(id).is_some();
        self.selection.remove(id);
        removed
    }

    /// Raise a shape above all others.
    ///
    /// Does nothing (and records nothing) if the shape is already on top or does not exist.
    pub fn bring_to_front(&mut self, id: &ShapeId) -> bool {
        if !self.store.can_bring_to_front(id) {
            return false;
        }
        self.record();
        self.store.bring_to_front(id)
    }

    /// Revert the last mutation. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone mutation. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.store.replace(snapshot.shapes);
        self.selection.set_primary(snapshot.selected_id);
        let store = &self.store;
        self.selection.retain_multi(|id| store.contains(id));
    }

    /// Make a shape the sole selection. Returns false if the id is unknown.
    pub fn select(&mut self, id: &ShapeId) -> bool {
        if !self.store.contains(id) {
            return false;
        }
        self.selection.select(id.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Clear only the primary selection.
    pub fn clear_primary(&mut self) {
        self.selection.set_primary(None);
    }

    /// Replace the selection with the shapes a marquee caught.
    pub fn apply_marquee(&mut self, hits: Vec<ShapeId>) {
        self.selection.apply_marquee(hits);
    }

    /// Serialize all shapes as a pretty-printed JSON array.
    pub fn export_json(&self) -> EditorResult<String> {
        let json =
            serde_json::to_string_pretty(self.store.shapes()).map_err(EditorError::Serialization)?;
        log::info!("Exported {} shapes", self.store.len());
        Ok(json)
    }

    /// Replace the document contents with a JSON array of shapes.
    ///
    /// On failure the document is left exactly as it was.
    pub fn import_json(&mut self, json: &str) -> EditorResult<()> {
        let shapes: Vec<Shape> = serde_json::from_str(json).map_err(|e| {
            log::error!("Failed to import sketch: {}", e);
            EditorError::Parse(e)
        })?;
        self.import_shapes(shapes)
    }

    /// Replace the document contents.
    ///
    /// Clears the selection and both history stacks, so the import itself cannot be undone.
    pub fn import_shapes(&mut self, shapes: Vec<Shape>) -> EditorResult<()> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = shapes.iter().map(Shape::id).find(|id| !seen.insert(*id)) {
            log::error!("Failed to import sketch: duplicate shape id {}", duplicate);
            return Err(EditorError::DuplicateId(duplicate.clone()));
        }

        let count = shapes.len();
        self.store.replace(shapes);
        self.selection.clear();
        self.history.clear();
        log::info!("Imported {} shapes", count);
        Ok(())
    }

    /// IDs that are selected and still exist, primary first.
    pub fn selection_targets(&self) -> Vec<ShapeId> {
        let mut targets: VecDeque<ShapeId> = self
            .selection
            .multi()
            .iter()
            .filter(|id| self.store.contains(id) && Some(*id) != self.selection.primary())
            .cloned()
            .collect();
        if let Some(primary) = self.selection.primary().filter(|id| self.store.contains(id)) {
            targets.push_front(primary.clone());
        }
        targets.into()
    }
}
