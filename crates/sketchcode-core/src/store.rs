//! Shape collection and z-order.
//!
//! The store only holds data. Mutators are crate-private: outside callers go
//! through [`Document`](crate::document::Document), which records history
//! before every change.

use crate::shapes::{Shape, ShapeId, ShapePatch};

/// Ordered collection of shapes.
///
/// Collection order is insertion order; paint order is `z_index` ascending,
/// with insertion order breaking ties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
}

impl ShapeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All shapes in collection order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get a shape by ID.
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.get(id).is_some()
    }

    /// Highest z-index in the store, 0 when empty.
    pub fn max_z_index(&self) -> u32 {
        self.shapes.iter().map(Shape::z_index).max().unwrap_or(0)
    }

    /// Shapes in paint order (back to front).
    pub fn ordered(&self) -> Vec<&Shape> {
        let mut ordered: Vec<&Shape> = self.shapes.iter().collect();
        // Stable sort keeps insertion order among equal z-indices.
        ordered.sort_by_key(|s| s.z_index());
        ordered
    }

    pub(crate) fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    /// Append a shape on top of everything else.
    ///
    /// A colliding id is replaced with a fresh one. Returns the id the shape ended up with.
    pub(crate) fn insert(&mut self, mut shape: Shape) -> ShapeId {
        if self.contains(shape.id()) {
            let fresh = ShapeId::generate();
            log::warn!("Shape id {} already in use, reassigned to {}", shape.id(), fresh);
            shape.set_id(fresh);
        }
        shape.set_z_index(self.next_z_index());
        let id = shape.id().clone();
        self.shapes.push(shape);
        id
    }

    /// Merge `patch` into the shape with `id`. Returns false if no such shape.
    pub(crate) fn update(&mut self, id: &ShapeId, patch: &ShapePatch) -> bool {
        match self.get_mut(id) {
            Some(shape) => {
                shape.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    /// Remove a shape from the store.
    pub(crate) fn remove(&mut self, id: &ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id() == id)?;
        Some(self.shapes.remove(index))
    }

    /// Check whether `bring_to_front` would change anything.
    pub(crate) fn can_bring_to_front(&self, id: &ShapeId) -> bool {
        let max = self.max_z_index();
        self.get(id).is_some_and(|s| s.z_index() < max)
    }

    /// Raise a shape above all others. Returns false if it already was on top.
    pub(crate) fn bring_to_front(&mut self, id: &ShapeId) -> bool {
        if !self.can_bring_to_front(id) {
            return false;
        }
        let z_index = self.next_z_index();
        if let Some(shape) = self.get_mut(id) {
            shape.set_z_index(z_index);
        }
        true
    }

    /// The z-index for a shape going on top.
    ///
    /// When the highest index is `u32::MAX` the stack is renumbered from 1
    /// first, keeping paint order.
    fn next_z_index(&mut self) -> u32 {
        if let Some(next) = self.max_z_index().checked_add(1) {
            return next;
        }
        log::warn!("Z-index space exhausted, renumbering {} shapes", self.shapes.len());
        self.compact_z_order();
        self.max_z_index().saturating_add(1)
    }

    fn compact_z_order(&mut self) {
        let mut order: Vec<usize> = (0..self.shapes.len()).collect();
        order.sort_by_key(|&i| self.shapes[i].z_index());
        for (rank, index) in order.into_iter().enumerate() {
            let z_index = u32::try_from(rank + 1).unwrap_or(u32::MAX);
            self.shapes[index].set_z_index(z_index);
        }
    }

    /// Replace the whole collection.
    pub(crate) fn replace(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    pub(crate) fn to_vec(&self) -> Vec<Shape> {
        self.shapes.clone()
    }
}
