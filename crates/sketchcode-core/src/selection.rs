//! Selection state and marquee rectangle.

use crate::shapes::ShapeId;
use kurbo::{Point, Rect};
use std::collections::HashSet;

/// Primary selection plus the marquee multi-selection.
///
/// `selected_ids` is only ever filled by a marquee. Clicking a shape replaces
/// the primary and empties the set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    selected_id: Option<ShapeId>,
    selected_ids: HashSet<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The primary selection (target of keyboard delete and transform handles).
    pub fn primary(&self) -> Option<&ShapeId> {
        self.selected_id.as_ref()
    }

    /// The marquee multi-selection.
    pub fn multi(&self) -> &HashSet<ShapeId> {
        &self.selected_ids
    }

    /// Check if a shape is the primary or part of the multi-selection.
    pub fn is_selected(&self, id: &ShapeId) -> bool {
        self.selected_id.as_ref() == Some(id) || self.selected_ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected_id.is_none() && self.selected_ids.is_empty()
    }

    /// Select a single shape (clears the multi-selection).
    pub fn select(&mut self, id: ShapeId) {
        self.selected_ids.clear();
        self.selected_id = Some(id);
    }

    /// Replace the primary without touching the multi-selection.
    pub fn set_primary(&mut self, id: Option<ShapeId>) {
        self.selected_id = id;
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        self.selected_id = None;
        self.selected_ids.clear();
    }

    /// Apply the result of a marquee.
    ///
    /// Exactly one hit also becomes the primary; zero or several clear it.
    pub fn apply_marquee(&mut self, hits: Vec<ShapeId>) {
        self.selected_id = match hits.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        };
        self.selected_ids = hits.into_iter().collect();
    }

    /// Forget a shape that no longer exists.
    pub fn remove(&mut self, id: &ShapeId) {
        if self.selected_id.as_ref() == Some(id) {
            self.selected_id = None;
        }
        self.selected_ids.remove(id);
    }

    /// Keep only the multi-selected ids for which `keep` returns true.
    pub fn retain_multi(&mut self, mut keep: impl FnMut(&ShapeId) -> bool) {
        self.selected_ids.retain(|id| keep(id));
    }
}

/// Rubber-band rectangle anchored where the drag started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    pub start: Point,
    pub current: Point,
}

impl Marquee {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            current: start,
        }
    }

    /// The marquee as a rectangle with non-negative width and height.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.start.x.min(self.current.x),
            self.start.y.min(self.current.y),
            self.start.x.max(self.current.x),
            self.start.y.max(self.current.y),
        )
    }
}
