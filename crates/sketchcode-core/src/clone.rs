//! Shape duplication for the modifier-click and modifier-drag gestures.

use crate::document::Document;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Vec2};

/// Copy of `source` with a fresh id, anchored at `position`.
///
/// Everything else, including arrow points, is copied by value.
pub fn duplicate(source: &Shape, position: Point) -> Shape {
    let mut copy = source.clone();
    copy.set_id(ShapeId::generate());
    copy.set_position(position);
    copy
}

impl Document {
    /// Duplicate a shape at its own anchor plus `offset`.
    ///
    /// The copy goes on top and becomes the primary selection. Returns `None`
    /// for an unknown id.
    pub fn clone_shape(&mut self, id: &ShapeId, offset: Vec2) -> Option<ShapeId> {
        let source = self.get(id)?;
        let position = source.position() + offset;
        self.duplicate_at(id, position)
    }

    /// Duplicate a shape with its anchor at `position`.
    pub fn duplicate_at(&mut self, id: &ShapeId, position: Point) -> Option<ShapeId> {
        let copy = duplicate(self.get(id)?, position);
        let clone_id = self.create(copy);
        log::debug!("Cloned {} as {}", id, clone_id);
        Some(clone_id)
    }
}

/// A press with the clone modifier held on a shape.
///
/// Stays pending until the pointer travels past the threshold; at that point
/// exactly one duplicate is created and the rest of the drag moves it.
#[derive(Debug, Clone, PartialEq)]
pub struct CloneDrag {
    /// Shape the gesture started on.
    pub source: ShapeId,
    /// Pointer position at press.
    pub press: Point,
    /// Anchor of the source at press.
    pub origin: Point,
    /// The duplicate, once created.
    pub clone: Option<ShapeId>,
    /// Undo entries pushed by this gesture so far.
    pub recorded: usize,
}

impl CloneDrag {
    pub fn new(source: ShapeId, press: Point, origin: Point) -> Self {
        Self {
            source,
            press,
            origin,
            clone: None,
            recorded: 0,
        }
    }

    /// Check whether `current` is far enough from the press on either axis.
    pub fn exceeds_threshold(&self, current: Point, threshold: f64) -> bool {
        let delta = current - self.press;
        delta.x.abs() > threshold || delta.y.abs() > threshold
    }

    /// Where the duplicate's anchor belongs for the pointer at `current`.
    pub fn target_position(&self, current: Point) -> Point {
        self.origin + (current - self.press)
    }

    pub fn is_pending(&self) -> bool {
        self.clone.is_none()
    }
}
