//! Rectangle shape.

use super::{ShapeBase, ShapePatch, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    #[serde(flatten)]
    pub base: ShapeBase,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Rectangle {
    /// Create a new rectangle with the default outline style.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            base: ShapeBase::at(position),
            width,
            height,
            fill: "transparent".to_string(),
            stroke: "#000".to_string(),
            stroke_width: 2.0,
        }
    }

    /// Create a rectangle from two corner points.
    ///
    /// The origin flips to the smaller coordinate so width and height are never negative.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let rect = Rect::from_points(p1, p2);
        Self::new(Point::new(rect.x0, rect.y0), rect.width(), rect.height())
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.base.x,
            self.base.y,
            self.base.x + self.width,
            self.base.y + self.height,
        )
    }
}

impl ShapeTrait for Rectangle {
    fn base(&self) -> &ShapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ShapeBase {
        &mut self.base
    }

    fn bounds(&self) -> Rect {
        // Width/height can go negative through a raw patch.
        self.as_rect().abs()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let slop = tolerance + self.stroke_width / 2.0;
        let outer = self.bounds().inflate(slop, slop);
        outer.x0 <= point.x && point.x <= outer.x1 && outer.y0 <= point.y && point.y <= outer.y1
    }

    fn apply_variant_patch(&mut self, patch: &ShapePatch) {
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(fill) = &patch.fill {
            self.fill.clone_from(fill);
        }
        if let Some(stroke) = &patch.stroke {
            self.stroke.clone_from(stroke);
        }
        if let Some(stroke_width) = patch.stroke_width {
            self.stroke_width = stroke_width;
        }
    }

    fn scaled_patch(&self, scale_x: f64, scale_y: f64) -> ShapePatch {
        ShapePatch::default().with_size(self.width * scale_x.abs(), self.height * scale_y.abs())
    }
}
