//! Circle shape.

use super::{ShapeBase, ShapePatch, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A circle anchored at its centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    #[serde(flatten)]
    pub base: ShapeBase,
    pub radius: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Circle {
    /// Create a new circle with the default outline style.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            base: ShapeBase::at(center),
            radius,
            fill: "transparent".to_string(),
            stroke: "#000".to_string(),
            stroke_width: 2.0,
        }
    }

    /// Create a circle centred on `center` whose edge passes through `edge`.
    pub fn through(center: Point, edge: Point) -> Self {
        Self::new(center, center.distance(edge))
    }

    pub fn center(&self) -> Point {
        self.base.position()
    }
}

impl ShapeTrait for Circle {
    fn base(&self) -> &ShapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ShapeBase {
        &mut self.base
    }

    fn bounds(&self) -> Rect {
        let r = self.radius.abs();
        let c = self.center();
        Rect::new(c.x - r, c.y - r, c.x + r, c.y + r)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point.distance(self.center()) <= self.radius.abs() + self.stroke_width / 2.0 + tolerance
    }

    fn apply_variant_patch(&mut self, patch: &ShapePatch) {
        if let Some(radius) = patch.radius {
            self.radius = radius;
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

    fn scaled_patch(&self, scale_x: f64, _scale_y: f64) -> ShapePatch {
        // Circles stay circular: the horizontal scale wins.
        ShapePatch {
            radius: Some(self.radius * scale_x.abs()),
            ..ShapePatch::default()
        }
    }
}
