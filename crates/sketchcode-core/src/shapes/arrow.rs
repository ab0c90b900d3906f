//! Arrow shape.

use super::{ShapeBase, ShapePatch, ShapeTrait, point_to_segment_dist};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A straight arrow from `points[0..2]` to `points[2..4]`, both relative to the anchor.
///
/// The points are a fixed-size array, so every copy of an arrow owns its own
/// coordinates and edits to a duplicate never reach the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    #[serde(flatten)]
    pub base: ShapeBase,
    /// `[x1, y1, x2, y2]` relative to the anchor.
    pub points: [f64; 4],
    pub stroke: String,
    pub stroke_width: f64,
}

impl Arrow {
    /// Create a new arrow from `start` to `end` (canvas coordinates), anchored at `start`.
    pub fn new(start: Point, end: Point) -> Self {
        let delta = end - start;
        Self {
            base: ShapeBase::at(start),
            points: [0.0, 0.0, delta.x, delta.y],
            stroke: "#000".to_string(),
            stroke_width: 2.0,
        }
    }

    /// Tail point in canvas coordinates.
    pub fn start(&self) -> Point {
        self.base.position() + Vec2::new(self.points[0], self.points[1])
    }

    /// Head point in canvas coordinates.
    pub fn end(&self) -> Point {
        self.base.position() + Vec2::new(self.points[2], self.points[3])
    }

    /// Length of the arrow shaft.
    pub fn length(&self) -> f64 {
        self.start().distance(self.end())
    }
}

impl ShapeTrait for Arrow {
    fn base(&self) -> &ShapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ShapeBase {
        &mut self.base
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start(), self.end())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start(), self.end())
            <= tolerance + self.stroke_width.max(1.0) / 2.0
    }

    fn apply_variant_patch(&mut self, patch: &ShapePatch) {
        if let Some(points) = patch.points {
            self.points = points;
        }
        if let Some(stroke) = &patch.stroke {
            self.stroke.clone_from(stroke);
        }
        if let Some(stroke_width) = patch.stroke_width {
            self.stroke_width = stroke_width;
        }
    }

    fn scaled_patch(&self, scale_x: f64, scale_y: f64) -> ShapePatch {
        let [x1, y1, x2, y2] = self.points;
        ShapePatch {
            points: Some([x1 * scale_x, y1 * scale_y, x2 * scale_x, y2 * scale_y]),
            ..ShapePatch::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_creation() {
        let arrow = Arrow::new(Point::new(10.0, 10.0), Point::new(40.0, 50.0));
        assert_eq!(arrow.points, [0.0, 0.0, 30.0, 40.0]);
        assert!((arrow.length() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_with_negative_direction() {
        let arrow = Arrow::new(Point::new(100.0, 100.0), Point::new(60.0, 80.0));
        let bounds = arrow.bounds();
        assert!((bounds.x0 - 60.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 80.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(arrow.hit_test(Point::new(50.0, 0.5), 0.0));
        assert!(!arrow.hit_test(Point::new(50.0, 10.0), 0.0));
        assert!(arrow.hit_test(Point::new(50.0, 10.0), 10.0));
    }

    #[test]
    fn test_copy_does_not_share_points() {
        let original = Arrow::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let mut copy = original.clone();
        copy.points[2] = 99.0;
        assert!((original.points[2] - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_points_must_have_four_numbers() {
        let json = r##"{"id":"a","x":0,"y":0,"points":[0,0,5],"stroke":"#000","strokeWidth":2}"##;
        assert!(serde_json::from_str::<Arrow>(json).is_err());
    }
}
