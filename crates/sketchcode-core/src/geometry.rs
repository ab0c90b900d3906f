//! Hit testing and bounding-box queries.
//!
//! The renderer knows the real on-screen extent of a shape. It can provide that
//! through [`Geometry`]; [`ModelGeometry`] is the fallback computed from the
//! shape model alone.

use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect};

/// Geometry queries the editing engine cannot answer on its own.
pub trait Geometry {
    /// Bounding box of a shape in canvas coordinates.
    fn bounds(&self, shape: &Shape) -> Rect;

    /// Check if `point` lies inside the shape.
    fn contains(&self, shape: &Shape, point: Point) -> bool;
}

/// Geometry derived from the shape model.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModelGeometry {
    /// Extra slack around shapes for point containment.
    pub tolerance: f64,
}

impl ModelGeometry {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl Geometry for ModelGeometry {
    fn bounds(&self, shape: &Shape) -> Rect {
        shape.bounds()
    }

    fn contains(&self, shape: &Shape, point: Point) -> bool {
        shape.hit_test(point, self.tolerance)
    }
}

/// Strict axis-aligned overlap. Rectangles that only touch do not overlap.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// IDs of every shape whose bounding box overlaps `rect`, in collection order.
pub fn shapes_in_rect(shapes: &[Shape], rect: Rect, geometry: &dyn Geometry) -> Vec<ShapeId> {
    shapes
        .iter()
        .filter(|s| rects_overlap(rect, geometry.bounds(s)))
        .map(|s| s.id().clone())
        .collect()
}

/// The highest shape containing `point`.
///
/// Ties on z-index go to the shape later in the collection, which is the one painted last.
pub fn topmost_at_point<'a>(
    shapes: &'a [Shape],
    point: Point,
    geometry: &dyn Geometry,
) -> Option<&'a Shape> {
    shapes
        .iter()
        .filter(|s| geometry.contains(s, point))
        .max_by_key(|s| s.z_index())
}
