//! Shape definitions for the sketch.
//!
//! Every shape is one variant of [`Shape`]. The shared placement fields live in
//! [`ShapeBase`], flattened into each variant so the serialized record is a flat
//! object with a `type` discriminator:
//!
//! ```json
//! { "type": "rectangle", "id": "a1", "x": 10, "y": 20, "rotation": 0, "zIndex": 1,
//!   "width": 100, "height": 50, "fill": "transparent", "stroke": "#000", "strokeWidth": 2 }
//! ```
//!
//! Geometry here is axis-aligned. Rotation is carried as data for the renderer
//! but does not take part in bounds or hit testing.

mod arrow;
mod circle;
mod rectangle;
mod text;

pub use arrow::Arrow;
pub use circle::Circle;
pub use rectangle::Rectangle;
pub use text::Text;

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for shapes.
///
/// Opaque string on the wire. Fresh ids are UUID v4 in simple form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Generate a new unique id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ShapeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Placement fields shared by every shape variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeBase {
    pub id: ShapeId,
    /// Anchor x. Meaning depends on the variant.
    pub x: f64,
    /// Anchor y.
    pub y: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Paint and selection priority (higher = on top).
    #[serde(default)]
    pub z_index: u32,
}

impl ShapeBase {
    /// Create a base at `position` with a fresh id and z-index 0.
    ///
    /// The store assigns the real z-index on creation.
    pub fn at(position: Point) -> Self {
        Self {
            id: ShapeId::generate(),
            x: position.x,
            y: position.y,
            rotation: 0.0,
            z_index: 0,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    fn apply_patch(&mut self, patch: &ShapePatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
    }
}

/// A partial set of shape attributes, merged into a shape by `update`.
///
/// Fields left as `None` are untouched. Fields that do not exist on the
/// target variant (e.g. `radius` on a rectangle) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

impl ShapePatch {
    /// A patch that only moves the anchor.
    pub fn position(position: Point) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Self::default()
        }
    }

    /// A patch that only replaces text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Check whether the patch carries no attributes at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Common trait for all shape variants.
pub trait ShapeTrait {
    fn base(&self) -> &ShapeBase;

    fn base_mut(&mut self) -> &mut ShapeBase;

    /// Axis-aligned bounding box in canvas coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Merge the variant-specific attributes of `patch`.
    fn apply_variant_patch(&mut self, patch: &ShapePatch);

    /// Variant attributes with a transform scale baked in.
    fn scaled_patch(&self, scale_x: f64, scale_y: f64) -> ShapePatch;
}

/// A drawable primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Arrow(Arrow),
    Text(Text),
}

impl Shape {
    fn as_trait(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Rectangle(s) => s,
            Shape::Circle(s) => s,
            Shape::Arrow(s) => s,
            Shape::Text(s) => s,
        }
    }

    fn as_trait_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Shape::Rectangle(s) => s,
            Shape::Circle(s) => s,
            Shape::Arrow(s) => s,
            Shape::Text(s) => s,
        }
    }

    pub fn base(&self) -> &ShapeBase {
        self.as_trait().base()
    }

    pub fn base_mut(&mut self) -> &mut ShapeBase {
        self.as_trait_mut().base_mut()
    }

    pub fn id(&self) -> &ShapeId {
        &self.base().id
    }

    pub(crate) fn set_id(&mut self, id: ShapeId) {
        self.base_mut().id = id;
    }

    pub fn z_index(&self) -> u32 {
        self.base().z_index
    }

    pub(crate) fn set_z_index(&mut self, z_index: u32) {
        self.base_mut().z_index = z_index;
    }

    /// Anchor point (top-left, centre or arrow origin depending on the variant).
    pub fn position(&self) -> Point {
        self.base().position()
    }

    pub fn set_position(&mut self, position: Point) {
        self.base_mut().set_position(position);
    }

    pub fn rotation(&self) -> f64 {
        self.base().rotation
    }

    pub fn bounds(&self) -> Rect {
        self.as_trait().bounds()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_trait().hit_test(point, tolerance)
    }

    /// Merge a partial attribute set into this shape.
    pub fn apply_patch(&mut self, patch: &ShapePatch) {
        self.base_mut().apply_patch(patch);
        self.as_trait_mut().apply_variant_patch(patch);
    }

    /// Variant attributes with `scale_x`/`scale_y` folded into the geometry.
    pub fn scaled_patch(&self, scale_x: f64, scale_y: f64) -> ShapePatch {
        self.as_trait().scaled_patch(scale_x, scale_y)
    }

    /// The `type` discriminator used in the serialized format.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Rectangle(_) => "rectangle",
            Shape::Circle(_) => "circle",
            Shape::Arrow(_) => "arrow",
            Shape::Text(_) => "text",
        }
    }

    pub fn as_arrow(&self) -> Option<&Arrow> {
        match self {
            Shape::Arrow(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    point.distance(proj)
}
