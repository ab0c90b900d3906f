//! Text shape.

use super::{ShapeBase, ShapePatch, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Average glyph advance as a fraction of the font size.
///
/// Real metrics come from the renderer; this estimate is what the model
/// geometry uses when nothing better is available.
const AVERAGE_CHAR_WIDTH: f64 = 0.6;

/// A text label anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    #[serde(flatten)]
    pub base: ShapeBase,
    pub text: String,
    pub font_size: f64,
    pub fill: String,
}

impl Text {
    /// Default font size in canvas units.
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Create a new text shape.
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            base: ShapeBase::at(position),
            text: text.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            fill: "#000".to_string(),
        }
    }

    /// Estimated (width, height) of the laid-out text.
    pub fn estimated_size(&self) -> (f64, f64) {
        let line_count = self.text.lines().count().max(1);
        let longest = self
            .text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let width = longest as f64 * self.font_size * AVERAGE_CHAR_WIDTH;
        let height = line_count as f64 * self.font_size;
        (width, height)
    }
}

impl ShapeTrait for Text {
    fn base(&self) -> &ShapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ShapeBase {
        &mut self.base
    }

    fn bounds(&self) -> Rect {
        let (width, height) = self.estimated_size();
        Rect::from_origin_size(self.base.position(), (width, height))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let b = self.bounds().inflate(tolerance, tolerance);
        b.x0 <= point.x && point.x <= b.x1 && b.y0 <= point.y && point.y <= b.y1
    }

    fn apply_variant_patch(&mut self, patch: &ShapePatch) {
        if let Some(text) = &patch.text {
            self.text.clone_from(text);
        }
        if let Some(font_size) = patch.font_size {
            self.font_size = font_size;
        }
        if let Some(fill) = &patch.fill {
            self.fill.clone_from(fill);
        }
    }

    fn scaled_patch(&self, _scale_x: f64, scale_y: f64) -> ShapePatch {
        ShapePatch {
            font_size: Some(self.font_size * scale_y.abs()),
            ..ShapePatch::default()
        }
    }
}
