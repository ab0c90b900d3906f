//! Editor configuration.

use crate::error::{EditorError, EditorResult};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Modifier key that turns a press on a shape into a clone gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloneModifier {
    #[default]
    Alt,
    Ctrl,
    Meta,
    Shift,
}

/// How many undo steps a pointer drag produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryGranularity {
    /// Every position update during a drag is its own undo step.
    #[default]
    PerUpdate,
    /// A whole drag collapses into a single undo step on release.
    PerGesture,
}

/// Attribute defaults for newly drawn shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeDefaults {
    pub stroke: String,
    pub fill: String,
    pub stroke_width: f64,
    pub text: String,
    pub font_size: f64,
    pub text_fill: String,
}

impl Default for ShapeDefaults {
    fn default() -> Self {
        Self {
            stroke: "#000".to_string(),
            fill: "transparent".to_string(),
            stroke_width: 2.0,
            text: "Text".to_string(),
            font_size: 20.0,
            text_fill: "#000".to_string(),
        }
    }
}

/// Editor configuration.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Offset of a click-clone from its source.
    pub clone_offset: Vec2,
    /// Pointer travel (on either axis) that turns a clone click into a clone drag.
    pub clone_drag_threshold: f64,
    pub clone_modifier: CloneModifier,
    pub history_granularity: HistoryGranularity,
    /// Maximum number of undo steps kept. `None` keeps everything.
    pub max_history: Option<usize>,
    /// Drawn shapes smaller than this on both axes are discarded.
    pub min_shape_size: f64,
    /// Extra slack around shapes when testing pointer hits.
    pub hit_tolerance: f64,
    pub defaults: ShapeDefaults,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            clone_offset: Vec2::new(10.0, 10.0),
            clone_drag_threshold: 5.0,
            clone_modifier: CloneModifier::default(),
            history_granularity: HistoryGranularity::default(),
            max_history: None,
            min_shape_size: 0.0,
            hit_tolerance: 0.0,
            defaults: ShapeDefaults::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON and check it.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(EditorError::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the editor cannot work with.
    pub fn validate(&self) -> EditorResult<()> {
        non_negative("clone_drag_threshold", self.clone_drag_threshold)?;
        non_negative("min_shape_size", self.min_shape_size)?;
        non_negative("hit_tolerance", self.hit_tolerance)?;
        if self.max_history == Some(0) {
            return Err(EditorError::Config("max_history must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn non_negative(name: &str, value: f64) -> EditorResult<()> {
    if value.is_nan() || value < 0.0 {
        return Err(EditorError::Config(format!(
            "{name} must be non-negative, got {value}"
        )));
    }
    Ok(())
}
