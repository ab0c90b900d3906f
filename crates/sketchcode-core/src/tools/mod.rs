//! Tool modes and the pointer gesture state machine.

use crate::clone::CloneDrag;
use crate::config::ShapeDefaults;
use crate::selection::Marquee;
use crate::shapes::{Arrow, Circle, Rectangle, Shape, ShapeId, Text};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Circle,
    Arrow,
    Text,
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Arrow => "arrow",
            ToolKind::Text => "text",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shapes being moved by a select-tool drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub press: Point,
    pub current: Point,
    /// Every dragged shape with its anchor at press.
    pub originals: Vec<(ShapeId, Point)>,
    /// Undo entries pushed by this drag so far.
    pub recorded: usize,
}

impl DragState {
    pub fn new(press: Point, originals: Vec<(ShapeId, Point)>) -> Self {
        Self {
            press,
            current: press,
            originals,
            recorded: 0,
        }
    }

    /// Pointer travel since press.
    pub fn delta(&self) -> Vec2 {
        self.current - self.press
    }

    /// Check whether the dragged shapes have left their original anchors.
    pub fn has_moved(&self) -> bool {
        self.current != self.press
    }
}

/// The in-progress pointer interaction. At most one is active at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    /// A drawing tool is dragging out a new shape.
    Drawing { start: Point, current: Point },
    /// Rubber-band selection on empty canvas.
    Marquee(Marquee),
    /// Moving one shape or a multi-selection.
    Dragging(DragState),
    /// Modifier held on a shape: clone on click or on drag.
    Cloning(CloneDrag),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Check whether shapes are following the pointer.
    pub fn is_dragging(&self) -> bool {
        matches!(self, Gesture::Dragging(_) | Gesture::Cloning(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Drawing { .. } => "drawing",
            Gesture::Marquee(_) => "marquee",
            Gesture::Dragging(_) => "dragging",
            Gesture::Cloning(_) => "cloning",
        }
    }
}

/// Manages the current tool and its gesture.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    current_tool: ToolKind,
    gesture: Gesture,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_tool(&self) -> ToolKind {
        self.current_tool
    }

    /// Switch tools. Any gesture in progress is dropped.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.gesture = Gesture::Idle;
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Take the gesture out, leaving `Idle` behind.
    pub fn take_gesture(&mut self) -> Gesture {
        std::mem::take(&mut self.gesture)
    }

    pub fn set_gesture(&mut self, gesture: Gesture) {
        self.gesture = gesture;
    }

    /// The shape the current drawing gesture would commit.
    pub fn preview(&self, defaults: &ShapeDefaults) -> Option<Shape> {
        match self.gesture {
            Gesture::Drawing { start, current } => {
                draw_shape(self.current_tool, start, current, defaults)
            }
            _ => None,
        }
    }
}

/// Build the shape a drawing tool produces for a drag from `start` to `end`.
///
/// Rectangles are normalized so that width and height are non-negative.
/// Circles are centred on `start` with the drag distance as radius. Arrows
/// are anchored at `start` with points relative to it. Returns `None` for
/// tools that do not draw.
pub fn draw_shape(tool: ToolKind, start: Point, end: Point, defaults: &ShapeDefaults) -> Option<Shape> {
    let shape = match tool {
        ToolKind::Rectangle => {
            let mut rect = Rectangle::from_corners(start, end);
            rect.fill.clone_from(&defaults.fill);
            rect.stroke.clone_from(&defaults.stroke);
            rect.stroke_width = defaults.stroke_width;
            Shape::Rectangle(rect)
        }
        ToolKind::Circle => {
            let mut circle = Circle::through(start, end);
            circle.fill.clone_from(&defaults.fill);
            circle.stroke.clone_from(&defaults.stroke);
            circle.stroke_width = defaults.stroke_width;
            Shape::Circle(circle)
        }
        ToolKind::Arrow => {
            let mut arrow = Arrow::new(start, end);
            arrow.stroke.clone_from(&defaults.stroke);
            arrow.stroke_width = defaults.stroke_width;
            Shape::Arrow(arrow)
        }
        ToolKind::Select | ToolKind::Text => return None,
    };
    Some(shape)
}

/// The text shape a text-tool click places.
pub fn default_text(position: Point, defaults: &ShapeDefaults) -> Shape {
    let mut text = Text::new(position, defaults.text.clone());
    text.font_size = defaults.font_size;
    text.fill.clone_from(&defaults.text_fill);
    Shape::Text(text)
}

/// Check whether a drawn shape is smaller than `min_size` on both axes.
pub fn is_too_small(shape: &Shape, min_size: f64) -> bool {
    let bounds = shape.bounds();
    bounds.width() < min_size && bounds.height() < min_size
}
