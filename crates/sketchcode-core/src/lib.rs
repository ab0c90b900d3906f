//! SketchCode Core Library
//!
//! Shape editing engine for the SketchCode sketch-to-code editor: shape store,
//! undo history, selection, the tool state machine and the clone gesture.

pub mod clone;
pub mod config;
pub mod convert;
pub mod cursor;
pub mod document;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod history;
pub mod input;
pub mod selection;
pub mod shapes;
pub mod shortcuts;
pub mod store;
pub mod tools;

pub use clone::CloneDrag;
pub use config::{CloneModifier, EditorConfig, HistoryGranularity, ShapeDefaults};
pub use convert::{
    CodeGenerator, ConversionError, ConversionRequest, ConversionState, GeneratedCode,
    MockGenerator, parse_response,
};
pub use cursor::{CursorKind, cursor_for};
pub use document::Document;
pub use editor::{Editor, EditorCommand, TextEdit, TransformCommit};
pub use error::{EditorError, EditorResult};
pub use geometry::{Geometry, ModelGeometry, rects_overlap};
pub use history::{History, Snapshot};
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use selection::{Marquee, Selection};
pub use shapes::{Arrow, Circle, Rectangle, Shape, ShapeId, ShapePatch, Text};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
pub use store::ShapeStore;
pub use tools::{Gesture, ToolKind, ToolManager};
