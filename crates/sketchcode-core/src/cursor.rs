//! Pointer cursor feedback.

use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};

/// Cursor the renderer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorKind {
    Default,
    Crosshair,
    Text,
    /// Hovering a shape that can be moved.
    Move,
    Grabbing,
    /// Hovering a shape with the clone modifier held.
    Copy,
}

/// Pick the cursor from the editor state.
pub fn cursor_for(tool: ToolKind, hovering_shape: bool, is_dragging: bool, modifier: bool) -> CursorKind {
    if is_dragging {
        return if modifier { CursorKind::Copy } else { CursorKind::Grabbing };
    }
    match tool {
        ToolKind::Select if hovering_shape && modifier => CursorKind::Copy,
        ToolKind::Select if hovering_shape => CursorKind::Move,
        ToolKind::Select => CursorKind::Default,
        ToolKind::Text => CursorKind::Text,
        ToolKind::Rectangle | ToolKind::Circle | ToolKind::Arrow => CursorKind::Crosshair,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_tool_cursors() {
        assert_eq!(cursor_for(ToolKind::Select, false, false, false), CursorKind::Default);
        assert_eq!(cursor_for(ToolKind::Select, true, false, false), CursorKind::Move);
        assert_eq!(cursor_for(ToolKind::Select, true, false, true), CursorKind::Copy);
        assert_eq!(cursor_for(ToolKind::Select, false, false, true), CursorKind::Default);
    }

    #[test]
    fn test_dragging_overrides_tool() {
        assert_eq!(cursor_for(ToolKind::Select, true, true, false), CursorKind::Grabbing);
        assert_eq!(cursor_for(ToolKind::Select, true, true, true), CursorKind::Copy);
    }

    #[test]
    fn test_drawing_tools() {
        assert_eq!(cursor_for(ToolKind::Arrow, true, false, false), CursorKind::Crosshair);
        assert_eq!(cursor_for(ToolKind::Text, false, false, false), CursorKind::Text);
    }
}
