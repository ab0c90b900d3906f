//! Keyboard shortcut registry.

use crate::input::{Key, KeyEvent};
use crate::tools::ToolKind;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    DeleteSelected,
    Undo,
    Redo,
    Cancel,
    SetTool(ToolKind),
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: Key,
    /// Ctrl, or Cmd on macOS.
    pub command: bool,
    pub shift: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: Key,
        command: bool,
        shift: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            command,
            shift,
            action,
            description,
        }
    }

    /// Check whether a key press triggers this shortcut.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let key_matches = match self.key {
            Key::Char(c) => event.key.is_char(c),
            key => event.key == key,
        };
        key_matches
            && self.command == event.modifiers.command()
            && self.shift == event.modifiers.shift
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        parts.push(match self.key {
            Key::Delete => "Delete".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Enter => "Enter".to_string(),
            Key::Char(c) => c.to_ascii_uppercase().to_string(),
        });
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use ShortcutAction::*;
        vec![
            Shortcut::new(Key::Delete, false, false, DeleteSelected, "Delete selected shape"),
            Shortcut::new(Key::Backspace, false, false, DeleteSelected, "Delete selected shape"),
            Shortcut::new(Key::Char('z'), true, false, Undo, "Undo"),
            Shortcut::new(Key::Char('z'), true, true, Redo, "Redo"),
            Shortcut::new(Key::Char('y'), true, false, Redo, "Redo"),
            Shortcut::new(Key::Escape, false, false, Cancel, "Cancel current action"),
            Shortcut::new(Key::Char('v'), false, false, SetTool(ToolKind::Select), "Select tool"),
            Shortcut::new(Key::Char('r'), false, false, SetTool(ToolKind::Rectangle), "Rectangle tool"),
            Shortcut::new(Key::Char('c'), false, false, SetTool(ToolKind::Circle), "Circle tool"),
            Shortcut::new(Key::Char('a'), false, false, SetTool(ToolKind::Arrow), "Arrow tool"),
            Shortcut::new(Key::Char('t'), false, false, SetTool(ToolKind::Text), "Text tool"),
        ]
    }

    /// Find the action bound to a key press.
    pub fn resolve(event: &KeyEvent) -> Option<ShortcutAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(event))
            .map(|shortcut| shortcut.action)
    }
}
