//! Editor controller: routes pointer and keyboard input to the document.

use crate::clone::CloneDrag;
use crate::config::{EditorConfig, HistoryGranularity};
use crate::convert::{CodeGenerator, ConversionRequest, ConversionResult, ConversionState, GeneratedCode};
use crate::cursor::{CursorKind, cursor_for};
use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::geometry::{Geometry, ModelGeometry, shapes_in_rect, topmost_at_point};
use crate::input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::selection::Marquee;
use crate::shapes::{Shape, ShapeId, ShapePatch};
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::tools::{DragState, Gesture, ToolKind, ToolManager, default_text, draw_shape, is_too_small};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

fn unit_scale() -> f64 {
    1.0
}

/// Final state of a transform-handle interaction.
///
/// Scale is baked into the shape's own size attributes on commit, so the
/// stored shape always has an implicit scale of 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformCommit {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "unit_scale")]
    pub scale_x: f64,
    #[serde(default = "unit_scale")]
    pub scale_y: f64,
}

/// Text being edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEdit {
    pub id: ShapeId,
    pub original: String,
    pub draft: String,
}

/// A scripted editor action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    SetTool {
        tool: ToolKind,
    },
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DoubleClick {
        x: f64,
        y: f64,
    },
    Key {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Create {
        shape: Shape,
    },
    Update {
        id: ShapeId,
        patch: ShapePatch,
    },
    Delete {
        id: ShapeId,
    },
    BringToFront {
        id: ShapeId,
    },
    Select {
        id: ShapeId,
    },
    ClearSelection,
    CommitTransform {
        id: ShapeId,
        transform: TransformCommit,
    },
    EditText {
        id: ShapeId,
        text: String,
    },
    Undo,
    Redo,
}

/// The sketch editor.
///
/// Owns the document, the active tool and gesture, and the conversion status.
/// Input handlers take `&mut self`; there is no shared global state.
pub struct Editor {
    document: Document,
    tools: ToolManager,
    geometry: Box<dyn Geometry>,
    config: EditorConfig,
    hovered: Option<ShapeId>,
    modifiers: Modifiers,
    text_edit: Option<TextEdit>,
    conversion: ConversionState,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor that measures shapes from their model attributes.
    pub fn new(config: EditorConfig) -> Self {
        let geometry = Box::new(ModelGeometry::new(config.hit_tolerance));
        Self::with_geometry(config, geometry)
    }

    /// Create an editor with geometry supplied by the renderer.
    pub fn with_geometry(config: EditorConfig, geometry: Box<dyn Geometry>) -> Self {
        Self {
            document: Document::with_history_limit(config.max_history),
            tools: ToolManager::new(),
            geometry,
            config,
            hovered: None,
            modifiers: Modifiers::default(),
            text_edit: None,
            conversion: ConversionState::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool()
    }

    pub fn gesture(&self) -> &Gesture {
        self.tools.gesture()
    }

    pub fn hovered(&self) -> Option<&ShapeId> {
        self.hovered.as_ref()
    }

    pub fn text_edit(&self) -> Option<&TextEdit> {
        self.text_edit.as_ref()
    }

    pub fn conversion(&self) -> &ConversionState {
        &self.conversion
    }

    // --- Queries for the renderer ---

    /// The topmost shape under `point`.
    pub fn shape_at(&self, point: Point) -> Option<ShapeId> {
        topmost_at_point(self.document.shapes(), point, self.geometry.as_ref()).map(|s| s.id().clone())
    }

    /// Shapes in paint order.
    pub fn render_list(&self) -> Vec<&Shape> {
        self.document.store().ordered()
    }

    /// The normalized marquee while one is being dragged.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self.tools.gesture() {
            Gesture::Marquee(marquee) => Some(marquee.to_rect()),
            _ => None,
        }
    }

    /// The shape a drawing gesture would commit right now.
    pub fn preview_shape(&self) -> Option<Shape> {
        self.tools.preview(&self.config.defaults)
    }

    /// Shapes that get transform handles. Empty while a marquee is active.
    pub fn transform_targets(&self) -> Vec<ShapeId> {
        if matches!(self.tools.gesture(), Gesture::Marquee(_)) {
            return Vec::new();
        }
        self.document.selection_targets()
    }

    pub fn cursor(&self) -> CursorKind {
        cursor_for(
            self.tools.current_tool(),
            self.hovered.is_some(),
            self.tools.gesture().is_dragging(),
            self.modifiers.has(self.config.clone_modifier),
        )
    }

    // --- Input ---

    /// Update the held modifiers without a pointer event.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Route a pointer event. Only the primary button starts or ends gestures.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => {
                self.modifiers = modifiers;
                if button == MouseButton::Left {
                    self.pointer_down(position, modifiers);
                }
            }
            PointerEvent::Move {
                position,
                modifiers,
            } => {
                self.modifiers = modifiers;
                self.pointer_move(position);
            }
            PointerEvent::Up {
                position,
                button,
                modifiers,
            } => {
                self.modifiers = modifiers;
                if button == MouseButton::Left {
                    self.pointer_up(position);
                }
            }
            PointerEvent::DoubleClick { position } => self.double_click(position),
        }
    }

    pub fn pointer_down(&mut self, position: Point, modifiers: Modifiers) {
        self.modifiers = modifiers;
        if !self.tools.gesture().is_idle() {
            // The matching release never arrived.
            self.cancel_gesture();
        }
        self.commit_text_edit();

        let hit = self.shape_at(position);
        match self.tools.current_tool() {
            ToolKind::Select => self.select_tool_down(position, hit, modifiers),
            ToolKind::Rectangle | ToolKind::Circle | ToolKind::Arrow => match hit {
                Some(id) => {
                    self.document.select(&id);
                }
                None => self.tools.set_gesture(Gesture::Drawing {
                    start: position,
                    current: position,
                }),
            },
            ToolKind::Text => match hit {
                Some(id) => {
                    self.document.select(&id);
                }
                None => {
                    let shape = default_text(position, &self.config.defaults);
                    let id = self.document.create(shape);
                    log::debug!("Placed text {}", id);
                    // Back to select with the new text still selected.
                    self.tools.set_tool(ToolKind::Select);
                }
            },
        }
        log::debug!("Pointer down at {:?}: {}", position, self.tools.gesture().name());
    }

    fn select_tool_down(&mut self, position: Point, hit: Option<ShapeId>, modifiers: Modifiers) {
        let Some(id) = hit else {
            self.document.clear_selection();
            self.tools.set_gesture(Gesture::Marquee(Marquee::new(position)));
            return;
        };
        let Some(origin) = self.document.get(&id).map(Shape::position) else {
            return;
        };

        if modifiers.has(self.config.clone_modifier) {
            self.tools
                .set_gesture(Gesture::Cloning(CloneDrag::new(id, position, origin)));
            return;
        }

        let multi = self.document.selected_ids();
        let originals: Vec<(ShapeId, Point)> = if multi.len() >= 2 && multi.contains(&id) {
            self.document
                .shapes()
                .iter()
                .filter(|s| multi.contains(s.id()))
                .map(|s| (s.id().clone(), s.position()))
                .collect()
        } else {
            self.document.select(&id);
            vec![(id, origin)]
        };
        self.tools
            .set_gesture(Gesture::Dragging(DragState::new(position, originals)));
    }

    pub fn pointer_move(&mut self, position: Point) {
        self.hovered = self.shape_at(position);

        let next = match self.tools.take_gesture() {
            Gesture::Idle => Gesture::Idle,
            Gesture::Drawing { start, .. } => Gesture::Drawing {
                start,
                current: position,
            },
            Gesture::Marquee(mut marquee) => {
                marquee.current = position;
                Gesture::Marquee(marquee)
            }
            Gesture::Dragging(mut drag) => {
                drag.current = position;
                self.apply_drag(&mut drag);
                Gesture::Dragging(drag)
            }
            Gesture::Cloning(clone) => match self.advance_clone(clone, position) {
                Some(clone) => Gesture::Cloning(clone),
                None => Gesture::Idle,
            },
        };
        self.tools.set_gesture(next);
    }

    pub fn pointer_up(&mut self, position: Point) {
        match self.tools.take_gesture() {
            Gesture::Idle => {}
            Gesture::Drawing { start, .. } => {
                let tool = self.tools.current_tool();
                match draw_shape(tool, start, position, &self.config.defaults) {
                    Some(shape) if is_too_small(&shape, self.config.min_shape_size) => {
                        log::debug!("Discarded {} below minimum size", tool);
                    }
                    Some(shape) => {
                        let id = self.document.create(shape);
                        log::debug!("Drew {} {}", tool, id);
                    }
                    None => {}
                }
            }
            Gesture::Marquee(mut marquee) => {
                marquee.current = position;
                let hits = shapes_in_rect(
                    self.document.shapes(),
                    marquee.to_rect(),
                    self.geometry.as_ref(),
                );
                log::debug!("Marquee selected {} shapes", hits.len());
                self.document.apply_marquee(hits);
            }
            Gesture::Dragging(mut drag) => {
                if position != drag.current {
                    drag.current = position;
                    self.apply_drag(&mut drag);
                }
                if self.config.history_granularity == HistoryGranularity::PerGesture
                    && drag.has_moved()
                {
                    self.record_drag(&drag);
                }
            }
            Gesture::Cloning(clone) => {
                self.finish_clone(clone, position);
                self.tools.set_tool(ToolKind::Select);
            }
        }
    }

    /// Double-click a text shape with the select tool to edit it.
    pub fn double_click(&mut self, position: Point) {
        if self.tools.current_tool() != ToolKind::Select {
            return;
        }
        if let Some(id) = self.shape_at(position) {
            self.begin_text_edit(&id);
        }
    }

    /// Handle a key press. Returns true if it triggered something.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        self.modifiers = event.modifiers;

        if self.text_edit.is_some() {
            return match event.key {
                Key::Enter => self.commit_text_edit(),
                Key::Escape => {
                    self.cancel_text_edit();
                    true
                }
                _ => false,
            };
        }

        let Some(action) = ShortcutRegistry::resolve(&event) else {
            return false;
        };
        log::debug!("Shortcut {:?}", action);
        match action {
            ShortcutAction::DeleteSelected => self.delete_selected(),
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Cancel => {
                self.cancel_gesture();
                true
            }
            ShortcutAction::SetTool(tool) => {
                self.set_tool(tool);
                true
            }
        }
    }

    // --- Gestures ---

    fn apply_drag(&mut self, drag: &mut DragState) {
        let patches = drag_patches(drag);
        match self.config.history_granularity {
            HistoryGranularity::PerUpdate => {
                self.document.update_many(&patches);
                drag.recorded += 1;
            }
            HistoryGranularity::PerGesture => {
                for (id, patch) in &patches {
                    self.document.update_untracked(id, patch);
                }
            }
        }
    }

    /// Collapse an untracked drag into one undo step.
    fn record_drag(&mut self, drag: &DragState) {
        for (id, origin) in &drag.originals {
            self.document
                .update_untracked(id, &ShapePatch::position(*origin));
        }
        self.document.update_many(&drag_patches(drag));
    }

    fn move_clone(&mut self, clone: &mut CloneDrag, id: &ShapeId, position: Point) {
        let patch = ShapePatch::position(position);
        match self.config.history_granularity {
            HistoryGranularity::PerUpdate => {
                self.document.update(id, &patch);
                clone.recorded += 1;
            }
            HistoryGranularity::PerGesture => {
                self.document.update_untracked(id, &patch);
            }
        }
    }

    /// Returns `None` once the gesture has nothing left to do.
    fn advance_clone(&mut self, mut clone: CloneDrag, position: Point) -> Option<CloneDrag> {
        let target = clone.target_position(position);
        match clone.clone.clone() {
            Some(id) => self.move_clone(&mut clone, &id, target),
            None if clone.exceeds_threshold(position, self.config.clone_drag_threshold) => {
                let id = self.document.duplicate_at(&clone.source, target)?;
                clone.clone = Some(id);
                clone.recorded += 1;
            }
            None => {}
        }
        Some(clone)
    }

    fn finish_clone(&mut self, clone: CloneDrag, position: Point) {
        let Some(clone) = self.advance_clone(clone, position) else {
            return;
        };
        if clone.is_pending() {
            // Released without crossing the threshold: a click.
            self.document
                .clone_shape(&clone.source, self.config.clone_offset);
        }
    }

    /// Abandon the gesture in progress.
    ///
    /// Dragged shapes go back where they were and a pending duplicate is
    /// removed. Undo entries the gesture pushed are dropped with it.
    pub fn cancel_gesture(&mut self) {
        match self.tools.take_gesture() {
            Gesture::Dragging(drag) => {
                self.document.discard_recent(drag.recorded);
                for (id, origin) in &drag.originals {
                    self.document
                        .update_untracked(id, &ShapePatch::position(*origin));
                }
                log::debug!("Drag cancelled");
            }
            Gesture::Cloning(CloneDrag {
                clone: Some(id),
                recorded,
                ..
            }) => {
                self.document.discard_recent(recorded);
                self.document.remove_untracked(&id);
                log::debug!("Clone {} cancelled", id);
            }
            _ => {}
        }
        self.cancel_text_edit();
    }

    /// Switch tools. Drops the gesture in progress and the primary selection.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.cancel_gesture();
        self.tools.set_tool(tool);
        self.document.clear_primary();
        log::debug!("Tool set to {}", tool);
    }

    // --- Document operations ---

    /// Delete the primary selection. Returns false if nothing is selected.
    pub fn delete_selected(&mut self) -> bool {
        match self.document.selected_id().cloned() {
            Some(id) => self.document.delete(&id),
            None => false,
        }
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        self.document.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        self.document.redo()
    }

    /// Bake a finished transform into the shape.
    ///
    /// Returns false (recording nothing) for an unknown id.
    pub fn commit_transform(&mut self, id: &ShapeId, commit: TransformCommit) -> bool {
        let Some(shape) = self.document.get(id) else {
            return false;
        };
        let mut patch = shape.scaled_patch(commit.scale_x, commit.scale_y);
        patch.x = Some(commit.x);
        patch.y = Some(commit.y);
        patch.rotation = Some(commit.rotation);
        self.document.update(id, &patch)
    }

    /// Start editing a text shape. Returns the current text.
    pub fn begin_text_edit(&mut self, id: &ShapeId) -> Option<&str> {
        let text = self.document.get(id)?.as_text()?.text.clone();
        self.text_edit = Some(TextEdit {
            id: id.clone(),
            original: text.clone(),
            draft: text,
        });
        self.text_edit.as_ref().map(|edit| edit.draft.as_str())
    }

    /// Replace the draft of the text being edited.
    pub fn set_text_draft(&mut self, text: impl Into<String>) -> bool {
        match &mut self.text_edit {
            Some(edit) => {
                edit.draft = text.into();
                true
            }
            None => false,
        }
    }

    /// Write the draft back. Unchanged text records nothing.
    pub fn commit_text_edit(&mut self) -> bool {
        let Some(edit) = self.text_edit.take() else {
            return false;
        };
        if edit.draft == edit.original || self.document.get(&edit.id).is_none() {
            return false;
        }
        self.document.update(&edit.id, &ShapePatch::text(edit.draft))
    }

    pub fn cancel_text_edit(&mut self) {
        self.text_edit = None;
    }

    pub fn export_json(&self) -> EditorResult<String> {
        self.document.export_json()
    }

    /// Replace the sketch. On failure nothing changes.
    pub fn import_json(&mut self, json: &str) -> EditorResult<()> {
        self.document.import_json(json)?;
        self.tools.set_gesture(Gesture::Idle);
        self.text_edit = None;
        self.hovered = None;
        Ok(())
    }

    /// Run a scripted command.
    pub fn apply(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::SetTool { tool } => self.set_tool(tool),
            EditorCommand::PointerDown { x, y, modifiers } => {
                self.handle_pointer(PointerEvent::Down {
                    position: Point::new(x, y),
                    button: MouseButton::Left,
                    modifiers,
                });
            }
            EditorCommand::PointerMove { x, y, modifiers } => {
                self.handle_pointer(PointerEvent::Move {
                    position: Point::new(x, y),
                    modifiers,
                });
            }
            EditorCommand::PointerUp { x, y, modifiers } => {
                self.handle_pointer(PointerEvent::Up {
                    position: Point::new(x, y),
                    button: MouseButton::Left,
                    modifiers,
                });
            }
            EditorCommand::DoubleClick { x, y } => self.double_click(Point::new(x, y)),
            EditorCommand::Key { key, modifiers } => {
                self.handle_key(KeyEvent::new(key, modifiers));
            }
            EditorCommand::Create { shape } => {
                self.document.create(shape);
            }
            EditorCommand::Update { id, patch } => {
                self.document.update(&id, &patch);
            }
            EditorCommand::Delete { id } => {
                self.document.delete(&id);
            }
            EditorCommand::BringToFront { id } => {
                self.document.bring_to_front(&id);
            }
            EditorCommand::Select { id } => {
                self.document.select(&id);
            }
            EditorCommand::ClearSelection => self.document.clear_selection(),
            EditorCommand::CommitTransform { id, transform } => {
                self.commit_transform(&id, transform);
            }
            EditorCommand::EditText { id, text } => {
                if self.begin_text_edit(&id).is_some() {
                    self.set_text_draft(text);
                    self.commit_text_edit();
                }
            }
            EditorCommand::Undo => {
                self.undo();
            }
            EditorCommand::Redo => {
                self.redo();
            }
        }
    }

    // --- Conversion ---

    /// Capture the sketch for a conversion request.
    ///
    /// Returns `None` (and leaves the status alone) when there is nothing to convert.
    pub fn begin_conversion(&mut self) -> EditorResult<Option<ConversionRequest>> {
        if self.document.is_empty() {
            log::debug!("Skipping conversion of empty sketch");
            return Ok(None);
        }
        let sketch =
            serde_json::to_string(self.document.shapes()).map_err(EditorError::Serialization)?;
        Ok(Some(self.conversion.begin(sketch)))
    }

    /// Store the outcome of a conversion. Stale outcomes are ignored.
    pub fn finish_conversion(
        &mut self,
        ticket: u64,
        outcome: ConversionResult<GeneratedCode>,
    ) -> bool {
        self.conversion.finish(ticket, outcome)
    }

    /// Convert the current sketch with `generator`.
    ///
    /// Returns false if the sketch was empty.
    pub async fn convert(&mut self, generator: &dyn CodeGenerator) -> EditorResult<bool> {
        let Some(request) = self.begin_conversion()? else {
            return Ok(false);
        };
        let outcome = generator.generate(&request.sketch).await;
        self.finish_conversion(request.ticket, outcome);
        Ok(true)
    }

    pub fn set_show_preview(&mut self, show: bool) {
        self.conversion.set_show_preview(show);
    }
}

fn drag_patches(drag: &DragState) -> Vec<(ShapeId, ShapePatch)> {
    let delta = drag.delta();
    drag.originals
        .iter()
        .map(|(id, origin)| (id.clone(), ShapePatch::position(*origin + delta)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CloneModifier;
    use crate::convert::{ConversionError, MockGenerator};
    use crate::shapes::Rectangle;

    fn editor() -> Editor {
        Editor::default()
    }

    fn per_gesture() -> Editor {
        Editor::new(EditorConfig {
            history_granularity: HistoryGranularity::PerGesture,
            ..EditorConfig::default()
        })
    }

    fn drag(editor: &mut Editor, from: (f64, f64), to: (f64, f64), modifiers: Modifiers) {
        editor.pointer_down(Point::new(from.0, from.1), modifiers);
        editor.pointer_move(Point::new(to.0, to.1));
        editor.pointer_up(Point::new(to.0, to.1));
    }

    fn click(editor: &mut Editor, at: (f64, f64), modifiers: Modifiers) {
        editor.pointer_down(Point::new(at.0, at.1), modifiers);
        editor.pointer_up(Point::new(at.0, at.1));
    }

    /// 100x100 rectangle at the origin, returned selected.
    fn with_rect(editor: &mut Editor) -> ShapeId {
        editor.set_tool(ToolKind::Rectangle);
        drag(editor, (0.0, 0.0), (100.0, 100.0), Modifiers::NONE);
        editor.set_tool(ToolKind::Select);
        editor.document().shapes()[0].id().clone()
    }

    fn position(editor: &Editor, id: &ShapeId) -> Option<Point> {
        editor.document().get(id).map(Shape::position)
    }

    #[test]
    fn test_draw_rectangle() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Rectangle);
        editor.pointer_down(Point::new(100.0, 100.0), Modifiers::NONE);
        editor.pointer_move(Point::new(40.0, 70.0));

        let preview = editor.preview_shape().unwrap();
        assert_eq!(preview.bounds(), Rect::new(40.0, 70.0, 100.0, 100.0));
        assert!(editor.document().is_empty());

        editor.pointer_up(Point::new(40.0, 70.0));
        assert_eq!(editor.document().len(), 1);
        assert!(editor.preview_shape().is_none());
        let shape = &editor.document().shapes()[0];
        assert_eq!(shape.position(), Point::new(40.0, 70.0));
        assert_eq!(editor.document().selected_id(), Some(shape.id()));
        assert_eq!(editor.tool(), ToolKind::Rectangle);
    }

    #[test]
    fn test_draw_circle_and_arrow() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Circle);
        drag(&mut editor, (200.0, 200.0), (203.0, 204.0), Modifiers::NONE);
        editor.set_tool(ToolKind::Arrow);
        drag(&mut editor, (300.0, 300.0), (310.0, 280.0), Modifiers::NONE);

        let shapes = editor.document().shapes();
        let Shape::Circle(circle) = &shapes[0] else {
            panic!("expected circle");
        };
        assert!((circle.radius - 5.0).abs() < 1e-9);
        assert_eq!(shapes[1].as_arrow().map(|a| a.points), Some([0.0, 0.0, 10.0, -20.0]));
        assert_eq!(shapes[1].z_index(), 2);
    }

    #[test]
    fn test_min_shape_size() {
        let mut editor = Editor::new(EditorConfig {
            min_shape_size: 3.0,
            ..EditorConfig::default()
        });
        editor.set_tool(ToolKind::Rectangle);
        click(&mut editor, (10.0, 10.0), Modifiers::NONE);
        assert!(editor.document().is_empty());

        let mut editor = self::editor();
        editor.set_tool(ToolKind::Rectangle);
        click(&mut editor, (10.0, 10.0), Modifiers::NONE);
        assert_eq!(editor.document().len(), 1);
    }

    #[test]
    fn test_drawing_tool_on_shape_selects_it() {
        let mut editor = editor();
        let id = with_rect(&mut editor);
        editor.set_tool(ToolKind::Circle);
        assert!(editor.document().selected_id().is_none());

        click(&mut editor, (50.0, 50.0), Modifiers::NONE);
        assert_eq!(editor.document().selected_id(), Some(&id));
        assert_eq!(editor.document().len(), 1);
    }

    #[test]
    fn test_text_tool_places_text_and_returns_to_select() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Text);
        click(&mut editor, (300.0, 300.0), Modifiers::NONE);

        assert_eq!(editor.tool(), ToolKind::Select);
        let shape = &editor.document().shapes()[0];
        let text = shape.as_text().unwrap();
        assert_eq!(text.text, "Text");
        assert!((text.font_size - 20.0).abs() < f64::EPSILON);
        assert_eq!(editor.document().selected_id(), Some(shape.id()));
    }

    #[test]
    fn test_set_tool_clears_primary() {
        let mut editor = editor();
        with_rect(&mut editor);
        click(&mut editor, (50.0, 50.0), Modifiers::NONE);
        assert!(editor.document().selected_id().is_some());

        editor.set_tool(ToolKind::Arrow);
        assert!(editor.document().selected_id().is_none());
    }

    #[test]
    fn test_marquee_selection() {
        let mut editor = editor();
        let mut near = Rectangle::new(Point::new(10.0, 10.0), 20.0, 20.0);
        near.base.id = ShapeId::from("near");
        let mut far = Rectangle::new(Point::new(200.0, 200.0), 20.0, 20.0);
        far.base.id = ShapeId::from("far");
        editor.apply(EditorCommand::Create { shape: Shape::Rectangle(near) });
        editor.apply(EditorCommand::Create { shape: Shape::Rectangle(far) });

        editor.pointer_down(Point::new(100.0, 100.0), Modifiers::NONE);
        editor.pointer_move(Point::new(0.0, 0.0));
        assert_eq!(editor.marquee_rect(), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert!(editor.transform_targets().is_empty());
        editor.pointer_up(Point::new(0.0, 0.0));

        let near = ShapeId::from("near");
        assert_eq!(editor.document().selected_id(), Some(&near));
        assert_eq!(editor.document().selected_ids().len(), 1);
        assert_eq!(editor.transform_targets(), vec![near]);
        assert!(editor.marquee_rect().is_none());
    }

    #[test]
    fn test_marquee_several_hits_clears_primary() {
        let mut editor = editor();
        editor.apply(EditorCommand::Create {
            shape: Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 20.0, 20.0)),
        });
        editor.apply(EditorCommand::Create {
            shape: Shape::Rectangle(Rectangle::new(Point::new(50.0, 50.0), 20.0, 20.0)),
        });

        drag(&mut editor, (0.0, 0.0), (100.0, 100.0), Modifiers::NONE);
        assert!(editor.document().selected_id().is_none());
        assert_eq!(editor.document().selected_ids().len(), 2);
        assert_eq!(editor.transform_targets().len(), 2);
    }

    #[test]
    fn test_drag_moves_shape_every_update_is_undoable() {
        let mut editor = editor();
        let id = with_rect(&mut editor);
        let depth = editor.document().undo_depth();

        editor.pointer_down(Point::new(50.0, 50.0), Modifiers::NONE);
        assert!(editor.gesture().is_dragging());
        assert_eq!(editor.cursor(), CursorKind::Grabbing);
        editor.pointer_move(Point::new(60.0, 50.0));
        editor.pointer_move(Point::new(70.0, 55.0));
        editor.pointer_up(Point::new(70.0, 55.0));

        assert_eq!(position(&editor, &id), Some(Point::new(20.0, 5.0)));
        assert_eq!(editor.document().undo_depth(), depth + 2);

        editor.undo();
        assert_eq!(position(&editor, &id), Some(Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_drag_per_gesture_is_one_step() {
        let mut editor = per_gesture();
        let id = with_rect(&mut editor);
        let depth = editor.document().undo_depth();

        editor.pointer_down(Point::new(50.0, 50.0), Modifiers::NONE);
        editor.pointer_move(Point::new(60.0, 50.0));
        editor.pointer_move(Point::new(70.0, 55.0));
        assert_eq!(editor.document().undo_depth(), depth);
        editor.pointer_up(Point::new(80.0, 60.0));

        assert_eq!(position(&editor, &id), Some(Point::new(30.0, 10.0)));
        assert_eq!(editor.document().undo_depth(), depth + 1);

        editor.undo();
        assert_eq!(position(&editor, &id), Some(Point::ZERO));
        editor.redo();
        assert_eq!(position(&editor, &id), Some(Point::new(30.0, 10.0)));
    }

    #[test]
    fn test_click_without_move_records_nothing() {
        let mut editor = per_gesture();
        with_rect(&mut editor);
        let depth = editor.document().undo_depth();
        click(&mut editor, (50.0, 50.0), Modifiers::NONE);
        assert_eq!(editor.document().undo_depth(), depth);
    }

    #[test]
    fn test_group_drag_moves_multi_selection() {
        let mut editor = editor();
        editor.apply(EditorCommand::Create {
            shape: Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 20.0, 20.0)),
        });
        editor.apply(EditorCommand::Create {
            shape: Shape::Rectangle(Rectangle::new(Point::new(50.0, 50.0), 20.0, 20.0)),
        });
        editor.apply(EditorCommand::Create {
            shape: Shape::Rectangle(Rectangle::new(Point::new(300.0, 300.0), 20.0, 20.0)),
        });
        drag(&mut editor, (0.0, 0.0), (100.0, 100.0), Modifiers::NONE);
        assert_eq!(editor.document().selected_ids().len(), 2);

        drag(&mut editor, (20.0, 20.0), (25.0, 30.0), Modifiers::NONE);
        let positions: Vec<Point> = editor.document().shapes().iter().map(Shape::position).collect();
        assert_eq!(
            positions,
            vec![Point::new(15.0, 20.0), Point::new(55.0, 60.0), Point::new(300.0, 300.0)]
        );
        assert_eq!(editor.document().selected_ids().len(), 2);
    }

    #[test]
    fn test_escape_restores_dragged_shape() {
        let mut editor = editor();
        let id = with_rect(&mut editor);

        editor.pointer_down(Point::new(50.0, 50.0), Modifiers::NONE);
        editor.pointer_move(Point::new(90.0, 90.0));
        assert!(editor.handle_key(KeyEvent::plain(Key::Escape)));
        assert!(editor.gesture().is_idle());
        assert_eq!(position(&editor, &id), Some(Point::ZERO));

        editor.pointer_up(Point::new(90.0, 90.0));
        assert_eq!(position(&editor, &id), Some(Point::ZERO));
    }

    #[test]
    fn test_escape_drops_drag_history() {
        let mut editor = editor();
        let id = with_rect(&mut editor);
        let depth = editor.document().undo_depth();

        editor.pointer_down(Point::new(50.0, 50.0), Modifiers::NONE);
        editor.pointer_move(Point::new(60.0, 50.0));
        editor.pointer_move(Point::new(70.0, 50.0));
        assert_eq!(editor.document().undo_depth(), depth + 2);
        editor.handle_key(KeyEvent::plain(Key::Escape));

        assert_eq!(position(&editor, &id), Some(Point::ZERO));
        assert_eq!(editor.document().undo_depth(), depth);

        // The next undo reverts the drawing, not a half-finished move.
        assert!(editor.undo());
        assert!(editor.document().get(&id).is_none());
        assert!(editor.redo());
        assert_eq!(position(&editor, &id), Some(Point::ZERO));
    }

    #[test]
    fn test_undo_mid_drag_skips_partial_moves() {
        let mut editor = editor();
        let id = with_rect(&mut editor);
        editor.apply(EditorCommand::Update {
            id: id.clone(),
            patch: ShapePatch::position(Point::new(5.0, 5.0)),
        });

        editor.pointer_down(Point::new(50.0, 50.0), Modifiers::NONE);
        editor.pointer_move(Point::new(60.0, 50.0));
        editor.pointer_move(Point::new(70.0, 50.0));
        assert!(editor.undo());

        assert!(editor.gesture().is_idle());
        assert_eq!(position(&editor, &id), Some(Point::ZERO));
    }

    #[test]
    fn test_escape_during_clone_drag_leaves_no_history() {
        let mut editor = editor();
        let source = with_rect(&mut editor);
        let depth = editor.document().undo_depth();

        editor.pointer_down(Point::new(50.0, 50.0), Modifiers::alt());
        editor.pointer_move(Point::new(80.0, 80.0));
        editor.pointer_move(Point::new(90.0, 95.0));
        editor.handle_key(KeyEvent::plain(Key::Escape));

        assert_eq!(editor.document().len(), 1);
        assert_eq!(editor.document().undo_depth(), depth);
        assert!(editor.undo());
        assert!(editor.document().get(&source).is_none());
    }

    #[test]
    fn test_text_placed_above_imported_max_z_index() {
        let mut editor = editor();
        editor
            .import_json(
                r#"[{"id":"top","type":"circle","x":500,"y":500,"radius":5,"fill":"","stroke":"","strokeWidth":1,"zIndex":4294967295}]"#,
            )
            .unwrap();

        editor.set_tool(ToolKind::Text);
        click(&mut editor, (10.0, 10.0), Modifiers::NONE);

        assert_eq!(editor.document().len(), 2);
        let text = editor.document().selected_id().cloned().unwrap();
        let top = editor.document().get(&ShapeId::from("top")).map(Shape::z_index);
        let placed = editor.document().get(&text).map(Shape::z_index);
        assert_eq!(top, Some(1));
        assert_eq!(placed, Some(2));
        assert_eq!(editor.render_list().last().map(|s| s.id()), Some(&text));
    }

    #[test]
    fn test_clone_click_offsets_copy() {
        let mut editor = editor();
        let source = with_rect(&mut editor);
        let depth = editor.document().undo_depth();

        click(&mut editor, (50.0, 50.0), Modifiers::alt());

        assert_eq!(editor.document().len(), 2);
        let clone = editor.document().selected_id().cloned().unwrap();
        assert_ne!(clone, source);
        assert_eq!(position(&editor, &clone), Some(Point::new(10.0, 10.0)));
        assert_eq!(position(&editor, &source), Some(Point::ZERO));
        assert_eq!(editor.document().undo_depth(), depth + 1);
        assert_eq!(editor.tool(), ToolKind::Select);
    }

    #[test]
    fn test_clone_small_move_is_still_a_click() {
        let mut editor = editor();
        with_rect(&mut editor);

        editor.pointer_down(Point::new(50.0, 50.0), Modifiers::alt());
        editor.pointer_move(Point::new(53.0, 55.0));
        editor.pointer_up(Point::new(53.0, 55.0));

        assert_eq!(editor.document().len(), 2);
        let clone = editor.document().selected_id().cloned().unwrap();
        assert_eq!(position(&editor, &clone), Some(Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_clone_drag_creates_exactly_one_copy() {
        let mut editor = editor();
        let source = with_rect(&mut editor);

        editor.pointer_down(Point::new(50.0, 50.0), Modifiers::alt());
        assert_eq!(editor.cursor(), CursorKind::Copy);
        editor.pointer_move(Point::new(52.0, 52.0));
        assert_eq!(editor.document().len(), 1);
        editor.pointer_move(Point::new(60.0, 50.0));
        assert_eq!(editor.document().len(), 2);
        editor.pointer_move(Point::new(80.0, 90.0));
        editor.pointer_move(Point::new(120.0, 130.0));
        editor.pointer_up(Point::new(120.0, 130.0));

        assert_eq!(editor.document().len(), 2);
        let clone = editor.document().selected_id().cloned().unwrap();
        assert_ne!(clone, source);
        assert_eq!(position(&editor, &clone), Some(Point::new(70.0, 80.0)));
        assert_eq!(position(&editor, &source), Some(Point::ZERO));
        assert_eq!(editor.document().get(&clone).map(Shape::z_index), Some(2));
        assert_eq!(editor.tool(), ToolKind::Select);
    }

    #[test]
    fn test_clone_drag_per_gesture_undo_removes_copy() {
        let mut editor = per_gesture();
        with_rect(&mut editor);
        let depth = editor.document().undo_depth();

        drag(&mut editor, (50.0, 50.0), (90.0, 90.0), Modifiers::alt());
        assert_eq!(editor.document().len(), 2);
        assert_eq!(editor.document().undo_depth(), depth + 1);

        editor.undo();
        assert_eq!(editor.document().len(), 1);
    }

    #[test]
    fn test_escape_during_clone_drag_removes_copy() {
        let mut editor = editor();
        let source = with_rect(&mut editor);

        editor.pointer_down(Point::new(50.0, 50.0), Modifiers::alt());
        editor.pointer_move(Point::new(80.0, 80.0));
        assert_eq!(editor.document().len(), 2);
        editor.handle_key(KeyEvent::plain(Key::Escape));

        assert_eq!(editor.document().len(), 1);
        assert!(editor.document().get(&source).is_some());
    }

    #[test]
    fn test_configured_clone_modifier() {
        let mut editor = Editor::new(EditorConfig {
            clone_modifier: CloneModifier::Ctrl,
            ..EditorConfig::default()
        });
        with_rect(&mut editor);

        click(&mut editor, (50.0, 50.0), Modifiers::alt());
        assert_eq!(editor.document().len(), 1);
        click(&mut editor, (50.0, 50.0), Modifiers::ctrl());
        assert_eq!(editor.document().len(), 2);
    }

    #[test]
    fn test_clone_on_empty_canvas_is_a_marquee() {
        let mut editor = editor();
        with_rect(&mut editor);
        editor.pointer_down(Point::new(500.0, 500.0), Modifiers::alt());
        assert!(matches!(editor.gesture(), Gesture::Marquee(_)));
    }

    #[test]
    fn test_delete_key_removes_primary() {
        let mut editor = editor();
        with_rect(&mut editor);
        assert!(!editor.handle_key(KeyEvent::plain(Key::Delete)));

        click(&mut editor, (50.0, 50.0), Modifiers::NONE);
        assert!(editor.handle_key(KeyEvent::plain(Key::Backspace)));
        assert!(editor.document().is_empty());
        assert!(editor.document().selected_id().is_none());
    }

    #[test]
    fn test_undo_redo_shortcuts() {
        let mut editor = editor();
        with_rect(&mut editor);

        assert!(editor.handle_key(KeyEvent::new(Key::Char('z'), Modifiers::ctrl())));
        assert!(editor.document().is_empty());
        assert!(editor.handle_key(KeyEvent::new(Key::Char('z'), Modifiers::ctrl().with_shift())));
        assert_eq!(editor.document().len(), 1);
    }

    #[test]
    fn test_tool_shortcut() {
        let mut editor = editor();
        assert!(editor.handle_key(KeyEvent::plain(Key::Char('r'))));
        assert_eq!(editor.tool(), ToolKind::Rectangle);
        assert_eq!(editor.cursor(), CursorKind::Crosshair);
    }

    #[test]
    fn test_commit_transform_bakes_scale() {
        let mut editor = editor();
        let id = with_rect(&mut editor);

        let commit = TransformCommit {
            x: 5.0,
            y: 6.0,
            rotation: 45.0,
            scale_x: 2.0,
            scale_y: 0.5,
        };
        assert!(editor.commit_transform(&id, commit));

        let Some(Shape::Rectangle(rect)) = editor.document().get(&id) else {
            panic!("expected rectangle");
        };
        assert!((rect.width - 200.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
        assert!((rect.base.rotation - 45.0).abs() < f64::EPSILON);
        assert_eq!(rect.base.position(), Point::new(5.0, 6.0));

        let depth = editor.document().undo_depth();
        assert!(!editor.commit_transform(&ShapeId::from("gone"), commit));
        assert_eq!(editor.document().undo_depth(), depth);
    }

    #[test]
    fn test_text_edit() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Text);
        click(&mut editor, (10.0, 10.0), Modifiers::NONE);
        let id = editor.document().shapes()[0].id().clone();
        let depth = editor.document().undo_depth();

        editor.double_click(Point::new(15.0, 15.0));
        assert_eq!(editor.text_edit().map(|e| e.draft.as_str()), Some("Text"));
        assert!(!editor.commit_text_edit());
        assert_eq!(editor.document().undo_depth(), depth);

        editor.begin_text_edit(&id);
        editor.set_text_draft("Hello");
        assert!(editor.handle_key(KeyEvent::plain(Key::Enter)));
        let text = editor.document().get(&id).and_then(Shape::as_text).unwrap();
        assert_eq!(text.text, "Hello");
        assert_eq!(editor.document().undo_depth(), depth + 1);

        editor.begin_text_edit(&id);
        editor.set_text_draft("Discarded");
        editor.handle_key(KeyEvent::plain(Key::Escape));
        let text = editor.document().get(&id).and_then(Shape::as_text).unwrap();
        assert_eq!(text.text, "Hello");
    }

    #[test]
    fn test_hover_cursor() {
        let mut editor = editor();
        with_rect(&mut editor);
        editor.pointer_move(Point::new(50.0, 50.0));
        assert_eq!(editor.cursor(), CursorKind::Move);
        editor.set_modifiers(Modifiers::alt());
        assert_eq!(editor.cursor(), CursorKind::Copy);
        editor.pointer_move(Point::new(500.0, 500.0));
        assert_eq!(editor.cursor(), CursorKind::Default);
    }

    #[test]
    fn test_render_list_in_z_order() {
        let mut editor = editor();
        let first = with_rect(&mut editor);
        editor.apply(EditorCommand::Create {
            shape: Shape::Rectangle(Rectangle::new(Point::new(20.0, 20.0), 10.0, 10.0)),
        });
        editor.apply(EditorCommand::BringToFront { id: first.clone() });

        let order: Vec<&ShapeId> = editor.render_list().into_iter().map(Shape::id).collect();
        assert_eq!(order.last(), Some(&&first));
        assert_eq!(editor.shape_at(Point::new(25.0, 25.0)), Some(first));
    }

    #[test]
    fn test_import_failure_keeps_state() {
        let mut editor = editor();
        with_rect(&mut editor);
        let before = editor.document().snapshot();

        assert!(editor.import_json("[{\"type\":\"rectangle\"}]").is_err());
        assert_eq!(editor.document().snapshot(), before);
        assert!(editor.document().can_undo());
    }

    #[test]
    fn test_script_commands_parse() {
        let script = r#"[
            {"command":"set_tool","tool":"circle"},
            {"command":"pointer_down","x":10,"y":10},
            {"command":"pointer_move","x":13,"y":14},
            {"command":"pointer_up","x":13,"y":14},
            {"command":"key","key":{"char":"z"},"modifiers":{"ctrl":true}},
            {"command":"redo"}
        ]"#;
        let commands: Vec<EditorCommand> = serde_json::from_str(script).unwrap();
        let mut editor = editor();
        for command in commands {
            editor.apply(command);
        }
        assert_eq!(editor.document().len(), 1);
        assert_eq!(editor.document().shapes()[0].kind_name(), "circle");
    }

    #[test]
    fn test_convert_with_mock() {
        let mut editor = editor();
        assert!(!pollster::block_on(editor.convert(&MockGenerator::new())).unwrap());
        assert!(!editor.conversion().is_busy());

        with_rect(&mut editor);
        assert!(pollster::block_on(editor.convert(&MockGenerator::new())).unwrap());

        let conversion = editor.conversion();
        assert!(!conversion.is_busy());
        assert!(conversion.show_preview());
        assert!(conversion.error().is_none());
        assert!(conversion.result().unwrap().files.contains_key("App.tsx"));
    }

    #[test]
    fn test_conversion_failure_and_stale_result() {
        let mut editor = editor();
        let id = with_rect(&mut editor);
        let before = editor.document().snapshot();

        let first = editor.begin_conversion().unwrap().unwrap();
        let second = editor.begin_conversion().unwrap().unwrap();
        assert!(first.sketch.contains(id.as_str()));

        assert!(!editor.finish_conversion(first.ticket, Err(ConversionError::EmptyResponse)));
        assert!(editor.conversion().is_busy());
        assert!(editor.finish_conversion(
            second.ticket,
            Err(ConversionError::MalformedResponse("nope".to_string()))
        ));
        assert_eq!(
            editor.conversion().error(),
            Some("Failed to parse AI response as JSON: nope")
        );
        assert_eq!(editor.document().snapshot(), before);
    }
}
