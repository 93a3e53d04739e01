//! Canvas document and state management.

use crate::animation::AnimationDriver;
use crate::config::EditorConfig;
use crate::events::{CanvasEvent, EventQueue, ShapeParameters};
use crate::history::History;
use crate::input::{InputState, MouseButton, PointerEvent};
use crate::selection::{DragMode, ManipulationState, apply_resize, apply_rotation, hit_test_selection};
use crate::shapes::{
    SerializableColor, Shape, ShapeHandle, ShapeId, ShapeStyle, ShapeTrait,
    clamp_sides,
};
use crate::storage::{self, Drawing, Storage, StorageResult};
use crate::tools::{ToolKind, ToolManager, ToolState};
use kurbo::{Point, Size};
use std::path::Path;
use std::time::Duration;

/// The ordered shape list (back to front) with its undo history.
#[derive(Debug, Default)]
pub struct CanvasDocument {
    shapes: Vec<ShapeHandle>,
    history: History,
    /// Unsaved changes since the last save or load.
    modified: bool,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document keeping at most `limit` undo states.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            history: History::new(limit),
            ..Self::default()
        }
    }

    /// Shapes in z-order (back to front).
    pub fn shapes(&self) -> &[ShapeHandle] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get a shape by ID.
    pub fn get_shape(&self, id: ShapeId) -> Option<&ShapeHandle> {
        self.shapes.iter().find(|handle| handle.borrow().id() == id)
    }

    /// Z-index of a shape.
    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|handle| handle.borrow().id() == id)
    }

    /// Push current state to the undo stack (call before a structural change).
    pub fn push_undo(&mut self) {
        self.history.push(&self.shapes);
    }

    /// Append a shape on top, recording an undo step.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeHandle {
        self.push_undo();
        let handle = shape.into_handle();
        self.shapes.push(handle.clone());
        self.modified = true;
        handle
    }

    /// Remove a shape, recording an undo step if it was present.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<ShapeHandle> {
        let index = self.index_of(id)?;
        self.push_undo();
        self.modified = true;
        Some(self.shapes.remove(index))
    }

    /// Remove every shape. Returns false (and records nothing) when already empty.
    pub fn clear(&mut self) -> bool {
        if self.shapes.is_empty() {
            return false;
        }
        self.push_undo();
        self.shapes.clear();
        self.modified = true;
        true
    }

    /// Move a shape one layer forward (towards front).
    /// Returns true if the shape was moved, false if already at front.
    pub fn bring_forward(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos + 1 < self.shapes.len() => {
                self.push_undo();
                self.shapes.swap(pos, pos + 1);
                self.modified = true;
                true
            }
            _ => false,
        }
    }

    /// Move a shape one layer backward (towards back).
    /// Returns true if the shape was moved, false if already at back.
    pub fn send_backward(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos > 0 => {
                self.push_undo();
                self.shapes.swap(pos, pos - 1);
                self.modified = true;
                true
            }
            _ => false,
        }
    }

    /// Undo the last structural change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.shapes) {
            Some(shapes) => {
                self.shapes = shapes;
                self.modified = true;
                true
            }
            None => false,
        }
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.shapes) {
            Some(shapes) => {
                self.shapes = shapes;
                self.modified = true;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Swap in a freshly loaded shape list. History and the modified flag reset.
    pub fn replace_shapes(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes.into_iter().map(Shape::into_handle).collect();
        self.history.clear();
        self.modified = false;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Set the modified flag. Returns true if it changed.
    pub fn set_modified(&mut self, modified: bool) -> bool {
        let changed = self.modified != modified;
        self.modified = modified;
        changed
    }

    pub fn mark_saved(&mut self) -> bool {
        self.set_modified(false)
    }

    /// Topmost shape containing `point`.
    pub fn shape_at_point(&self, point: Point) -> Option<ShapeHandle> {
        self.shapes
            .iter()
            .rev()
            .find(|handle| handle.borrow().contains(point))
            .cloned()
    }

    /// Display names in z-order, e.g. `"Rectangle 0"`.
    pub fn shape_names(&self) -> Vec<String> {
        self.shapes
            .iter()
            .enumerate()
            .map(|(index, handle)| format!("{} {}", handle.borrow().name(), index))
            .collect()
    }

    /// Detached copies of the shapes, for saving.
    pub fn to_shapes(&self) -> Vec<Shape> {
        self.shapes.iter().map(|handle| handle.borrow().clone()).collect()
    }
}

/// Editor state around a document: tools, selection, pointer input,
/// animation and the outgoing event queue.
#[derive(Debug)]
pub struct Canvas {
    /// The document being edited.
    pub document: CanvasDocument,
    /// Tool manager.
    pub tool_manager: ToolManager,
    /// Pointer state between events.
    pub input: InputState,
    selection: Option<ShapeId>,
    animation: AnimationDriver,
    events: EventQueue,
    config: EditorConfig,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with default settings.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            document: CanvasDocument::with_history_limit(config.max_undo_history),
            tool_manager: ToolManager::new(
                ShapeStyle::new(config.pen_color, config.pen_width),
                config.polygon_sides,
            ),
            input: InputState::new(),
            selection: None,
            animation: AnimationDriver::new(config.animation_period()),
            events: EventQueue::new(),
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn shapes(&self) -> &[ShapeHandle] {
        self.document.shapes()
    }

    /// Take all events raised since the last poll.
    pub fn poll_events(&mut self) -> Vec<CanvasEvent> {
        self.events.drain()
    }

    // --- selection ---

    pub fn selection(&self) -> Option<ShapeId> {
        self.selection
    }

    pub fn selected_shape(&self) -> Option<ShapeHandle> {
        self.selection
            .and_then(|id| self.document.get_shape(id))
            .cloned()
    }

    /// Select a shape (or nothing) and announce it.
    pub fn select(&mut self, id: Option<ShapeId>) {
        self.selection = id;
        match self.selected_shape() {
            Some(handle) => {
                let shape = handle.borrow();
                self.events
                    .push(CanvasEvent::SelectionChanged(Some(shape.name().to_string())));
                self.events
                    .push(CanvasEvent::ShapeParameters(ShapeParameters::of(&shape)));
            }
            None => {
                self.selection = None;
                self.events.push(CanvasEvent::SelectionChanged(None));
            }
        }
        self.request_redraw();
    }

    /// Select the shape at z-index `index`. Out-of-range indices are ignored.
    pub fn select_index(&mut self, index: usize) {
        let Some(id) = self.document.shapes().get(index).map(|h| h.borrow().id()) else {
            log::debug!("Ignoring selection of index {index}");
            return;
        };
        self.select(Some(id));
    }

    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.events.push(CanvasEvent::SelectionChanged(None));
            self.request_redraw();
        }
    }

    // --- tool and pen ---

    pub fn tool(&self) -> ToolKind {
        self.tool_manager.current_tool
    }

    /// Set the current tool. Drawing tools drop the selection.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool_manager.set_tool(tool) {
            self.request_redraw();
        }
        if tool.is_drawing() {
            self.clear_selection();
        }
    }

    pub fn pen_color(&self) -> SerializableColor {
        self.tool_manager.current_style.stroke_color
    }

    pub fn pen_width(&self) -> f64 {
        self.tool_manager.current_style.stroke_width()
    }

    /// Set the pen color for new shapes and the selected one.
    pub fn set_pen_color(&mut self, color: SerializableColor) {
        self.tool_manager.current_style.stroke_color = color;
        self.edit_selected(|shape| shape.style_mut().stroke_color = color);
    }

    /// Set the pen width for new shapes and the selected one.
    pub fn set_pen_width(&mut self, width: f64) {
        self.tool_manager.current_style.set_stroke_width(width);
        self.edit_selected(|shape| shape.style_mut().set_stroke_width(width));
    }

    /// Set the fill of the selected shape.
    pub fn set_fill(&mut self, color: SerializableColor, enabled: bool) {
        self.edit_selected(|shape| shape.set_fill(color, enabled));
    }

    /// Set the absolute rotation of the selected shape, in degrees.
    pub fn rotate_selected(&mut self, degrees: f64) {
        self.edit_selected(|shape| shape.rotate(degrees));
    }

    pub fn resize_selected(&mut self, size: Size) {
        self.edit_selected(|shape| shape.resize(size));
    }

    /// Side count for new regular polygons, also applied to a selected one.
    pub fn set_polygon_sides(&mut self, sides: u32) {
        self.tool_manager.polygon_sides = clamp_sides(sides);
        let is_regular = self
            .selected_shape()
            .is_some_and(|handle| handle.borrow().as_regular_polygon().is_some());
        if is_regular {
            self.edit_selected(|shape| {
                if let Some(polygon) = shape.as_regular_polygon_mut() {
                    polygon.set_sides(sides);
                }
            });
        }
    }

    pub fn polygon_sides(&self) -> u32 {
        self.tool_manager.polygon_sides
    }

    /// Apply an attribute edit to the selected shape. Marks the document
    /// modified without recording history.
    fn edit_selected(&mut self, edit: impl FnOnce(&mut Shape)) {
        let Some(handle) = self.selected_shape() else {
            return;
        };
        {
            let mut shape = handle.borrow_mut();
            edit(&mut *shape);
            self.events
                .push(CanvasEvent::ShapeParameters(ShapeParameters::of(&shape)));
        }
        self.set_modified(true);
        self.request_redraw();
    }

    // --- structural commands ---

    pub fn undo(&mut self) -> bool {
        if !self.document.undo() {
            return false;
        }
        self.clear_selection();
        self.structure_changed();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.document.redo() {
            return false;
        }
        self.clear_selection();
        self.structure_changed();
        true
    }

    /// Remove every shape. No-op on an empty canvas.
    pub fn clear(&mut self) -> bool {
        if !self.document.clear() {
            return false;
        }
        self.clear_selection();
        self.structure_changed();
        true
    }

    /// Delete the selected shape.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection else {
            return false;
        };
        if self.document.remove_shape(id).is_none() {
            return false;
        }
        self.clear_selection();
        self.structure_changed();
        true
    }

    /// Swap the selected shape with the one above it.
    pub fn move_selected_up(&mut self) -> bool {
        match self.selection {
            Some(id) if self.document.bring_forward(id) => {
                self.structure_changed();
                true
            }
            _ => false,
        }
    }

    /// Swap the selected shape with the one below it.
    pub fn move_selected_down(&mut self) -> bool {
        match self.selection {
            Some(id) if self.document.send_backward(id) => {
                self.structure_changed();
                true
            }
            _ => false,
        }
    }

    pub fn shape_names(&self) -> Vec<String> {
        self.document.shape_names()
    }

    pub fn is_modified(&self) -> bool {
        self.document.is_modified()
    }

    pub fn can_undo(&self) -> bool {
        self.document.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.document.can_redo()
    }

    fn commit_shape(&mut self, shape: Shape) {
        let id = shape.id();
        log::debug!("Committed {}", shape.name());
        self.document.add_shape(shape);
        self.structure_changed();
        self.select(Some(id));
    }

    fn structure_changed(&mut self) {
        self.document.set_modified(true);
        self.events.push(CanvasEvent::ShapeListChanged);
        self.events.push(CanvasEvent::ModifiedChanged(true));
        self.emit_history_state();
        self.request_redraw();
    }

    fn emit_history_state(&mut self) {
        self.events
            .push(CanvasEvent::UndoAvailable(self.document.can_undo()));
        self.events
            .push(CanvasEvent::RedoAvailable(self.document.can_redo()));
    }

    fn set_modified(&mut self, modified: bool) {
        if self.document.set_modified(modified) {
            self.events.push(CanvasEvent::ModifiedChanged(modified));
        }
    }

    fn request_redraw(&mut self) {
        self.events.push(CanvasEvent::RedrawRequested);
    }

    // --- persistence ---

    /// Snapshot the document and pen for saving.
    pub fn to_drawing(&self) -> Drawing {
        Drawing::new(self.pen_color(), self.pen_width(), self.document.to_shapes())
    }

    /// Replace the document with a loaded drawing.
    pub fn load_drawing(&mut self, drawing: Drawing) {
        self.tool_manager.cancel();
        self.tool_manager.current_style = ShapeStyle::new(drawing.pen_color, drawing.pen_width);
        self.document.replace_shapes(drawing.shapes);
        self.clear_selection();
        self.events.push(CanvasEvent::ShapeListChanged);
        self.events.push(CanvasEvent::ModifiedChanged(false));
        self.emit_history_state();
        self.request_redraw();
    }

    pub fn save_to_path(&mut self, path: &Path) -> StorageResult<()> {
        storage::save_to_path(path, &self.to_drawing())?;
        self.set_modified(false);
        Ok(())
    }

    /// Load a drawing file. On error the document is left untouched.
    pub fn load_from_path(&mut self, path: &Path) -> StorageResult<()> {
        let drawing = storage::load_from_path(path)?;
        self.load_drawing(drawing);
        Ok(())
    }

    pub fn save_to(&mut self, storage: &dyn Storage, id: &str) -> StorageResult<()> {
        storage.save(id, &self.to_drawing())?;
        self.set_modified(false);
        Ok(())
    }

    pub fn load_from(&mut self, storage: &dyn Storage, id: &str) -> StorageResult<()> {
        let drawing = storage.load(id)?;
        self.load_drawing(drawing);
        Ok(())
    }

    // --- animation ---

    /// Run one animation frame.
    pub fn tick(&mut self) -> bool {
        let animated = self.animation.tick(self.document.shapes());
        if animated {
            self.request_redraw();
        }
        animated
    }

    /// Advance animation by wall time `elapsed`.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let animated = self.animation.advance(elapsed, self.document.shapes());
        if animated {
            self.request_redraw();
        }
        animated
    }

    pub fn stop_all_animations(&mut self) {
        for handle in self.document.shapes() {
            handle.borrow_mut().set_animated(false);
        }
        self.animation.reset();
        self.request_redraw();
    }

    // --- pointer input ---

    /// Shape being drawn, for previews.
    pub fn preview_shape(&self) -> Option<&Shape> {
        self.tool_manager.preview_shape()
    }

    pub fn polygon_preview(&self) -> Option<Point> {
        self.tool_manager.polygon_preview()
    }

    /// Feed a pointer event into the interaction state machine.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.input.handle_pointer_event(&event);
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, button } => self.pointer_up(position, button),
        }
    }

    /// Abandon the shape in progress, or end a drag keeping its edits.
    pub fn cancel(&mut self) {
        if self.tool_manager.is_active() {
            self.tool_manager.cancel();
            self.request_redraw();
        }
        self.input.release_all();
    }

    fn pointer_down(&mut self, point: Point, button: MouseButton) {
        match button {
            MouseButton::Left => match self.tool_manager.current_tool {
                ToolKind::Select => self.select_press(point),
                ToolKind::Polygon if self.tool_manager.is_accumulating_polygon() => {
                    self.tool_manager.add_polygon_point(point);
                    self.request_redraw();
                }
                _ => {
                    if self.tool_manager.begin(point) {
                        self.request_redraw();
                    }
                }
            },
            MouseButton::Right => {
                if self.tool_manager.is_accumulating_polygon() {
                    if let Some(shape) = self.tool_manager.finish_polygon() {
                        self.commit_shape(shape);
                    }
                } else {
                    self.animate_at(point);
                }
            }
            MouseButton::Middle => {}
        }
    }

    fn select_press(&mut self, point: Point) {
        if let Some(handle) = self.selected_shape() {
            let (id, bounds) = {
                let shape = handle.borrow();
                (shape.id(), shape.bounding_rect())
            };
            if let Some(mode) = hit_test_selection(bounds, point) {
                self.tool_manager
                    .begin_drag(ManipulationState::new(id, mode, point));
                return;
            }
        }
        let hit = self.document.shape_at_point(point).map(|h| h.borrow().id());
        if hit.is_some() || self.selection.is_some() {
            self.select(hit);
        }
    }

    fn animate_at(&mut self, point: Point) {
        if let Some(handle) = self.document.shape_at_point(point) {
            let mut shape = handle.borrow_mut();
            log::debug!("Animating {}", shape.name());
            shape.set_animated(true);
        }
    }

    fn pointer_move(&mut self, point: Point) {
        match self.tool_manager.state {
            ToolState::Creating { .. } => {
                if let Some(shape) = self.tool_manager.update(point) {
                    self.events
                        .push(CanvasEvent::ShapeParameters(ShapeParameters::of(shape)));
                }
                self.request_redraw();
            }
            ToolState::PolygonAccumulating { .. } => {
                self.tool_manager.update(point);
                self.request_redraw();
            }
            ToolState::Dragging(_) => {
                if self.input.is_button_pressed(MouseButton::Left) {
                    self.drag_to(point);
                }
            }
            ToolState::Idle => {}
        }
    }

    fn drag_to(&mut self, point: Point) {
        let Some(manipulation) = self.tool_manager.drag_mut() else {
            return;
        };
        let id = manipulation.shape_id;
        let mode = manipulation.mode;
        let delta = manipulation.step(point);

        let Some(handle) = self.document.get_shape(id).cloned() else {
            self.tool_manager.end_drag();
            return;
        };
        {
            let mut shape = handle.borrow_mut();
            match mode {
                DragMode::Move => shape.move_by(delta.x, delta.y),
                DragMode::Resize => apply_resize(&mut *shape, point),
                DragMode::Rotate => {
                    apply_rotation(&mut *shape, point);
                }
            }
            self.events
                .push(CanvasEvent::ShapeParameters(ShapeParameters::of(&shape)));
        }
        self.set_modified(true);
        self.request_redraw();
    }

    fn pointer_up(&mut self, point: Point, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        match self.tool_manager.state {
            ToolState::Creating { .. } => match self.tool_manager.end(point) {
                Some(shape) => self.commit_shape(shape),
                None => self.request_redraw(),
            },
            ToolState::Dragging(_) => {
                self.tool_manager.end_drag();
            }
            _ => {}
        }
    }
}
