//! Notifications emitted by the canvas for the host UI.
//!
//! Events are queued as they happen and must be drained via
//! [`crate::Canvas::poll_events`].

use crate::shapes::{SerializableColor, Shape, ShapeTrait};
use kurbo::Size;

/// Snapshot of the editable attributes of a shape, for property editors.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeParameters {
    pub color: SerializableColor,
    pub width: f64,
    pub fill_color: SerializableColor,
    pub filled: bool,
    /// Size of the rotated bounding rect.
    pub size: Size,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl ShapeParameters {
    pub fn of(shape: &Shape) -> Self {
        let style = shape.style();
        Self {
            color: style.stroke_color,
            width: style.stroke_width(),
            fill_color: shape.fill_color(),
            filled: shape.is_filled(),
            size: shape.bounding_rect().size(),
            rotation: shape.rotation(),
        }
    }
}

/// Events emitted by the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// The unsaved-changes flag was set or cleared.
    ModifiedChanged(bool),
    /// Whether an undo step is available.
    UndoAvailable(bool),
    /// Whether a redo step is available.
    RedoAvailable(bool),
    /// Selection changed; carries the selected shape's display name.
    SelectionChanged(Option<String>),
    /// Shapes were added, removed or reordered.
    ShapeListChanged,
    /// Attributes of the shape being edited.
    ShapeParameters(ShapeParameters),
    /// Something visible changed without a structural edit.
    RedrawRequested,
}

/// FIFO of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<CanvasEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CanvasEvent) {
        self.pending.push(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
