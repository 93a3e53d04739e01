//! Selection overlay handles and drag manipulation.

use crate::shapes::geometry::encloses;
use crate::shapes::{Shape, ShapeId, ShapeTrait};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Handle box edge length in canvas pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Distance from the top of the bounding rect to the rotation handle center.
pub const ROTATE_HANDLE_OFFSET: f64 = 20.0;
/// Smallest width or height reachable by a resize drag.
pub const MIN_DRAG_SIZE: f64 = 10.0;

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Bottom-right corner of the bounding rect.
    Resize,
    /// Above the top-center of the bounding rect.
    Rotate,
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Center of the handle box.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Square box drawn for the handle.
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.position, (HANDLE_SIZE, HANDLE_SIZE))
    }

    /// Check if a point hits the handle box (edges included).
    pub fn hit_test(&self, point: Point) -> bool {
        encloses(self.rect(), point)
    }
}

/// Handles for a selected shape's bounding rect, in hit-test priority order.
pub fn get_handles(bounds: Rect) -> [Handle; 2] {
    [
        Handle::new(Point::new(bounds.x1, bounds.y1), HandleKind::Resize),
        Handle::new(
            Point::new(bounds.center().x, bounds.y0 - ROTATE_HANDLE_OFFSET),
            HandleKind::Rotate,
        ),
    ]
}

/// What a press on a selected shape starts dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragMode {
    Move,
    Resize,
    Rotate,
}

/// Pick the drag mode for a press at `point` on a shape with `bounds`:
/// resize handle, then rotate handle, then the bounds body.
pub fn hit_test_selection(bounds: Rect, point: Point) -> Option<DragMode> {
    for handle in get_handles(bounds) {
        if handle.hit_test(point) {
            return Some(match handle.kind {
                HandleKind::Resize => DragMode::Resize,
                HandleKind::Rotate => DragMode::Rotate,
            });
        }
    }
    encloses(bounds, point).then_some(DragMode::Move)
}

/// State of an active drag on the selected shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ManipulationState {
    /// The shape being manipulated.
    pub shape_id: ShapeId,
    pub mode: DragMode,
    /// Pointer position at the previous move (or the press).
    pub last_point: Point,
}

impl ManipulationState {
    pub fn new(shape_id: ShapeId, mode: DragMode, start_point: Point) -> Self {
        Self {
            shape_id,
            mode,
            last_point: start_point,
        }
    }

    /// Advance to `point`, returning the delta since the previous position.
    pub fn step(&mut self, point: Point) -> Vec2 {
        let delta = point - self.last_point;
        self.last_point = point;
        delta
    }
}

/// Target size for a resize drag: cursor offset from the bounds top-left,
/// each dimension at least [`MIN_DRAG_SIZE`].
pub fn resize_target(bounds: Rect, cursor: Point) -> Size {
    Size::new(
        (cursor.x - bounds.x0).max(MIN_DRAG_SIZE),
        (cursor.y - bounds.y0).max(MIN_DRAG_SIZE),
    )
}

/// Rotation angle in degrees for a rotate drag.
///
/// The cursor's bearing from the bounds center minus the bearing of the
/// center itself from the canvas origin.
pub fn rotation_target(bounds: Rect, cursor: Point) -> f64 {
    let center = bounds.center();
    let to_cursor = cursor - center;
    (to_cursor.y.atan2(to_cursor.x) - center.y.atan2(center.x)).to_degrees()
}

/// Apply a resize drag to a shape.
pub fn apply_resize(shape: &mut Shape, cursor: Point) {
    let size = resize_target(shape.bounding_rect(), cursor);
    shape.resize(size);
}

/// Apply a rotate drag to a shape. Returns the new angle in degrees.
pub fn apply_rotation(shape: &mut Shape, cursor: Point) -> f64 {
    let angle = rotation_target(shape.bounding_rect(), cursor);
    shape.rotate(angle);
    angle
}
