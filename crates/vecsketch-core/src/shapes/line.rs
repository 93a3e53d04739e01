//! Line shape.

use super::geometry::{encloses, polyline_path, rotation_about, unrotate};
use super::{ShapeId, ShapeStyle, ShapeTrait, point_to_segment_dist};
use kurbo::{BezPath, Point, Rect, Size, Vec2};
use uuid::Uuid;

/// Extra pick tolerance beyond the stroke half-width.
const HIT_SLOP: f64 = 3.0;
/// Degrees added per animation frame.
const SPIN_STEP: f64 = 2.0;

/// A straight segment between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub(crate) id: ShapeId,
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Style properties.
    pub style: ShapeStyle,
    rotation: f64,
    animated: bool,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point, end: Point, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style,
            rotation: 0.0,
            animated: false,
        }
    }

    /// Get the length of the line.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Get the midpoint of the line.
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn name(&self) -> &'static str {
        "Line"
    }

    fn to_path(&self) -> BezPath {
        polyline_path(&[self.start, self.end], false)
    }

    fn pivot(&self) -> Point {
        self.midpoint()
    }

    fn contains(&self, point: Point) -> bool {
        let local = unrotate(point, self.pivot(), self.rotation);
        let half = self.style.half_width();
        let reach = Rect::from_points(self.start, self.end).inflate(half, half);
        if !encloses(reach, local) {
            return false;
        }
        point_to_segment_dist(local, self.start, self.end) <= half + HIT_SLOP
    }

    fn move_by(&mut self, dx: f64, dy: f64) {
        let delta = Vec2::new(dx, dy);
        self.start += delta;
        self.end += delta;
    }

    fn resize(&mut self, size: Size) {
        let len = self.length();
        if len <= f64::EPSILON || size.width <= 0.0 || size.height <= 0.0 {
            return;
        }
        let scale = (size.width / len).max(size.height / len);
        let mid = self.midpoint();
        self.start = mid + (self.start - mid) * scale;
        self.end = mid + (self.end - mid) * scale;
    }

    fn update(&mut self, point: Point) {
        self.end = point;
    }

    fn animate_step(&mut self) {
        let turn = rotation_about(self.midpoint(), SPIN_STEP);
        self.start = turn * self.start;
        self.end = turn * self.end;
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn rotate(&mut self, degrees: f64) {
        self.rotation = degrees;
    }

    fn is_animated(&self) -> bool {
        self.animated
    }

    fn set_animated(&mut self, animated: bool) {
        self.animated = animated;
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
