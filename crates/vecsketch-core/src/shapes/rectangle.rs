//! Rectangle shape.

use super::geometry::{encloses, unrotate};
use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Size, Vec2};
use uuid::Uuid;

/// Vertical step per animation frame.
const BOUNCE_STEP: f64 = 3.0;
/// Travel before the bounce reverses.
const BOUNCE_LIMIT: f64 = 20.0;

/// An axis-aligned rectangle defined by the corner it was started from
/// and the opposite corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// First corner.
    pub top_left: Point,
    /// Opposite corner. Not necessarily below or right of `top_left`.
    pub bottom_right: Point,
    /// Style properties.
    pub style: ShapeStyle,
    rotation: f64,
    animated: bool,
    going_down: bool,
    bounce_progress: f64,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(top_left: Point, bottom_right: Point, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            top_left,
            bottom_right,
            style,
            rotation: 0.0,
            animated: false,
            going_down: true,
            bounce_progress: 0.0,
        }
    }

    /// Rectangle with positive width and height.
    pub fn as_rect(&self) -> Rect {
        Rect::from_points(self.top_left, self.bottom_right)
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn name(&self) -> &'static str {
        "Rectangle"
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn pivot(&self) -> Point {
        self.as_rect().center()
    }

    fn contains(&self, point: Point) -> bool {
        let rect = self.as_rect();
        let half = self.style.half_width();
        let local = unrotate(point, rect.center(), self.rotation);
        let outer = rect.inflate(half, half);
        let inner = rect.inflate(-half, -half);
        let inside_inner = inner.width() > 0.0
            && inner.height() > 0.0
            && local.x > inner.x0
            && local.x < inner.x1
            && local.y > inner.y0
            && local.y < inner.y1;
        encloses(outer, local) && !inside_inner
    }

    fn move_by(&mut self, dx: f64, dy: f64) {
        let delta = Vec2::new(dx, dy);
        self.top_left += delta;
        self.bottom_right += delta;
    }

    fn resize(&mut self, size: Size) {
        let old = self.as_rect().size();
        if old.width == 0.0 || old.height == 0.0 || size.width <= 0.0 || size.height <= 0.0 {
            return;
        }
        let offset = self.bottom_right - self.top_left;
        let scaled = Vec2::new(
            offset.x * size.width / old.width,
            offset.y * size.height / old.height,
        );
        self.bottom_right = self.top_left + scaled;
    }

    fn update(&mut self, point: Point) {
        self.bottom_right = point;
    }

    fn animate_step(&mut self) {
        let dy = if self.going_down { BOUNCE_STEP } else { -BOUNCE_STEP };
        self.move_by(0.0, dy);
        self.bounce_progress += dy.abs();
        if self.bounce_progress >= BOUNCE_LIMIT {
            self.bounce_progress = 0.0;
            self.going_down = !self.going_down;
        }
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

    fn supports_fill(&self) -> bool {
        true
    }
}
