//! Circle (axis-aligned ellipse) shape.

use super::geometry::{encloses, unrotate};
use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::{CANVAS_HEIGHT, CANVAS_WIDTH};
use kurbo::{BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape, Size, Vec2};
use uuid::Uuid;

/// Initial bounce velocity, in pixels per frame.
const BOUNCE_VELOCITY: Vec2 = Vec2::new(3.0, 3.0);

/// An ellipse inscribed in a rectangle.
///
/// The rectangle keeps the corner order it was dragged with, so `rect`
/// may be un-normalized until read through [`Circle::normalized`].
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub(crate) id: ShapeId,
    /// Bounding rectangle, first corner at `(x0, y0)`.
    pub rect: Rect,
    /// Style properties.
    pub style: ShapeStyle,
    velocity: Vec2,
    rotation: f64,
    animated: bool,
}

impl Circle {
    /// Create a circle spanning two corners.
    pub fn new(first: Point, second: Point, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            rect: Rect::new(first.x, first.y, second.x, second.y),
            style,
            velocity: BOUNCE_VELOCITY,
            rotation: 0.0,
            animated: false,
        }
    }

    /// Create from an origin and a signed size, as persisted.
    pub fn from_origin_size(origin: Point, width: f64, height: f64, style: ShapeStyle) -> Self {
        Self::new(origin, Point::new(origin.x + width, origin.y + height), style)
    }

    /// Rectangle with positive width and height.
    pub fn normalized(&self) -> Rect {
        self.rect.abs()
    }

    pub fn center(&self) -> Point {
        self.rect.center()
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn name(&self) -> &'static str {
        "Circle"
    }

    fn to_path(&self) -> BezPath {
        KurboEllipse::from_rect(self.normalized()).to_path(0.1)
    }

    fn pivot(&self) -> Point {
        self.center()
    }

    fn contains(&self, point: Point) -> bool {
        let rect = self.normalized();
        if rect.width() <= 1.0 && rect.height() <= 1.0 {
            return encloses(rect, point);
        }

        let half = self.style.half_width();
        let local = unrotate(point, rect.center(), self.rotation);
        let a = rect.width() / 2.0;
        let b = rect.height() / 2.0;
        if a < f64::EPSILON || b < f64::EPSILON {
            // Flat ellipse: the outline is a segment.
            return encloses(rect.inflate(half, half), local);
        }

        let x = local.x - rect.center().x;
        let y = local.y - rect.center().y;
        let d = (x * x) / (a * a) + (y * y) / (b * b);
        let f = self.style.stroke_width() / a.max(b);
        let inner = (1.0 - f).max(0.0);
        d <= (1.0 + f) * (1.0 + f) && d >= inner * inner
    }

    fn move_by(&mut self, dx: f64, dy: f64) {
        self.rect = self.rect + Vec2::new(dx, dy);
    }

    fn resize(&mut self, size: Size) {
        if size.width <= 0.0 || size.height <= 0.0 {
            return;
        }
        self.rect = Rect::from_origin_size(self.normalized().origin(), size);
    }

    fn update(&mut self, point: Point) {
        self.rect = Rect::new(self.rect.x0, self.rect.y0, point.x, point.y);
    }

    fn animate_step(&mut self) {
        self.move_by(self.velocity.x, self.velocity.y);

        let rect = self.normalized();
        let mut shift = Vec2::ZERO;
        if rect.x0 < 0.0 {
            shift.x = -rect.x0;
            self.velocity.x = -self.velocity.x;
        } else if rect.x1 > CANVAS_WIDTH {
            shift.x = CANVAS_WIDTH - rect.x1;
            self.velocity.x = -self.velocity.x;
        }
        if rect.y0 < 0.0 {
            shift.y = -rect.y0;
            self.velocity.y = -self.velocity.y;
        } else if rect.y1 > CANVAS_HEIGHT {
            shift.y = CANVAS_HEIGHT - rect.y1;
            self.velocity.y = -self.velocity.y;
        }
        self.rect = self.rect + shift;
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

    fn bounding_rect(&self) -> Rect {
        let rect = self.normalized();
        let (a, b) = (rect.width() / 2.0, rect.height() / 2.0);
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let hx = ((a * cos).powi(2) + (b * sin).powi(2)).sqrt();
        let hy = ((a * sin).powi(2) + (b * cos).powi(2)).sqrt();
        let c = rect.center();
        let half = self.style.half_width();
        Rect::new(c.x - hx, c.y - hy, c.x + hx, c.y + hy).inflate(half, half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::SerializableColor;

    fn circle() -> Circle {
        Circle::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
            ShapeStyle::new(SerializableColor::black(), 2.0),
        )
    }

    #[test]
    fn test_hit_band() {
        let c = circle();
        // On the outline at the ends of both axes.
        assert!(c.contains(Point::new(100.0, 25.0)));
        assert!(c.contains(Point::new(50.0, 0.0)));
        // Deep inside and well outside miss.
        assert!(!c.contains(Point::new(50.0, 25.0)));
        assert!(!c.contains(Point::new(130.0, 25.0)));
    }

    #[test]
    fn test_update_from_first_corner() {
        let mut c = Circle::new(Point::new(50.0, 50.0), Point::new(50.0, 50.0), ShapeStyle::default());
        c.update(Point::new(10.0, 20.0));
        assert_eq!(c.rect.origin(), Point::new(50.0, 50.0));
        assert_eq!(c.normalized(), Rect::new(10.0, 20.0, 50.0, 50.0));
    }

    #[test]
    fn test_resize_keeps_top_left() {
        let mut c = Circle::new(Point::new(40.0, 40.0), Point::new(10.0, 10.0), ShapeStyle::default());
        c.resize(Size::new(30.0, 60.0));
        assert_eq!(c.normalized(), Rect::new(10.0, 10.0, 40.0, 70.0));
        c.resize(Size::new(0.0, 60.0));
        assert_eq!(c.normalized(), Rect::new(10.0, 10.0, 40.0, 70.0));
    }

    #[test]
    fn test_rotated_bounds_swap_axes() {
        let mut c = circle();
        c.rotate(90.0);
        let bounds = c.bounding_rect();
        assert!((bounds.width() - 52.0).abs() < 1e-9);
        assert!((bounds.height() - 102.0).abs() < 1e-9);
        assert_eq!(bounds.center(), Point::new(50.0, 25.0));
    }

    #[test]
    fn test_bounce_reflects_and_clamps() {
        let mut c = Circle::new(
            Point::new(CANVAS_WIDTH - 52.0, 10.0),
            Point::new(CANVAS_WIDTH - 2.0, 60.0),
            ShapeStyle::default(),
        );
        c.animate_step();
        assert_eq!(c.normalized().x1, CANVAS_WIDTH);
        assert_eq!(c.velocity(), Vec2::new(-3.0, 3.0));
        c.animate_step();
        assert_eq!(c.normalized().x1, CANVAS_WIDTH - 3.0);
    }

    #[test]
    fn test_tiny_circle_uses_rect() {
        let c = Circle::new(Point::new(5.0, 5.0), Point::new(6.0, 6.0), ShapeStyle::default());
        assert!(c.contains(Point::new(5.5, 5.5)));
        assert!(!c.contains(Point::new(8.0, 8.0)));
    }
}
