//! Freehand drawing shape.

use super::geometry::{perpendicular_distance, points_bounds, polyline_path, unrotate};
use super::{SerializableColor, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Size, Vec2};
use uuid::Uuid;

/// Extra pick tolerance beyond the stroke half-width.
const HIT_SLOP: f64 = 5.0;
/// Degrees the points are turned per animation frame.
const SPIN_STEP: f64 = 0.1;
/// Hue advance per animation frame.
const HUE_STEP: u16 = 5;

/// A freehand drawing (series of points).
#[derive(Debug, Clone, PartialEq)]
pub struct Freehand {
    pub(crate) id: ShapeId,
    points: Vec<Point>,
    /// Running box around `points`, used as the rotation pivot.
    bounds: Rect,
    /// Style properties.
    pub style: ShapeStyle,
    hue: u16,
    rotation: f64,
    animated: bool,
}

impl Freehand {
    /// Create a new empty freehand shape.
    pub fn new(style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            bounds: Rect::ZERO,
            style,
            hue: 0,
            rotation: 0.0,
            animated: false,
        }
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>, style: ShapeStyle) -> Self {
        let bounds = points_bounds(&points);
        Self {
            points,
            bounds,
            ..Self::new(style)
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Cached box around the raw points.
    pub fn point_bounds(&self) -> Rect {
        self.bounds
    }

    fn refresh_bounds(&mut self) {
        self.bounds = points_bounds(&self.points);
    }
}

impl ShapeTrait for Freehand {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn name(&self) -> &'static str {
        "Freehand"
    }

    fn to_path(&self) -> BezPath {
        polyline_path(&self.points, false)
    }

    fn pivot(&self) -> Point {
        self.bounds.center()
    }

    fn contains(&self, point: Point) -> bool {
        if self.points.len() < 2 {
            return false;
        }
        let local = unrotate(point, self.pivot(), self.rotation);
        let reach = self.style.half_width() + HIT_SLOP;
        self.points.windows(2).any(|seg| {
            let (a, b) = (seg[0], seg[1]);
            let within_box = local.x >= a.x.min(b.x) - reach
                && local.x <= a.x.max(b.x) + reach
                && local.y >= a.y.min(b.y) - reach
                && local.y <= a.y.max(b.y) + reach;
            within_box && perpendicular_distance(local, a, b) <= reach
        })
    }

    fn move_by(&mut self, dx: f64, dy: f64) {
        let delta = Vec2::new(dx, dy);
        for p in &mut self.points {
            *p += delta;
        }
        self.bounds = self.bounds + delta;
    }

    fn resize(&mut self, size: Size) {
        let old = self.bounds;
        if self.points.is_empty() || old.width() == 0.0 || old.height() == 0.0 {
            return;
        }
        if size.width <= 0.0 || size.height <= 0.0 {
            return;
        }
        let center = old.center();
        let sx = size.width / old.width();
        let sy = size.height / old.height();
        for p in &mut self.points {
            *p = Point::new(center.x + (p.x - center.x) * sx, center.y + (p.y - center.y) * sy);
        }
        self.refresh_bounds();
    }

    fn update(&mut self, point: Point) {
        if self.points.is_empty() {
            self.bounds = Rect::from_points(point, point);
        } else {
            self.bounds = self.bounds.union_pt(point);
        }
        self.points.push(point);
    }

    fn animate_step(&mut self) {
        if self.points.is_empty() {
            return;
        }
        let turn = super::geometry::rotation_about(self.bounds.center(), SPIN_STEP);
        for p in &mut self.points {
            *p = turn * *p;
        }
        self.refresh_bounds();
        self.hue = (self.hue + HUE_STEP) % 360;
        self.style.stroke_color = SerializableColor::from_hsv(f64::from(self.hue), 1.0, 1.0);
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

    fn bounding_rect(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }
        let transform = self.draw_transform();
        let turned: Vec<Point> = self.points.iter().map(|p| transform * *p).collect();
        let half = self.style.half_width();
        points_bounds(&turned).inflate(half, half)
    }
}
