//! Regular N-gon shape.

use super::geometry::{near_polyline, point_in_polygon, polyline_path, unrotate};
use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Size, Vec2};
use std::f64::consts::TAU;
use uuid::Uuid;

/// Fewest sides a regular polygon may have.
pub const MIN_SIDES: u32 = 3;
/// Most sides a regular polygon may have.
pub const MAX_SIDES: u32 = 1000;
/// Smallest radius reachable by dragging.
const MIN_DRAG_RADIUS: f64 = 10.0;

/// Bring a side count into `MIN_SIDES..=MAX_SIDES`.
pub fn clamp_sides(sides: u32) -> u32 {
    sides.clamp(MIN_SIDES, MAX_SIDES)
}

/// A regular polygon inscribed in a circle.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularPolygon {
    pub(crate) id: ShapeId,
    /// Center point.
    pub center: Point,
    radius: f64,
    sides: u32,
    /// Style properties.
    pub style: ShapeStyle,
    rotation: f64,
    animated: bool,
}

impl RegularPolygon {
    pub fn new(center: Point, radius: f64, sides: u32, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius: radius.max(0.0),
            sides: clamp_sides(sides),
            style,
            rotation: 0.0,
            animated: false,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Set the side count, clamped to `MIN_SIDES..=MAX_SIDES`.
    pub fn set_sides(&mut self, sides: u32) {
        self.sides = clamp_sides(sides);
    }

    /// Unrotated vertex ring. Vertex `i` sits at angle `i * 360 / sides`.
    pub fn vertices(&self) -> Vec<Point> {
        let step = TAU / f64::from(self.sides);
        (0..self.sides)
            .map(|i| {
                let angle = f64::from(i) * step;
                self.center + Vec2::new(self.radius * angle.cos(), self.radius * angle.sin())
            })
            .collect()
    }
}

impl ShapeTrait for RegularPolygon {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn name(&self) -> &'static str {
        "RegularPolygon"
    }

    fn to_path(&self) -> BezPath {
        polyline_path(&self.vertices(), true)
    }

    fn pivot(&self) -> Point {
        self.center
    }

    fn contains(&self, point: Point) -> bool {
        let local = unrotate(point, self.center, self.rotation);
        let ring = self.vertices();
        point_in_polygon(local, &ring) || near_polyline(local, &ring, self.style.half_width(), true)
    }

    fn move_by(&mut self, dx: f64, dy: f64) {
        self.center += Vec2::new(dx, dy);
    }

    fn resize(&mut self, size: Size) {
        if size.width <= 0.0 || size.height <= 0.0 {
            return;
        }
        self.radius = size.width.min(size.height) / 2.0;
    }

    fn update(&mut self, point: Point) {
        self.radius = self.center.distance(point).max(MIN_DRAG_RADIUS);
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
