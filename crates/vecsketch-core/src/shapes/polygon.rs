//! Free-form polygon built one vertex at a time.

use super::geometry::{near_polyline, point_in_polygon, points_bounds, polyline_path, unrotate};
use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Size, Vec2};
use uuid::Uuid;

/// An open or closed list of vertices.
///
/// While being drawn the last vertex follows the pointer. [`Polygon::finish`]
/// closes the ring by repeating the first vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub(crate) id: ShapeId,
    points: Vec<Point>,
    /// Style properties.
    pub style: ShapeStyle,
    rotation: f64,
    animated: bool,
}

impl Polygon {
    /// Create an empty polygon.
    pub fn new(style: ShapeStyle) -> Self {
        Self::from_points(Vec::new(), style)
    }

    /// Create from existing vertices.
    pub fn from_points(points: Vec<Point>, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style,
            rotation: 0.0,
            animated: false,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a vertex.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Close the ring. Fewer than three vertices are left untouched.
    pub fn finish(&mut self) {
        if self.points.len() >= 3 {
            self.points.push(self.points[0]);
        }
    }

    /// Whether the ring has been closed by [`Polygon::finish`].
    pub fn is_closed(&self) -> bool {
        self.points.len() >= 4 && self.points.first() == self.points.last()
    }

    /// Whether the outline includes the edge back to the first vertex.
    /// Hit-testing follows the drawn outline, so both use this.
    fn outline_closed(&self) -> bool {
        self.points.len() >= 3
    }

    /// Unrotated box around the vertices.
    pub fn vertex_bounds(&self) -> Rect {
        points_bounds(&self.points)
    }
}

impl ShapeTrait for Polygon {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn name(&self) -> &'static str {
        "Polygon"
    }

    fn to_path(&self) -> BezPath {
        polyline_path(&self.points, self.outline_closed())
    }

    fn pivot(&self) -> Point {
        self.vertex_bounds().center()
    }

    fn contains(&self, point: Point) -> bool {
        let local = unrotate(point, self.pivot(), self.rotation);
        point_in_polygon(local, &self.points)
            || near_polyline(local, &self.points, self.style.half_width(), self.outline_closed())
    }

    fn move_by(&mut self, dx: f64, dy: f64) {
        let delta = Vec2::new(dx, dy);
        for p in &mut self.points {
            *p += delta;
        }
    }

    fn resize(&mut self, size: Size) {
        if self.points.len() < 2 {
            return;
        }
        let old = self.vertex_bounds();
        if old.width() == 0.0 || old.height() == 0.0 || size.width <= 0.0 || size.height <= 0.0 {
            return;
        }
        let sx = size.width / old.width();
        let sy = size.height / old.height();
        for p in &mut self.points {
            *p = Point::new(old.x0 + (p.x - old.x0) * sx, old.y0 + (p.y - old.y0) * sy);
        }
    }

    fn update(&mut self, point: Point) {
        match self.points.last_mut() {
            Some(last) => *last = point,
            None => self.points.push(point),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::SerializableColor;

    fn square() -> Polygon {
        let mut poly = Polygon::new(ShapeStyle::new(SerializableColor::black(), 2.0));
        for (x, y) in [(0.0, 0.0), (50.0, 0.0), (50.0, 50.0), (0.0, 50.0)] {
            poly.add_point(Point::new(x, y));
        }
        poly
    }

    #[test]
    fn test_finish_closes_ring() {
        let mut poly = square();
        assert!(!poly.is_closed());
        poly.finish();
        assert_eq!(poly.len(), 5);
        assert_eq!(poly.points().first(), poly.points().last());
        assert!(poly.is_closed());
    }

    #[test]
    fn test_finish_needs_three_vertices() {
        let mut poly = Polygon::new(ShapeStyle::default());
        poly.add_point(Point::ZERO);
        poly.add_point(Point::new(10.0, 0.0));
        poly.finish();
        assert_eq!(poly.len(), 2);
    }

    #[test]
    fn test_update_moves_last_vertex() {
        let mut poly = Polygon::new(ShapeStyle::default());
        poly.update(Point::new(1.0, 1.0));
        assert_eq!(poly.len(), 1);
        poly.add_point(Point::new(5.0, 5.0));
        poly.update(Point::new(7.0, 9.0));
        assert_eq!(poly.points(), &[Point::new(1.0, 1.0), Point::new(7.0, 9.0)]);
    }

    #[test]
    fn test_hit_inside_and_on_edge() {
        let poly = square();
        assert!(poly.contains(Point::new(25.0, 25.0)));
        assert!(poly.contains(Point::new(0.0, 25.0)));
        assert!(!poly.contains(Point::new(60.0, 25.0)));
    }

    #[test]
    fn test_closing_edge_follows_outline() {
        let mut poly = Polygon::new(ShapeStyle::new(SerializableColor::black(), 2.0));
        poly.add_point(Point::new(0.0, 0.0));
        poly.add_point(Point::new(50.0, 0.0));
        // Two vertices draw one segment and nothing else.
        assert!(poly.contains(Point::new(25.0, 0.0)));
        assert!(!poly.to_path().elements().iter().any(|el| matches!(el, kurbo::PathEl::ClosePath)));

        poly.add_point(Point::new(50.0, 50.0));
        // A third vertex draws the diagonal back to the start, and it is hittable.
        assert!(poly.to_path().elements().iter().any(|el| matches!(el, kurbo::PathEl::ClosePath)));
        assert!(poly.contains(Point::new(10.0, 10.0)));
        assert!(!poly.contains(Point::new(10.0, 30.0)));
    }

    #[test]
    fn test_resize_from_top_left() {
        let mut poly = square();
        poly.move_by(10.0, 10.0);
        poly.resize(Size::new(100.0, 25.0));
        assert_eq!(poly.vertex_bounds(), Rect::new(10.0, 10.0, 110.0, 35.0));
    }

    #[test]
    fn test_rotated_bounds() {
        let mut poly = square();
        poly.rotate(45.0);
        let bounds = poly.bounding_rect();
        let diag = 50.0 * std::f64::consts::SQRT_2;
        assert!((bounds.width() - (diag + 2.0)).abs() < 1e-9);
        assert!(bounds.center().distance(Point::new(25.0, 25.0)) < 1e-9);
    }
}
