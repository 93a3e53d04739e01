//! Geometry helpers shared by the shape variants.

use kurbo::{Affine, BezPath, Point, Rect, Shape as _};

/// Rotation by `degrees` (clockwise on a y-down canvas) about `center`.
pub fn rotation_about(center: Point, degrees: f64) -> Affine {
    if degrees == 0.0 {
        Affine::IDENTITY
    } else {
        Affine::rotate_about(degrees.to_radians(), center)
    }
}

/// Map a canvas point into the unrotated frame of a shape.
pub fn unrotate(point: Point, center: Point, degrees: f64) -> Point {
    rotation_about(center, -degrees) * point
}

/// Bounds of `path` after `transform`, grown by `inflate` on every side.
pub fn rotated_bounds(path: &BezPath, transform: Affine, inflate: f64) -> Rect {
    if path.elements().is_empty() {
        return Rect::ZERO;
    }
    (transform * path.clone()).bounding_box().inflate(inflate, inflate)
}

/// Closed-interval containment (kurbo's `Rect::contains` excludes the far edges).
pub fn encloses(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Axis-aligned box around a point set. Empty input yields `Rect::ZERO`.
pub fn points_bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
}

/// Even-odd ray cast against the ring implied by `points`.
pub fn point_in_polygon(point: Point, points: &[Point]) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (pi, pj) = (points[i], points[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let cross_x = pj.x + (point.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if point.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Whether `point` lies within `tolerance` of any edge of the polyline.
/// When `closed`, the last-to-first edge is tested too.
pub fn near_polyline(point: Point, points: &[Point], tolerance: f64, closed: bool) -> bool {
    match points {
        [] => false,
        [only] => only.distance(point) <= tolerance,
        _ => {
            let open = points
                .windows(2)
                .any(|w| super::point_to_segment_dist(point, w[0], w[1]) <= tolerance);
            let closing = closed && {
                let (first, last) = (points[0], points[points.len() - 1]);
                super::point_to_segment_dist(point, last, first) <= tolerance
            };
            open || closing
        }
    }
}

/// Perpendicular distance from a point to the infinite line through a and b.
pub fn perpendicular_distance(point: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-10 {
        return point.distance(a);
    }
    ((point.x - a.x) * dy - (point.y - a.y) * dx).abs() / len
}

/// Open polyline path through `points`, optionally closed.
pub fn polyline_path(points: &[Point], close: bool) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };
    path.move_to(*first);
    for p in &points[1..] {
        path.line_to(*p);
    }
    if close {
        path.close_path();
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_rotation_matches_screen_convention() {
        // +90 degrees on a y-down canvas turns +x into +y.
        let p = rotation_about(Point::ZERO, 90.0) * Point::new(1.0, 0.0);
        assert!((p.x - 0.0).abs() < 1e-9);
        assert!((p.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unrotate_inverts_rotation() {
        let center = Point::new(5.0, 5.0);
        let p = Point::new(12.0, 3.0);
        let rotated = rotation_about(center, 37.0) * p;
        let back = unrotate(rotated, center, 37.0);
        assert!(back.distance(p) < 1e-9);
    }

    #[test]
    fn test_point_in_polygon() {
        let ring = square();
        assert!(point_in_polygon(Point::new(5.0, 5.0), &ring));
        assert!(!point_in_polygon(Point::new(15.0, 5.0), &ring));
        assert!(!point_in_polygon(Point::new(5.0, 5.0), &ring[..2]));
    }

    #[test]
    fn test_near_polyline_closing_edge() {
        let ring = square();
        let on_closing_edge = Point::new(0.0, 5.0);
        assert!(!near_polyline(on_closing_edge, &ring, 0.5, false));
        assert!(near_polyline(on_closing_edge, &ring, 0.5, true));
    }

    #[test]
    fn test_points_bounds() {
        let bounds = points_bounds(&[Point::new(3.0, 7.0), Point::new(-1.0, 2.0), Point::new(4.0, 4.0)]);
        assert_eq!(bounds, Rect::new(-1.0, 2.0, 4.0, 7.0));
        assert_eq!(points_bounds(&[]), Rect::ZERO);
    }

    #[test]
    fn test_perpendicular_distance() {
        let d = perpendicular_distance(Point::new(5.0, 3.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-9);
    }
}
