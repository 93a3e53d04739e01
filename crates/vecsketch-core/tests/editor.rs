//! End-to-end behaviour of the canvas, shapes and file format.

use kurbo::{Point, Rect, Size};
use std::f64::consts::TAU;
use tempfile::tempdir;
use vecsketch_core::shapes::{Circle, Freehand, Line, Polygon, Rectangle, RegularPolygon};
use vecsketch_core::storage::MemoryStorage;
use vecsketch_core::storage::format::encode_shape;
use vecsketch_core::{
    Canvas, Drawing, MouseButton, PointerEvent, SerializableColor, Shape, ShapeStyle, ShapeTrait,
    ToolKind,
};

fn style(width: f64) -> ShapeStyle {
    ShapeStyle::new(SerializableColor::black(), width)
}

fn press(canvas: &mut Canvas, x: f64, y: f64, button: MouseButton) {
    canvas.handle_pointer(PointerEvent::Down {
        position: Point::new(x, y),
        button,
    });
}

fn release(canvas: &mut Canvas, x: f64, y: f64) {
    canvas.handle_pointer(PointerEvent::Up {
        position: Point::new(x, y),
        button: MouseButton::Left,
    });
}

fn draw(canvas: &mut Canvas, tool: ToolKind, from: Point, to: Point) {
    canvas.set_tool(tool);
    press(canvas, from.x, from.y, MouseButton::Left);
    canvas.handle_pointer(PointerEvent::Move { position: to });
    release(canvas, to.x, to.y);
}

fn click(canvas: &mut Canvas, x: f64, y: f64) {
    press(canvas, x, y, MouseButton::Left);
    release(canvas, x, y);
}

fn serialized(canvas: &Canvas) -> String {
    canvas.to_drawing().to_json().unwrap()
}

fn one_of_each() -> Vec<Shape> {
    let mut filled = Rectangle::new(Point::new(10.0, 10.0), Point::new(110.0, 60.0), style(4.0));
    filled.style.fill_color = SerializableColor::rgb(0, 200, 0);
    filled.style.filled = true;
    let mut line = Line::new(Point::new(0.0, 0.0), Point::new(40.0, 30.0), style(3.0));
    line.rotate(30.0);

    vec![
        Shape::Line(line),
        Shape::Circle(Circle::new(Point::new(300.0, 200.0), Point::new(250.0, 260.0), style(2.0))),
        Shape::Rectangle(filled),
        Shape::Freehand(Freehand::from_points(
            vec![Point::new(1.0, 1.0), Point::new(5.5, 2.0), Point::new(9.0, 7.25)],
            style(6.0),
        )),
        Shape::Polygon(Polygon::from_points(
            vec![
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(25.0, 40.0),
                Point::new(0.0, 0.0),
            ],
            style(2.0),
        )),
        Shape::RegularPolygon(RegularPolygon::new(Point::new(400.0, 300.0), 45.0, 7, style(5.0))),
    ]
}

#[test]
fn test_round_trip_keeps_order_and_fields() {
    let shapes = one_of_each();
    let drawing = Drawing::new(SerializableColor::rgb(12, 34, 56), 7.0, shapes.clone());

    let loaded = Drawing::from_json(&drawing.to_json().unwrap()).unwrap();

    assert_eq!(loaded.pen_color, drawing.pen_color);
    assert_eq!(loaded.pen_width, 7.0);
    let names: Vec<_> = loaded.shapes.iter().map(|s| s.name()).collect();
    assert_eq!(
        names,
        ["Line", "Circle", "Rectangle", "Freehand", "Polygon", "RegularPolygon"]
    );
    for (original, decoded) in shapes.iter().zip(&loaded.shapes) {
        assert_eq!(encode_shape(original), encode_shape(decoded));
    }
}

#[test]
fn test_line_hit_at_rotations() {
    let mut line = Shape::Line(Line::new(Point::new(100.0, 100.0), Point::new(200.0, 100.0), style(4.0)));
    assert!(line.contains(Point::new(150.0, 100.0)));
    assert!(line.contains(Point::new(150.0, 101.5)));
    assert!(!line.contains(Point::new(150.0, 106.0)));

    // Quarter turn about the midpoint makes the segment vertical.
    line.rotate(90.0);
    assert!(line.contains(Point::new(150.0, 60.0)));
    assert!(line.contains(Point::new(150.0, 140.0)));
    assert!(!line.contains(Point::new(170.0, 100.0)));
    assert!(!line.contains(Point::new(150.0, 156.0)));
}

#[test]
fn test_rectangle_hit_at_rotations() {
    let mut rect = Shape::Rectangle(Rectangle::new(
        Point::new(0.0, 0.0),
        Point::new(100.0, 50.0),
        style(4.0),
    ));
    assert!(rect.contains(Point::new(50.0, 0.0)));
    assert!(!rect.contains(Point::new(50.0, -3.0)));
    assert!(!rect.contains(Point::new(50.0, 25.0)));

    rect.rotate(90.0);
    // The top edge now runs vertically through x = 75 (center 50, 25).
    assert!(rect.contains(Point::new(75.0, 25.0)));
    assert!(!rect.contains(Point::new(50.0, 25.0)));
}

#[test]
fn test_circle_hit_at_rotations() {
    let mut circle = Shape::Circle(Circle::new(Point::new(0.0, 0.0), Point::new(100.0, 50.0), style(2.0)));
    assert!(circle.contains(Point::new(100.0, 25.0)));
    assert!(circle.contains(Point::new(50.0, 0.0)));
    assert!(!circle.contains(Point::new(50.0, 25.0)));
    assert!(!circle.contains(Point::new(50.0, 75.0)));

    // Standing upright about (50, 25): the long axis runs from y = -25 to 75.
    circle.rotate(90.0);
    assert!(circle.contains(Point::new(50.0, 75.0)));
    assert!(circle.contains(Point::new(25.0, 25.0)));
    assert!(!circle.contains(Point::new(100.0, 25.0)));
    assert!(!circle.contains(Point::new(50.0, 25.0)));
}

#[test]
fn test_freehand_hit_at_rotations() {
    let mut stroke = Shape::Freehand(Freehand::from_points(
        vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0), Point::new(100.0, 0.0)],
        style(2.0),
    ));
    assert!(stroke.contains(Point::new(75.0, 0.0)));
    assert!(!stroke.contains(Point::new(50.0, 40.0)));

    // Vertical through x = 50 after a quarter turn.
    stroke.rotate(90.0);
    assert!(stroke.contains(Point::new(50.0, 40.0)));
    assert!(stroke.contains(Point::new(50.0, -40.0)));
    assert!(!stroke.contains(Point::new(90.0, 0.0)));
}

#[test]
fn test_polygon_hit_at_rotations() {
    let mut bar = Polygon::from_points(
        vec![
            Point::new(0.0, 0.0),
            Point::new(80.0, 0.0),
            Point::new(80.0, 20.0),
            Point::new(0.0, 20.0),
        ],
        style(2.0),
    );
    bar.finish();
    let mut bar = Shape::Polygon(bar);
    assert!(bar.contains(Point::new(70.0, 10.0)));
    assert!(!bar.contains(Point::new(40.0, 40.0)));

    // About (40, 10) the bar spans x 30..50 and y -30..50.
    bar.rotate(90.0);
    assert!(bar.contains(Point::new(40.0, 40.0)));
    assert!(!bar.contains(Point::new(70.0, 10.0)));
}

#[test]
fn test_bounds_cover_transformed_geometry() {
    for angle in [0.0, 45.0, 180.0] {
        for mut shape in one_of_each() {
            shape.rotate(angle);
            let bounds = shape.bounding_rect().inflate(1e-6, 1e-6);
            let half = shape.style().half_width();
            let transform = shape.draw_transform();
            let samples: Vec<Point> = match &shape {
                Shape::Circle(circle) => {
                    let r = circle.normalized();
                    (0..64)
                        .map(|i| {
                            let t = TAU * i as f64 / 64.0;
                            Point::new(
                                r.center().x + r.width() / 2.0 * t.cos(),
                                r.center().y + r.height() / 2.0 * t.sin(),
                            )
                        })
                        .collect()
                }
                _ => shape
                    .to_path()
                    .elements()
                    .iter()
                    .filter_map(|el| el.end_point())
                    .collect(),
            };
            for p in samples {
                let p = transform * p;
                for corner in [
                    Point::new(p.x - half, p.y),
                    Point::new(p.x + half, p.y),
                    Point::new(p.x, p.y - half),
                    Point::new(p.x, p.y + half),
                ] {
                    assert!(
                        bounds.contains(corner),
                        "{} at {angle}: {corner:?} outside {bounds:?}",
                        shape.name()
                    );
                }
            }
        }
    }
}

#[test]
fn test_undo_redo_restore_serialized_states() {
    let mut canvas = Canvas::new();
    let mut states = vec![serialized(&canvas)];

    draw(&mut canvas, ToolKind::Rectangle, Point::new(10.0, 10.0), Point::new(110.0, 60.0));
    states.push(serialized(&canvas));
    draw(&mut canvas, ToolKind::Line, Point::new(0.0, 200.0), Point::new(100.0, 250.0));
    states.push(serialized(&canvas));
    canvas.set_tool(ToolKind::Select);
    canvas.select_index(0);
    assert!(canvas.move_selected_up());
    states.push(serialized(&canvas));
    assert!(canvas.delete_selected());
    states.push(serialized(&canvas));

    for expected in states.iter().rev().skip(1) {
        assert!(canvas.undo());
        assert_eq!(&serialized(&canvas), expected);
    }
    assert!(!canvas.undo());

    for expected in states.iter().skip(1) {
        assert!(canvas.redo());
        assert_eq!(&serialized(&canvas), expected);
    }
    assert!(!canvas.redo());

    canvas.undo();
    canvas.undo();
    assert!(canvas.can_redo());
    assert!(canvas.clear());
    assert!(!canvas.can_redo());
}

#[test]
fn test_deleted_shape_stays_gone_after_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("drawing.json");

    let mut canvas = Canvas::new();
    draw(&mut canvas, ToolKind::Circle, Point::new(100.0, 100.0), Point::new(200.0, 180.0));
    draw(&mut canvas, ToolKind::Rectangle, Point::new(300.0, 300.0), Point::new(400.0, 380.0));
    canvas.set_tool(ToolKind::Select);
    canvas.select_index(1);
    let deleted = canvas.selection().unwrap();

    assert!(canvas.delete_selected());
    assert_eq!(canvas.selection(), None);
    assert!(canvas.document.get_shape(deleted).is_none());

    canvas.save_to_path(&path).unwrap();
    assert!(!canvas.is_modified());

    let mut reloaded = Canvas::new();
    reloaded.load_from_path(&path).unwrap();
    assert_eq!(reloaded.shape_names(), vec!["Circle 0"]);
}

#[test]
fn test_rectangle_survives_save_load() {
    let storage = MemoryStorage::new();
    let mut canvas = Canvas::new();
    canvas.set_pen_width(4.0);
    draw(&mut canvas, ToolKind::Rectangle, Point::new(10.0, 10.0), Point::new(110.0, 60.0));
    let before = canvas.document.shapes()[0].borrow().bounding_rect();
    assert_eq!(before, Rect::new(8.0, 8.0, 112.0, 62.0));

    canvas.save_to(&storage, "rect").unwrap();
    let mut loaded = Canvas::new();
    loaded.load_from(&storage, "rect").unwrap();

    let handle = loaded.document.shapes()[0].clone();
    let shape = handle.borrow();
    assert_eq!(shape.bounding_rect(), before);
    assert_eq!(shape.style().stroke_color, SerializableColor::black());
    assert!(!shape.is_filled());
    assert!(shape.contains(Point::new(10.0, 10.0)));
    assert!(!shape.contains(Point::new(60.0, 35.0)));
}

#[test]
fn test_polygon_closes_on_right_click() {
    let mut canvas = Canvas::new();
    canvas.set_tool(ToolKind::Polygon);
    for (x, y) in [(100.0, 100.0), (200.0, 100.0), (200.0, 200.0), (100.0, 200.0)] {
        click(&mut canvas, x, y);
    }
    press(&mut canvas, 150.0, 150.0, MouseButton::Right);

    assert!(!canvas.tool_manager.is_accumulating_polygon());
    let handle = canvas.document.shapes()[0].clone();
    let shape = handle.borrow();
    let polygon = shape.as_polygon().unwrap();
    assert_eq!(polygon.len(), 5);
    assert_eq!(polygon.points()[0], polygon.points()[4]);
}

#[test]
fn test_narrow_polygon_keeps_accumulating() {
    let mut canvas = Canvas::new();
    canvas.set_pen_width(1.0);
    canvas.set_tool(ToolKind::Polygon);
    for (x, y) in [(100.0, 100.0), (104.0, 150.0), (102.0, 200.0)] {
        click(&mut canvas, x, y);
    }
    press(&mut canvas, 0.0, 0.0, MouseButton::Right);

    assert!(canvas.tool_manager.is_accumulating_polygon());
    assert!(canvas.document.is_empty());
    let preview = canvas.preview_shape().unwrap();
    assert_eq!(preview.as_polygon().unwrap().len(), 3);
}

#[test]
fn test_regular_polygon_vertex_spacing() {
    for sides in [3, 20] {
        for rotation in [0.0, 33.0] {
            let mut shape = Shape::RegularPolygon(RegularPolygon::new(
                Point::new(200.0, 200.0),
                50.0,
                sides,
                style(2.0),
            ));
            shape.rotate(rotation);
            let transform = shape.draw_transform();
            let vertices = shape.as_regular_polygon().unwrap().vertices();
            assert_eq!(vertices.len(), sides as usize);

            let step = 360.0 / sides as f64;
            let angles: Vec<f64> = vertices
                .iter()
                .map(|v| {
                    let d = transform * *v - Point::new(200.0, 200.0);
                    d.y.atan2(d.x).to_degrees()
                })
                .collect();
            for pair in angles.windows(2) {
                let gap = (pair[1] - pair[0]).rem_euclid(360.0);
                assert!((gap - step).abs() < 1e-9, "{sides} sides at {rotation}: gap {gap}");
            }
        }
    }
}

#[test]
fn test_resize_selected_by_value() {
    let mut canvas = Canvas::new();
    draw(&mut canvas, ToolKind::RegularPolygon, Point::new(200.0, 200.0), Point::new(230.0, 200.0));
    canvas.resize_selected(Size::new(100.0, 80.0));
    let handle = canvas.selected_shape().unwrap();
    assert_eq!(handle.borrow().as_regular_polygon().unwrap().radius(), 40.0);

    canvas.rotate_selected(45.0);
    assert_eq!(handle.borrow().rotation(), 45.0);
}
