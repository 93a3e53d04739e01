//! JSON drawing format.
//!
//! ```json
//! { "version": 1, "penColor": "#000000", "penWidth": 6, "shapes": [ { "type": "Line", ... } ] }
//! ```
//!
//! Decoding is lenient about individual records: missing fields read as
//! zero, false or black, and records with an unknown `type` are skipped.

use super::{StorageError, StorageResult};
use crate::config::DEFAULT_PEN_WIDTH;
use crate::shapes::{
    Circle, Freehand, Line, Polygon, Rectangle, RegularPolygon, SerializableColor, Shape,
    ShapeStyle, ShapeTrait,
};
use kurbo::Point;
use serde_json::{Map, Value, json};

/// Format version written by this crate.
pub const FORMAT_VERSION: u64 = 1;

/// Decoded contents of a drawing file.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub pen_color: SerializableColor,
    pub pen_width: f64,
    /// Shapes back to front.
    pub shapes: Vec<Shape>,
}

impl Default for Drawing {
    fn default() -> Self {
        Self {
            pen_color: SerializableColor::black(),
            pen_width: DEFAULT_PEN_WIDTH,
            shapes: Vec::new(),
        }
    }
}

impl Drawing {
    pub fn new(pen_color: SerializableColor, pen_width: f64, shapes: Vec<Shape>) -> Self {
        Self {
            pen_color,
            pen_width,
            shapes,
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> StorageResult<String> {
        serde_json::to_string_pretty(&encode(self))
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Parse from JSON text.
    pub fn from_json(json: &str) -> StorageResult<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;
        decode(&value)
    }
}

/// Encode a drawing as a JSON value.
pub fn encode(drawing: &Drawing) -> Value {
    json!({
        "version": FORMAT_VERSION,
        "penColor": drawing.pen_color.to_hex(),
        "penWidth": number(drawing.pen_width),
        "shapes": drawing.shapes.iter().map(encode_shape).collect::<Vec<_>>(),
    })
}

/// Decode a drawing. The root must be an object with a `shapes` array.
pub fn decode(value: &Value) -> StorageResult<Drawing> {
    let root = value
        .as_object()
        .ok_or_else(|| StorageError::InvalidFormat("root is not an object".to_string()))?;
    let records = root
        .get("shapes")
        .ok_or_else(|| StorageError::InvalidFormat("missing \"shapes\"".to_string()))?
        .as_array()
        .ok_or_else(|| StorageError::InvalidFormat("\"shapes\" is not an array".to_string()))?;

    if let Some(version) = root.get("version").and_then(Value::as_u64) {
        if version > FORMAT_VERSION {
            log::warn!("Drawing format version {version} is newer than {FORMAT_VERSION}; reading anyway");
        }
    }

    let mut shapes = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let Some(obj) = record.as_object() else {
            log::warn!("Skipping shape record {index}: not an object");
            continue;
        };
        match decode_shape(obj) {
            Some(shape) => shapes.push(shape),
            None => log::warn!(
                "Skipping shape record {index}: unknown type {:?}",
                obj.get("type").and_then(Value::as_str).unwrap_or("")
            ),
        }
    }

    let pen_color = root
        .get("penColor")
        .and_then(Value::as_str)
        .map(SerializableColor::from_hex)
        .unwrap_or_default();
    let pen_width = root
        .get("penWidth")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_PEN_WIDTH);

    Ok(Drawing::new(pen_color, pen_width, shapes))
}

/// Encode one shape record, tagged with its type name.
pub fn encode_shape(shape: &Shape) -> Value {
    let style = shape.style();
    let color = style.stroke_color.to_hex();
    let width = number(style.stroke_width());
    let rotation = number(shape.rotation());
    let fill = style.fill_color.to_hex();
    let filled = style.filled;

    match shape {
        Shape::Line(line) => json!({
            "type": shape.name(),
            "p1x": number(line.start.x),
            "p1y": number(line.start.y),
            "p2x": number(line.end.x),
            "p2y": number(line.end.y),
            "color": color,
            "width": width,
            "rotation": rotation,
        }),
        Shape::Circle(circle) => json!({
            "type": shape.name(),
            "x": number(circle.rect.x0),
            "y": number(circle.rect.y0),
            "width": number(circle.rect.x1 - circle.rect.x0),
            "height": number(circle.rect.y1 - circle.rect.y0),
            "color": color,
            "penWidth": width,
            "rotation": rotation,
            "fillColor": fill,
            "isFilled": filled,
        }),
        Shape::Rectangle(rect) => json!({
            "type": shape.name(),
            "x1": number(rect.top_left.x),
            "y1": number(rect.top_left.y),
            "x2": number(rect.bottom_right.x),
            "y2": number(rect.bottom_right.y),
            "color": color,
            "width": width,
            "rotation": rotation,
            "fillColor": fill,
            "isFilled": filled,
        }),
        Shape::Freehand(freehand) => json!({
            "type": shape.name(),
            "points": encode_points(freehand.points()),
            "color": color,
            "width": width,
            "rotation": rotation,
        }),
        Shape::Polygon(polygon) => json!({
            "type": shape.name(),
            "points": encode_points(polygon.points()),
            "color": color,
            "penWidth": width,
            "rotation": rotation,
            "fillColor": fill,
            "isFilled": filled,
        }),
        Shape::RegularPolygon(ngon) => json!({
            "type": shape.name(),
            "centerX": number(ngon.center.x),
            "centerY": number(ngon.center.y),
            "radius": number(ngon.radius()),
            "sides": ngon.sides(),
            "color": color,
            "penWidth": width,
            "rotation": rotation,
            "fillColor": fill,
            "isFilled": filled,
        }),
    }
}

/// Decode one shape record. Returns `None` for an unknown type tag.
pub fn decode_shape(obj: &Map<String, Value>) -> Option<Shape> {
    let kind = obj.get("type").and_then(Value::as_str)?;
    let mut shape = match kind {
        "Line" => Shape::Line(Line::new(
            read_point(obj, "p1x", "p1y"),
            read_point(obj, "p2x", "p2y"),
            read_style(obj, "width"),
        )),
        "Circle" => Shape::Circle(Circle::from_origin_size(
            read_point(obj, "x", "y"),
            read_f64(obj, "width"),
            read_f64(obj, "height"),
            read_style(obj, "penWidth"),
        )),
        "Rectangle" => Shape::Rectangle(Rectangle::new(
            read_point(obj, "x1", "y1"),
            read_point(obj, "x2", "y2"),
            read_style(obj, "width"),
        )),
        "Freehand" => Shape::Freehand(Freehand::from_points(read_points(obj), read_style(obj, "width"))),
        "Polygon" => Shape::Polygon(Polygon::from_points(read_points(obj), read_style(obj, "penWidth"))),
        "RegularPolygon" => {
            let sides = obj
                .get("sides")
                .and_then(Value::as_u64)
                .map_or(0, |s| u32::try_from(s).unwrap_or(u32::MAX));
            Shape::RegularPolygon(RegularPolygon::new(
                read_point(obj, "centerX", "centerY"),
                read_f64(obj, "radius"),
                sides,
                read_style(obj, "penWidth"),
            ))
        }
        _ => return None,
    };

    shape.rotate(read_f64(obj, "rotation"));
    shape.set_fill(read_color(obj, "fillColor"), read_bool(obj, "isFilled"));
    Some(shape)
}

/// Integral values as JSON integers, everything else as floats.
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

fn encode_points(points: &[Point]) -> Value {
    Value::Array(
        points
            .iter()
            .map(|p| json!({ "x": number(p.x), "y": number(p.y) }))
            .collect(),
    )
}

fn read_f64(obj: &Map<String, Value>, key: &str) -> f64 {
    obj.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn read_bool(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn read_color(obj: &Map<String, Value>, key: &str) -> SerializableColor {
    obj.get(key)
        .and_then(Value::as_str)
        .map(SerializableColor::from_hex)
        .unwrap_or_default()
}

fn read_point(obj: &Map<String, Value>, x: &str, y: &str) -> Point {
    Point::new(read_f64(obj, x), read_f64(obj, y))
}

fn read_points(obj: &Map<String, Value>) -> Vec<Point> {
    obj.get("points")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|p| read_point(p, "x", "y"))
                .collect()
        })
        .unwrap_or_default()
}

fn read_style(obj: &Map<String, Value>, width_key: &str) -> ShapeStyle {
    ShapeStyle::new(read_color(obj, "color"), read_f64(obj, width_key))
}
