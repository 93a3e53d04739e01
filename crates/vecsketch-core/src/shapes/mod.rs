//! Shape definitions for the editor.

mod circle;
mod freehand;
pub mod geometry;
mod line;
mod polygon;
mod rectangle;
mod regular_polygon;

pub use circle::Circle;
pub use freehand::Freehand;
pub use line::Line;
pub use polygon::Polygon;
pub use rectangle::Rectangle;
pub use regular_polygon::{MAX_SIDES, MIN_SIDES, RegularPolygon, clamp_sides};

use kurbo::{Affine, BezPath, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Serializable color representation (RGBA8).
///
/// Persisted as a `#rrggbb` string; alpha is runtime-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Build an opaque color from hue (degrees), saturation and value in `0..=1`.
    pub fn from_hsv(hue: f64, saturation: f64, value: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = value * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = value - c;
        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. Anything else is black.
    pub fn from_hex(color: &str) -> Self {
        let Some(hex) = color.trim().strip_prefix('#') else {
            return Self::black();
        };
        if !hex.is_ascii() {
            return Self::black();
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        let parsed = match hex.len() {
            3 => (|| {
                Some(Self::rgb(
                    channel(&hex[0..1])? * 17,
                    channel(&hex[1..2])? * 17,
                    channel(&hex[2..3])? * 17,
                ))
            })(),
            6 => (|| {
                Some(Self::rgb(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                ))
            })(),
            8 => (|| {
                Some(Self::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    channel(&hex[6..8])?,
                ))
            })(),
            _ => None,
        };
        parsed.unwrap_or_else(Self::black)
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<String> for SerializableColor {
    fn from(value: String) -> Self {
        Self::from_hex(&value)
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

/// Minimum stroke width accepted by any shape.
pub const MIN_STROKE_WIDTH: f64 = 1.0;

/// Style properties for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width, never below [`MIN_STROKE_WIDTH`].
    stroke_width: f64,
    /// Fill color, kept even while the shape is unfilled.
    pub fill_color: SerializableColor,
    /// Whether the fill is painted.
    pub filled: bool,
}

impl ShapeStyle {
    pub fn new(stroke_color: SerializableColor, stroke_width: f64) -> Self {
        Self {
            stroke_color,
            stroke_width: clamp_stroke_width(stroke_width),
            fill_color: SerializableColor::black(),
            filled: false,
        }
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    /// Set the stroke width, clamping to [`MIN_STROKE_WIDTH`].
    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = clamp_stroke_width(width);
    }

    /// Half the stroke width; the amount every bounding rect is inflated by.
    pub fn half_width(&self) -> f64 {
        self.stroke_width / 2.0
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::new(SerializableColor::black(), 2.0)
    }
}

fn clamp_stroke_width(width: f64) -> f64 {
    if width.is_finite() {
        width.max(MIN_STROKE_WIDTH)
    } else {
        MIN_STROKE_WIDTH
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Shared handle to a shape owned by the document.
///
/// Undo snapshots hold clones of these handles, so in-place edits made
/// after a snapshot was taken are visible through it.
pub type ShapeHandle = Rc<RefCell<Shape>>;

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Display name, also used as the persisted type tag.
    fn name(&self) -> &'static str;

    /// Unrotated geometry for rendering.
    fn to_path(&self) -> BezPath;

    /// Point the rotation is applied about.
    fn pivot(&self) -> Point;

    /// Check if a point hits this shape's stroke (or fill where applicable).
    fn contains(&self, point: Point) -> bool;

    /// Translate the geometry.
    fn move_by(&mut self, dx: f64, dy: f64);

    /// Rescale the geometry to a target size. Degenerate input is ignored.
    fn resize(&mut self, size: Size);

    /// Live-drag update used while the shape is being created.
    fn update(&mut self, point: Point);

    /// Advance one frame of the shape's built-in motion.
    fn animate_step(&mut self) {}

    /// Rotation angle in degrees.
    fn rotation(&self) -> f64;

    /// Set the absolute rotation angle in degrees.
    fn rotate(&mut self, degrees: f64);

    fn is_animated(&self) -> bool;

    fn set_animated(&mut self, animated: bool);

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Whether fill color and filled flag are meaningful for this shape.
    fn supports_fill(&self) -> bool {
        false
    }

    /// Transform applied at draw time (rotation about the pivot).
    fn draw_transform(&self) -> Affine {
        geometry::rotation_about(self.pivot(), self.rotation())
    }

    /// Axis-aligned bounds of the rotated geometry, inflated by half the stroke.
    fn bounding_rect(&self) -> Rect {
        geometry::rotated_bounds(&self.to_path(), self.draw_transform(), self.style().half_width())
    }
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line(Line),
    Circle(Circle),
    Rectangle(Rectangle),
    Freehand(Freehand),
    Polygon(Polygon),
    RegularPolygon(RegularPolygon),
}

impl Shape {
    /// Borrow the variant as a trait object.
    pub fn as_dyn(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Line(s) => s,
            Shape::Circle(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Freehand(s) => s,
            Shape::Polygon(s) => s,
            Shape::RegularPolygon(s) => s,
        }
    }

    /// Mutably borrow the variant as a trait object.
    pub fn as_dyn_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Shape::Line(s) => s,
            Shape::Circle(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Freehand(s) => s,
            Shape::Polygon(s) => s,
            Shape::RegularPolygon(s) => s,
        }
    }

    /// Vertex accumulation capability (polygon tool).
    pub fn as_polygon_mut(&mut self) -> Option<&mut Polygon> {
        match self {
            Shape::Polygon(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Shape::Polygon(p) => Some(p),
            _ => None,
        }
    }

    /// Side-count capability.
    pub fn as_regular_polygon_mut(&mut self) -> Option<&mut RegularPolygon> {
        match self {
            Shape::RegularPolygon(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_regular_polygon(&self) -> Option<&RegularPolygon> {
        match self {
            Shape::RegularPolygon(p) => Some(p),
            _ => None,
        }
    }

    /// Set the fill color and flag. Ignored by shapes without a fill.
    pub fn set_fill(&mut self, color: SerializableColor, filled: bool) {
        if self.supports_fill() {
            let style = self.style_mut();
            style.fill_color = color;
            style.filled = filled;
        }
    }

    /// Fill color reported to property editors (black for unfillable shapes).
    pub fn fill_color(&self) -> SerializableColor {
        if self.supports_fill() {
            self.style().fill_color
        } else {
            SerializableColor::black()
        }
    }

    pub fn is_filled(&self) -> bool {
        self.supports_fill() && self.style().filled
    }

    /// Wrap into a shared handle.
    pub fn into_handle(self) -> ShapeHandle {
        Rc::new(RefCell::new(self))
    }
}

impl ShapeTrait for Shape {
    fn id(&self) -> ShapeId {
        self.as_dyn().id()
    }

    fn name(&self) -> &'static str {
        self.as_dyn().name()
    }

    fn to_path(&self) -> BezPath {
        self.as_dyn().to_path()
    }

    fn pivot(&self) -> Point {
        self.as_dyn().pivot()
    }

    fn contains(&self, point: Point) -> bool {
        self.as_dyn().contains(point)
    }

    fn move_by(&mut self, dx: f64, dy: f64) {
        self.as_dyn_mut().move_by(dx, dy);
    }

    fn resize(&mut self, size: Size) {
        self.as_dyn_mut().resize(size);
    }

    fn update(&mut self, point: Point) {
        self.as_dyn_mut().update(point);
    }

    fn animate_step(&mut self) {
        self.as_dyn_mut().animate_step();
    }

    fn rotation(&self) -> f64 {
        self.as_dyn().rotation()
    }

    fn rotate(&mut self, degrees: f64) {
        self.as_dyn_mut().rotate(degrees);
    }

    fn is_animated(&self) -> bool {
        self.as_dyn().is_animated()
    }

    fn set_animated(&mut self, animated: bool) {
        self.as_dyn_mut().set_animated(animated);
    }

    fn style(&self) -> &ShapeStyle {
        self.as_dyn().style()
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        self.as_dyn_mut().style_mut()
    }

    fn supports_fill(&self) -> bool {
        self.as_dyn().supports_fill()
    }

    fn draw_transform(&self) -> Affine {
        self.as_dyn().draw_transform()
    }

    fn bounding_rect(&self) -> Rect {
        self.as_dyn().bounding_rect()
    }
}
