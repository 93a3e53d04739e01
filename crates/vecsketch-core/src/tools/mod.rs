//! Tool system for the editor.

use crate::selection::ManipulationState;
use crate::shapes::{
    Circle, Freehand, Line, Polygon, Rectangle, RegularPolygon, Shape, ShapeStyle, ShapeTrait,
    clamp_sides,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A live-drawn shape is kept only if its bounds exceed this in width or height.
pub const MIN_COMMIT_EXTENT: f64 = 5.0;
/// A polygon finishes only if its bounds are wider than this.
pub const MIN_POLYGON_WIDTH: f64 = 10.0;
/// Radius a new regular polygon starts with.
pub const INITIAL_REGULAR_RADIUS: f64 = 10.0;
/// Default side count for new regular polygons.
pub const DEFAULT_POLYGON_SIDES: u32 = 5;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Line,
    Circle,
    Rectangle,
    Freehand,
    Polygon,
    RegularPolygon,
}

impl ToolKind {
    /// Tools that create shapes on press.
    pub fn is_drawing(self) -> bool {
        !matches!(self, ToolKind::Select)
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// A shape is following the pointer until release.
    Creating { shape: Shape },
    /// Polygon vertices are being placed click by click.
    PolygonAccumulating {
        shape: Shape,
        /// Last pointer position, for a rubber-band segment.
        preview: Option<Point>,
    },
    /// The selected shape is being moved, resized or rotated.
    Dragging(ManipulationState),
}

/// Manages the current tool and its state.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
    /// Pen color and width applied to new shapes.
    pub current_style: ShapeStyle,
    /// Side count for new regular polygons.
    pub polygon_sides: u32,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new(ShapeStyle::default(), DEFAULT_POLYGON_SIDES)
    }
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new(current_style: ShapeStyle, polygon_sides: u32) -> Self {
        Self {
            current_tool: ToolKind::default(),
            state: ToolState::Idle,
            current_style,
            polygon_sides: clamp_sides(polygon_sides),
        }
    }

    /// Set the current tool, dropping any shape under construction.
    /// Returns true if something in progress was abandoned.
    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        let abandoned = self.is_creating();
        if abandoned {
            log::debug!("Switching to {tool:?} abandons the shape in progress");
        }
        self.current_tool = tool;
        self.state = ToolState::Idle;
        abandoned
    }

    /// Build a fresh shape for the current tool at `point`, styled with the pen.
    pub fn create_shape(&self, point: Point) -> Option<Shape> {
        let style = ShapeStyle::new(self.current_style.stroke_color, self.current_style.stroke_width());
        let shape = match self.current_tool {
            ToolKind::Select => return None,
            ToolKind::Line => Shape::Line(Line::new(point, point, style)),
            ToolKind::Circle => Shape::Circle(Circle::new(point, point, style)),
            ToolKind::Rectangle => Shape::Rectangle(Rectangle::new(point, point, style)),
            ToolKind::Freehand => {
                let mut freehand = Freehand::new(style);
                freehand.update(point);
                Shape::Freehand(freehand)
            }
            ToolKind::Polygon => {
                let mut polygon = Polygon::new(style);
                polygon.update(point);
                Shape::Polygon(polygon)
            }
            ToolKind::RegularPolygon => Shape::RegularPolygon(RegularPolygon::new(
                point,
                INITIAL_REGULAR_RADIUS,
                self.polygon_sides,
                style,
            )),
        };
        Some(shape)
    }

    /// Begin drawing at `point`. Returns false for the select tool.
    pub fn begin(&mut self, point: Point) -> bool {
        let Some(shape) = self.create_shape(point) else {
            return false;
        };
        self.state = if self.current_tool == ToolKind::Polygon {
            log::debug!("Polygon started at ({}, {})", point.x, point.y);
            ToolState::PolygonAccumulating { shape, preview: None }
        } else {
            log::debug!("{} started at ({}, {})", shape.name(), point.x, point.y);
            ToolState::Creating { shape }
        };
        true
    }

    /// Live update of the shape being drawn. Returns it for parameter broadcasts.
    pub fn update(&mut self, point: Point) -> Option<&Shape> {
        match &mut self.state {
            ToolState::Creating { shape } => {
                shape.update(point);
                Some(shape)
            }
            ToolState::PolygonAccumulating { preview, .. } => {
                *preview = Some(point);
                None
            }
            _ => None,
        }
    }

    /// Finish a live drag at `point`. Returns the shape if it is large enough to keep.
    pub fn end(&mut self, point: Point) -> Option<Shape> {
        if !matches!(self.state, ToolState::Creating { .. }) {
            return None;
        }
        let ToolState::Creating { mut shape } = std::mem::take(&mut self.state) else {
            return None;
        };
        shape.update(point);
        let bounds = shape.bounding_rect();
        if bounds.width() > MIN_COMMIT_EXTENT || bounds.height() > MIN_COMMIT_EXTENT {
            Some(shape)
        } else {
            log::debug!("Discarding {} smaller than {MIN_COMMIT_EXTENT} px", shape.name());
            None
        }
    }

    /// Append a vertex to the polygon being placed.
    pub fn add_polygon_point(&mut self, point: Point) -> bool {
        match &mut self.state {
            ToolState::PolygonAccumulating { shape, .. } => match shape.as_polygon_mut() {
                Some(polygon) => {
                    polygon.add_point(point);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Close the polygon being placed if it is wide enough.
    /// Otherwise the polygon stays in progress and `None` is returned.
    pub fn finish_polygon(&mut self) -> Option<Shape> {
        let ToolState::PolygonAccumulating { shape, .. } = &self.state else {
            return None;
        };
        if shape.bounding_rect().width() <= MIN_POLYGON_WIDTH {
            log::debug!("Polygon too narrow to finish");
            return None;
        }
        let ToolState::PolygonAccumulating { mut shape, .. } = std::mem::take(&mut self.state) else {
            return None;
        };
        if let Some(polygon) = shape.as_polygon_mut() {
            polygon.finish();
        }
        Some(shape)
    }

    /// Start dragging the selected shape.
    pub fn begin_drag(&mut self, manipulation: ManipulationState) {
        log::debug!("Drag started: {:?}", manipulation.mode);
        self.state = ToolState::Dragging(manipulation);
    }

    pub fn drag_mut(&mut self) -> Option<&mut ManipulationState> {
        match &mut self.state {
            ToolState::Dragging(manipulation) => Some(manipulation),
            _ => None,
        }
    }

    /// End a drag. Returns true if one was active.
    pub fn end_drag(&mut self) -> bool {
        if matches!(self.state, ToolState::Dragging(_)) {
            self.state = ToolState::Idle;
            true
        } else {
            false
        }
    }

    /// Cancel the current interaction.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Whether a shape is under construction.
    pub fn is_creating(&self) -> bool {
        matches!(
            self.state,
            ToolState::Creating { .. } | ToolState::PolygonAccumulating { .. }
        )
    }

    pub fn is_accumulating_polygon(&self) -> bool {
        matches!(self.state, ToolState::PolygonAccumulating { .. })
    }

    /// Check if a tool interaction is active.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, ToolState::Idle)
    }

    /// Shape under construction, for drawing a preview.
    pub fn preview_shape(&self) -> Option<&Shape> {
        match &self.state {
            ToolState::Creating { shape } | ToolState::PolygonAccumulating { shape, .. } => Some(shape),
            _ => None,
        }
    }

    /// Pointer position while placing polygon vertices.
    pub fn polygon_preview(&self) -> Option<Point> {
        match &self.state {
            ToolState::PolygonAccumulating { preview, .. } => *preview,
            _ => None,
        }
    }
}
