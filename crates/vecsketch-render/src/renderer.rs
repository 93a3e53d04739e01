//! Renderer trait abstraction.

use image::RgbaImage;
use kurbo::{Rect, Size};
use thiserror::Error;
use vecsketch_core::canvas::Canvas;
use vecsketch_core::shapes::{SerializableColor, Shape};

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot allocate a {0} pixmap")]
    Pixmap(String),
    #[error("Image error: {0}")]
    Image(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => RenderError::Io(e.to_string()),
            other => RenderError::Image(other.to_string()),
        }
    }
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Output size in pixels.
    pub canvas_size: Size,
    /// Background color.
    pub background_color: SerializableColor,
    /// Image stretched over the whole canvas under the shapes.
    pub background_image: Option<&'a RgbaImage>,
    /// Draw resize and rotate handles around the selection.
    pub show_selection: bool,
    /// Draw the shape being created and the polygon rubber band.
    pub show_preview: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context sized from the canvas config.
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            canvas_size: canvas.config().canvas_size(),
            background_color: SerializableColor::white(),
            background_image: None,
            show_selection: true,
            show_preview: true,
        }
    }

    /// Context for file export: document shapes only.
    pub fn for_export(canvas: &'a Canvas) -> Self {
        Self::new(canvas).with_selection(false).with_preview(false)
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.canvas_size = size;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: SerializableColor) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_background_image(mut self, image: Option<&'a RgbaImage>) -> Self {
        self.background_image = image;
        self
    }

    pub fn with_selection(mut self, show: bool) -> Self {
        self.show_selection = show;
        self
    }

    pub fn with_preview(mut self, show: bool) -> Self {
        self.show_preview = show;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Draw a full frame for `ctx`.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> SerializableColor {
        ctx.background_color
    }
}

/// Helper trait for shape rendering (used internally by renderers).
pub trait ShapeRenderer {
    /// Render a shape with its own rotation and style.
    fn render_shape(&mut self, shape: &Shape);

    /// Render selection handles around `bounds`.
    fn render_selection_handles(&mut self, bounds: Rect);
}
