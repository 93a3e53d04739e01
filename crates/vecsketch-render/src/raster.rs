//! CPU renderer built on tiny-skia.

use crate::renderer::{RenderContext, RenderError, RenderResult, Renderer, ShapeRenderer};
use image::{DynamicImage, ImageFormat, RgbaImage, imageops::FilterType};
use kurbo::{Affine, BezPath, PathEl, Point, Rect, Size};
use std::path::Path;
use tiny_skia::{
    Color, ColorU8, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    Transform,
};
use vecsketch_core::canvas::Canvas;
use vecsketch_core::selection::get_handles;
use vecsketch_core::shapes::{SerializableColor, Shape, ShapeStyle, ShapeTrait};

fn selection_color() -> Color {
    Color::from_rgba8(59, 130, 246, 255)
}

fn to_color(color: SerializableColor) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn to_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

/// Convert a kurbo path. Returns `None` for paths with no drawable segment.
fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p) => pb.quad_to(p1.x as f32, p1.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(p1, p2, p) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

fn pen(style: &ShapeStyle) -> (Paint<'static>, Stroke) {
    let mut paint = Paint::default();
    paint.set_color(to_color(style.stroke_color));
    paint.anti_alias = true;
    let stroke = Stroke {
        width: style.stroke_width() as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    (paint, stroke)
}

/// Renders a canvas into an RGBA pixmap.
pub struct RasterRenderer {
    pixmap: Pixmap,
}

impl RasterRenderer {
    /// Create a renderer with a pixmap of `size` pixels.
    pub fn new(size: Size) -> RenderResult<Self> {
        Ok(Self {
            pixmap: Self::allocate(size)?,
        })
    }

    fn allocate(size: Size) -> RenderResult<Pixmap> {
        let (width, height) = (size.width.round(), size.height.round());
        if width < 1.0 || height < 1.0 || width > u32::MAX as f64 || height > u32::MAX as f64 {
            return Err(RenderError::Pixmap(format!("{width}x{height}")));
        }
        Pixmap::new(width as u32, height as u32)
            .ok_or_else(|| RenderError::Pixmap(format!("{width}x{height}")))
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha copy of the current frame.
    pub fn to_rgba_image(&self) -> RenderResult<RgbaImage> {
        let data = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect::<Vec<u8>>();
        RgbaImage::from_raw(self.width(), self.height(), data)
            .ok_or_else(|| RenderError::Image("pixel buffer size mismatch".to_string()))
    }

    /// Write the current frame; the format follows the file extension.
    pub fn save(&self, path: &Path) -> RenderResult<()> {
        let format = ImageFormat::from_path(path)?;
        let rgb = DynamicImage::ImageRgba8(self.to_rgba_image()?).to_rgb8();
        rgb.save_with_format(path, format)?;
        log::info!("Exported {}x{} image to {}", self.width(), self.height(), path.display());
        Ok(())
    }

    fn draw_background_image(&mut self, image: &RgbaImage) -> RenderResult<()> {
        let scaled = image::imageops::resize(image, self.width(), self.height(), FilterType::Triangle);
        let mut layer = Pixmap::new(self.width(), self.height())
            .ok_or_else(|| RenderError::Pixmap(format!("{}x{}", self.width(), self.height())))?;
        for (dst, src) in layer.pixels_mut().iter_mut().zip(scaled.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        self.pixmap.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }

    /// Segment from the last placed polygon vertex to the pointer.
    fn render_rubber_band(&mut self, shape: &Shape, cursor: Point) {
        let Some(last) = shape.as_polygon().and_then(|p| p.points().last().copied()) else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(last.x as f32, last.y as f32);
        pb.line_to(cursor.x as f32, cursor.y as f32);
        if let Some(path) = pb.finish() {
            let (paint, stroke) = pen(shape.style());
            self.pixmap
                .stroke_path(&path, &paint, &stroke, to_transform(shape.draw_transform()), None);
        }
    }
}

impl ShapeRenderer for RasterRenderer {
    fn render_shape(&mut self, shape: &Shape) {
        let Some(path) = to_skia_path(&shape.to_path()) else {
            return;
        };
        let transform = to_transform(shape.draw_transform());

        if shape.is_filled() {
            let mut fill = Paint::default();
            fill.set_color(to_color(shape.fill_color()));
            fill.anti_alias = true;
            self.pixmap
                .fill_path(&path, &fill, FillRule::EvenOdd, transform, None);
        }

        let (paint, stroke) = pen(shape.style());
        self.pixmap
            .stroke_path(&path, &paint, &stroke, transform, None);
    }

    fn render_selection_handles(&mut self, bounds: Rect) {
        let mut paint = Paint::default();
        paint.set_color(selection_color());
        paint.anti_alias = true;

        if let Some(outline) = tiny_skia::Rect::from_ltrb(
            bounds.x0 as f32,
            bounds.y0 as f32,
            bounds.x1 as f32,
            bounds.y1 as f32,
        ) {
            let stroke = Stroke {
                width: 1.0,
                ..Default::default()
            };
            self.pixmap.stroke_path(
                &PathBuilder::from_rect(outline),
                &paint,
                &stroke,
                Transform::identity(),
                None,
            );
        }

        for handle in get_handles(bounds) {
            let r = handle.rect();
            if let Some(rect) =
                tiny_skia::Rect::from_xywh(r.x0 as f32, r.y0 as f32, r.width() as f32, r.height() as f32)
            {
                self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }
    }
}

impl Renderer for RasterRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        if self.width() != ctx.canvas_size.width.round() as u32
            || self.height() != ctx.canvas_size.height.round() as u32
        {
            self.pixmap = Self::allocate(ctx.canvas_size)?;
        }

        self.pixmap.fill(to_color(self.background_color(ctx)));
        if let Some(image) = ctx.background_image {
            self.draw_background_image(image)?;
        }

        for handle in ctx.canvas.shapes() {
            self.render_shape(&handle.borrow());
        }

        if ctx.show_preview {
            if let Some(shape) = ctx.canvas.preview_shape() {
                self.render_shape(shape);
                if let Some(cursor) = ctx.canvas.polygon_preview() {
                    self.render_rubber_band(shape, cursor);
                }
            }
        }

        if ctx.show_selection {
            if let Some(handle) = ctx.canvas.selected_shape() {
                let bounds = handle.borrow().bounding_rect();
                self.render_selection_handles(bounds);
            }
        }
        Ok(())
    }
}

/// Decode an image file for use as a canvas background.
pub fn load_background(path: &Path) -> RenderResult<RgbaImage> {
    let image = image::open(path)?;
    log::info!("Loaded background {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image.to_rgba8())
}

/// Render the document at the configured canvas size and write it to `path`.
/// The selection and any shape in progress are left out.
pub fn export_canvas(canvas: &Canvas, path: &Path, background: Option<&RgbaImage>) -> RenderResult<()> {
    let ctx = RenderContext::for_export(canvas).with_background_image(background);
    let mut renderer = RasterRenderer::new(ctx.canvas_size)?;
    renderer.build_scene(&ctx)?;
    renderer.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use vecsketch_core::shapes::Rectangle;

    fn canvas_with_rect(filled: bool) -> Canvas {
        let mut canvas = Canvas::new();
        let mut rect = Rectangle::new(
            Point::new(100.0, 100.0),
            Point::new(300.0, 200.0),
            ShapeStyle::new(SerializableColor::black(), 2.0),
        );
        rect.style.fill_color = SerializableColor::rgb(0, 0, 255);
        rect.style.filled = filled;
        canvas.document.add_shape(Shape::Rectangle(rect));
        canvas
    }

    fn rgb_at(renderer: &RasterRenderer, x: u32, y: u32) -> (u8, u8, u8) {
        let px = renderer.pixmap().pixel(x, y).unwrap().demultiply();
        (px.red(), px.green(), px.blue())
    }

    #[test]
    fn test_renderer_creation() {
        let renderer = RasterRenderer::new(Size::new(800.0, 600.0)).unwrap();
        assert_eq!((renderer.width(), renderer.height()), (800, 600));
        assert!(matches!(
            RasterRenderer::new(Size::new(0.0, 10.0)),
            Err(RenderError::Pixmap(_))
        ));
    }

    #[test]
    fn test_empty_scene_is_white() {
        let canvas = Canvas::new();
        let mut renderer = RasterRenderer::new(Size::new(800.0, 600.0)).unwrap();
        renderer.build_scene(&RenderContext::new(&canvas)).unwrap();
        assert_eq!(rgb_at(&renderer, 0, 0), (255, 255, 255));
        assert_eq!(rgb_at(&renderer, 799, 599), (255, 255, 255));
    }

    #[test]
    fn test_fill_and_stroke() {
        let canvas = canvas_with_rect(true);
        let mut renderer = RasterRenderer::new(Size::new(800.0, 600.0)).unwrap();
        renderer.build_scene(&RenderContext::for_export(&canvas)).unwrap();

        assert_eq!(rgb_at(&renderer, 200, 150), (0, 0, 255));
        assert_eq!(rgb_at(&renderer, 100, 150), (0, 0, 0));
        assert_eq!(rgb_at(&renderer, 50, 50), (255, 255, 255));
    }

    #[test]
    fn test_unfilled_interior_stays_white() {
        let canvas = canvas_with_rect(false);
        let mut renderer = RasterRenderer::new(Size::new(800.0, 600.0)).unwrap();
        renderer.build_scene(&RenderContext::for_export(&canvas)).unwrap();
        assert_eq!(rgb_at(&renderer, 200, 150), (255, 255, 255));
    }

    #[test]
    fn test_selection_overlay_only_when_enabled() {
        let mut canvas = canvas_with_rect(false);
        canvas.select_index(0);
        let mut renderer = RasterRenderer::new(Size::new(800.0, 600.0)).unwrap();

        // Resize handle is centered on the bounds corner (301, 201).
        renderer.build_scene(&RenderContext::new(&canvas)).unwrap();
        assert_eq!(rgb_at(&renderer, 303, 203), (59, 130, 246));

        renderer.build_scene(&RenderContext::for_export(&canvas)).unwrap();
        assert_eq!(rgb_at(&renderer, 303, 203), (255, 255, 255));
    }

    #[test]
    fn test_background_image_is_stretched() {
        let canvas = Canvas::new();
        let background = RgbaImage::from_pixel(2, 2, image::Rgba([200, 10, 10, 255]));
        let mut renderer = RasterRenderer::new(Size::new(64.0, 48.0)).unwrap();
        let ctx = RenderContext::new(&canvas)
            .with_size(Size::new(64.0, 48.0))
            .with_background_image(Some(&background));
        renderer.build_scene(&ctx).unwrap();

        assert_eq!(rgb_at(&renderer, 0, 0), (200, 10, 10));
        assert_eq!(rgb_at(&renderer, 63, 47), (200, 10, 10));
    }

    #[test]
    fn test_export_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");
        export_canvas(&canvas_with_rect(true), &path, None).unwrap();

        let image = image::open(&path).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (800, 600));
        assert_eq!(image.get_pixel(200, 150).0, [0, 0, 255]);
    }

    #[test]
    fn test_export_unknown_extension() {
        let dir = tempdir().unwrap();
        let result = export_canvas(&Canvas::new(), &dir.path().join("out.xyz"), None);
        assert!(matches!(result, Err(RenderError::Image(_))));
    }

    #[test]
    fn test_missing_background() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_background(&dir.path().join("none.png")),
            Err(RenderError::Io(_))
        ));
    }
}
