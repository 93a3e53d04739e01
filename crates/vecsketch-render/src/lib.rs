//! VecSketch Render Library
//!
//! Renderer abstraction and implementations for VecSketch.
//! The default implementation rasterises on the CPU with tiny-skia.

mod raster;
mod renderer;

pub use raster::{RasterRenderer, export_canvas, load_background};
pub use renderer::{RenderContext, RenderError, RenderResult, Renderer, ShapeRenderer};
