//! VecSketch Application
//!
//! Command-line shell around the editor core: inspect a drawing, rewrite it
//! in the canonical format, or rasterise it to an image file.

use clap::{Parser, Subcommand};
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use thiserror::Error;
use vecsketch_core::{Canvas, ConfigError, EditorConfig, ShapeTrait, StorageError};
use vecsketch_render::{RenderError, export_canvas, load_background};

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Report formatting failed")]
    Format(#[from] fmt::Error),
}

#[derive(Parser, Debug)]
#[command(name = "vecsketch", about = "Inspect, normalize and export VecSketch drawings")]
pub struct Cli {
    /// Editor config file (JSON).
    #[arg(long, env = "VECSKETCH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print pen settings and the shape list.
    Info { input: PathBuf },
    /// Load and save again; writes back to the input when no output is given.
    Normalize {
        input: PathBuf,
        output: Option<PathBuf>,
    },
    /// Rasterise at the configured canvas size. Format follows the output extension.
    Export {
        input: PathBuf,
        output: PathBuf,
        /// Image stretched under the shapes.
        #[arg(long)]
        background: Option<PathBuf>,
    },
}

fn open_canvas(input: &Path, config: EditorConfig) -> Result<Canvas, AppError> {
    let mut canvas = Canvas::with_config(config);
    canvas.load_from_path(input)?;
    Ok(canvas)
}

/// Pen settings and one line per shape, in z-order.
fn write_info(out: &mut String, input: &Path, canvas: &Canvas) -> fmt::Result {
    writeln!(out, "{}", input.display())?;
    writeln!(out, "pen: {} width {}", canvas.pen_color(), canvas.pen_width())?;
    writeln!(out, "shapes: {}", canvas.document.len())?;
    for (name, handle) in canvas.shape_names().iter().zip(canvas.shapes()) {
        let shape = handle.borrow();
        let bounds = shape.bounding_rect();
        writeln!(
            out,
            "  {name}: {}x{} at ({}, {}), rotation {}",
            bounds.width().round(),
            bounds.height().round(),
            bounds.x0.round(),
            bounds.y0.round(),
            shape.rotation()
        )?;
    }
    Ok(())
}

/// Run the parsed command and return the text to print.
pub fn run(cli: &Cli) -> Result<String, AppError> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    let report = match &cli.command {
        Command::Info { input } => {
            let canvas = open_canvas(input, config)?;
            let mut report = String::new();
            write_info(&mut report, input, &canvas)?;
            report
        }
        Command::Normalize { input, output } => {
            let mut canvas = open_canvas(input, config)?;
            let target = output.as_deref().unwrap_or(input);
            canvas.save_to_path(target)?;
            format!(
                "wrote {} shapes to {}\n",
                canvas.document.len(),
                target.display()
            )
        }
        Command::Export {
            input,
            output,
            background,
        } => {
            let canvas = open_canvas(input, config)?;
            let background = background.as_deref().map(load_background).transpose()?;
            export_canvas(&canvas, output, background.as_ref())?;
            let size = canvas.config().canvas_size();
            format!(
                "exported {}x{} to {}\n",
                size.width,
                size.height,
                output.display()
            )
        }
    };
    Ok(report)
}
