//! VecSketch Core Library
//!
//! Platform-agnostic document model, tools and persistence for the
//! VecSketch vector editor. Hosts feed pointer events and commands into a
//! [`Canvas`] and read back shapes and [`CanvasEvent`]s.

pub mod animation;
pub mod canvas;
pub mod config;
pub mod events;
pub mod history;
pub mod input;
pub mod selection;
pub mod shapes;
pub mod storage;
pub mod tools;

/// Logical canvas width. Bouncing circles reflect off this edge.
pub const CANVAS_WIDTH: f64 = 800.0;
/// Logical canvas height.
pub const CANVAS_HEIGHT: f64 = 600.0;

pub use animation::AnimationDriver;
pub use canvas::{Canvas, CanvasDocument};
pub use config::{ConfigError, EditorConfig};
pub use events::{CanvasEvent, EventQueue, ShapeParameters};
pub use history::History;
pub use input::{InputState, MouseButton, PointerEvent};
pub use selection::{DragMode, HandleKind, ManipulationState};
pub use shapes::{SerializableColor, Shape, ShapeHandle, ShapeId, ShapeStyle, ShapeTrait};
pub use storage::{Drawing, Storage, StorageError, StorageResult};
pub use tools::{ToolKind, ToolManager};
