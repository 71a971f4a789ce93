//! jpainter drawing engine
//!
//! A touch-driven freehand canvas:
//! - [`coords`] / [`viewport`] - screen <-> canvas mapping, pan and zoom
//! - [`stroke`] - polyline strokes with per-stroke paint style
//! - [`brush`] / [`surface`] / [`raster`] - CPU rasterization of a frame
//! - [`gesture`] - draw / pinch / pan classification of touch input
//! - [`render_loop`] - fixed-rate render thread and display buffers
//! - [`painter`] - the facade hosts drive

pub mod brush;
pub mod canvas;
pub mod constants;
pub mod coords;
pub mod error;
pub mod gesture;
pub mod painter;
pub mod raster;
pub mod render_loop;
pub mod state;
pub mod stroke;
pub mod surface;
pub mod types;
pub mod viewport;

pub use canvas::{FrameSnapshot, Scene, SharedCanvas};
pub use error::{PaintError, RenderError};
pub use gesture::{
    GestureClassifier, GestureOutcome, ScaleEvent, ScaleListener, ScalePhase, TouchAction,
    TouchEvent, TouchPoint,
};
pub use painter::Painter;
pub use raster::Renderer;
pub use render_loop::{
    DisplaySurface, DoubleBufferedSurface, FrameGuard, PresentedFrames, RenderHandle, RenderLoop,
    RenderStats,
};
pub use state::InteractionState;
pub use stroke::{Stroke, StrokePath};
pub use surface::CpuSurface;
pub use types::{BlendMode, PaintStyle};
pub use viewport::{ViewportLimits, ViewportState};
