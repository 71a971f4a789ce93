use jpainter_config::ConfigError;
use thiserror::Error;

/// Faults raised while drawing a single frame. The render loop logs these
/// and moves on to the next frame.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid viewport transform: scale={scale}, offset=({offset_x}, {offset_y})")]
    InvalidTransform {
        scale: f32,
        offset_x: f32,
        offset_y: f32,
    },
    #[error("Render target is empty ({width}x{height})")]
    EmptyTarget { width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum PaintError {
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Display buffer is already locked")]
    BufferBusy,
    #[error("Display buffer unavailable: {0}")]
    BufferUnavailable(String),
    #[error("Canvas has been destroyed")]
    Destroyed,
    #[error("Render loop is already running")]
    AlreadyRunning,
    #[error("Failed to spawn render thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("Render thread panicked")]
    RenderThreadPanicked,
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
