//! Shared configuration for JPainter
//!
//! This crate provides the single source of truth for canvas dimensions,
//! gesture thresholds, zoom limits, paint defaults and frame pacing shared
//! by the painting engine and the host binary.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default canvas width in pixels
pub const DEFAULT_WIDTH: u32 = 1080;

/// Default canvas height in pixels
pub const DEFAULT_HEIGHT: u32 = 1920;

/// Default touch slop in density-independent pixels (Android `TOUCH_SLOP`)
pub const DEFAULT_TOUCH_SLOP_DP: f32 = 8.0;

/// Default tap timeout in milliseconds (Android `TAP_TIMEOUT`)
pub const DEFAULT_TAP_TIMEOUT_MS: u64 = 100;

/// Lower zoom bound
pub const DEFAULT_MIN_SCALE: f32 = 0.1;

/// Upper zoom bound
pub const DEFAULT_MAX_SCALE: f32 = 10.0;

/// Default stroke width in pixels
pub const DEFAULT_PAINT_WIDTH: u32 = 4;

/// Largest stroke width the width picker offers
pub const MAX_PAINT_WIDTH: u32 = 99;

/// Opaque black
pub const DEFAULT_PAINT_COLOR: u32 = 0xFF00_0000;

/// Corner radius of the stroke smoothing effect
pub const DEFAULT_CORNER_RADIUS: f32 = 30.0;

/// Frame budget for a 60 Hz render loop
pub const DEFAULT_FRAME_TIME_MS: u64 = 1000 / 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Canvas dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Screen density, used to scale the touch slop
    pub density: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            density: 1.0,
        }
    }
}

impl DisplayConfig {
    /// Create a new display config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// Thresholds used to tell a pinch from an unrelated second touch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Movement in dp before a touch counts as a drag
    pub touch_slop_dp: f32,
    /// Time window in which a second finger starts a pinch
    pub tap_timeout_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            touch_slop_dp: DEFAULT_TOUCH_SLOP_DP,
            tap_timeout_ms: DEFAULT_TAP_TIMEOUT_MS,
        }
    }
}

/// Zoom clamp range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
        }
    }
}

/// Initial paint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintConfig {
    /// Stroke width in pixels (0..=99)
    pub width: u32,
    /// ARGB color
    pub color: u32,
    /// Corner smoothing radius in canvas pixels
    pub corner_radius: f32,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_PAINT_WIDTH,
            color: DEFAULT_PAINT_COLOR,
            corner_radius: DEFAULT_CORNER_RADIUS,
        }
    }
}

/// Render loop pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub frame_time_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_time_ms: DEFAULT_FRAME_TIME_MS,
        }
    }
}

/// Complete painter configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterConfig {
    pub display: DisplayConfig,
    pub gesture: GestureConfig,
    pub viewport: ViewportConfig,
    pub paint: PaintConfig,
    pub render: RenderConfig,
}

impl PainterConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Touch slop in physical pixels
    pub fn touch_slop_px(&self) -> f32 {
        self.gesture.touch_slop_dp * self.display.density
    }

    /// Check value ranges the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.display.width, self.display.height
            )));
        }
        if !(self.display.density.is_finite() && self.display.density > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "density must be positive, got {}",
                self.display.density
            )));
        }
        if !(self.gesture.touch_slop_dp.is_finite() && self.gesture.touch_slop_dp >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "touch slop must be non-negative, got {}",
                self.gesture.touch_slop_dp
            )));
        }
        let ViewportConfig {
            min_scale,
            max_scale,
        } = self.viewport;
        if !(min_scale.is_finite() && max_scale.is_finite())
            || min_scale <= 0.0
            || min_scale > 1.0
            || max_scale < 1.0
        {
            return Err(ConfigError::Invalid(format!(
                "scale range must satisfy 0 < min <= 1 <= max, got [{min_scale}, {max_scale}]"
            )));
        }
        if self.paint.width > MAX_PAINT_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "paint width must be at most {MAX_PAINT_WIDTH}, got {}",
                self.paint.width
            )));
        }
        if !(self.paint.corner_radius.is_finite() && self.paint.corner_radius >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "corner radius must be non-negative, got {}",
                self.paint.corner_radius
            )));
        }
        if self.render.frame_time_ms == 0 {
            return Err(ConfigError::Invalid("frame time must be positive".to_string()));
        }
        Ok(())
    }
}
