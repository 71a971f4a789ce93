//! Current pan offset and zoom scale of the canvas

use glam::Vec2;
use jpainter_config::ViewportConfig;
use tracing::warn;

use crate::coords;

/// Zoom clamp range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportLimits {
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for ViewportLimits {
    fn default() -> Self {
        Self::from(&ViewportConfig::default())
    }
}

impl From<&ViewportConfig> for ViewportLimits {
    fn from(config: &ViewportConfig) -> Self {
        Self {
            min_scale: config.min_scale,
            max_scale: config.max_scale,
        }
    }
}

impl ViewportLimits {
    #[inline]
    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// Scale and pan offset. Mutated by the gesture classifier, read by every
/// render frame.
///
/// Scale stays inside `limits` and is always positive; offsets are always
/// finite. Updates that would break either are dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    scale: f32,
    offset: Vec2,
    limits: ViewportLimits,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(ViewportLimits::default())
    }
}

impl ViewportState {
    pub fn new(limits: ViewportLimits) -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            limits,
        }
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    #[inline]
    pub fn limits(&self) -> ViewportLimits {
        self.limits
    }

    #[inline]
    pub fn screen_to_canvas(&self, point: Vec2) -> Vec2 {
        coords::screen_to_canvas(point, self.offset, self.scale)
    }

    #[inline]
    pub fn canvas_to_screen(&self, point: Vec2) -> Vec2 {
        coords::canvas_to_screen(point, self.offset, self.scale)
    }

    /// Zoom so that `canvas_pivot` is drawn at `screen_pivot`.
    ///
    /// The requested scale is clamped first and the offset is solved from the
    /// clamped value, so the pivot stays put even at the zoom limits.
    /// Returns the scale actually applied.
    pub fn set_scale_about(&mut self, canvas_pivot: Vec2, screen_pivot: Vec2, scale: f32) -> f32 {
        if !scale.is_finite() || scale <= 0.0 {
            warn!("Ignoring invalid scale {}", scale);
            return self.scale;
        }
        let scale = self.limits.clamp(scale);
        let offset = screen_pivot - canvas_pivot * scale;
        if !offset.is_finite() {
            warn!("Ignoring non-finite offset {:?}", offset);
            return self.scale;
        }
        self.scale = scale;
        self.offset = offset;
        scale
    }

    /// Shift the view by a screen-space delta
    pub fn pan_by(&mut self, delta: Vec2) {
        let offset = self.offset + delta;
        if !offset.is_finite() {
            warn!("Ignoring non-finite pan delta {:?}", delta);
            return;
        }
        self.offset = offset;
    }

    /// Back to scale 1, no offset
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = Vec2::ZERO;
    }
}
