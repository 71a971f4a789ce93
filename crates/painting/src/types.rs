use serde::{Deserialize, Serialize};

use jpainter_config::{DEFAULT_PAINT_COLOR, DEFAULT_PAINT_WIDTH, MAX_PAINT_WIDTH};

/// Blend modes for painting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum BlendMode {
    #[default]
    Normal = 0,
    /// Clears ink instead of compositing color
    Erase = 1,
}

/// Paint settings captured by a stroke when it begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintStyle {
    /// ARGB color
    pub color: u32,
    /// Stroke width in canvas pixels (0 draws a hairline)
    pub width: u32,
    pub blend_mode: BlendMode,
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_PAINT_COLOR,
            width: DEFAULT_PAINT_WIDTH,
            blend_mode: BlendMode::Normal,
        }
    }
}

impl PaintStyle {
    pub fn set_color(&mut self, argb: u32) {
        self.color = argb;
    }

    /// Set the width, clamped to the 0..=99 range the host offers.
    /// Returns the width actually stored.
    pub fn set_width(&mut self, width: u32) -> u32 {
        self.width = width.min(MAX_PAINT_WIDTH);
        self.width
    }

    pub fn use_eraser(&mut self) {
        self.blend_mode = BlendMode::Erase;
    }

    pub fn use_paint(&mut self) {
        self.blend_mode = BlendMode::Normal;
    }

    pub fn is_eraser(&self) -> bool {
        self.blend_mode == BlendMode::Erase
    }
}

/// Unpack an ARGB color into straight-alpha `[r, g, b, a]` floats
#[inline]
pub fn argb_to_rgba(argb: u32) -> [f32; 4] {
    [
        ((argb >> 16) & 0xFF) as f32 / 255.0,
        ((argb >> 8) & 0xFF) as f32 / 255.0,
        (argb & 0xFF) as f32 / 255.0,
        ((argb >> 24) & 0xFF) as f32 / 255.0,
    ]
}

/// Unpack an ARGB color into premultiplied `[r, g, b, a]` floats
#[inline]
pub fn argb_to_premultiplied(argb: u32) -> [f32; 4] {
    let [r, g, b, a] = argb_to_rgba(argb);
    [r * a, g * a, b * a, a]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_unpack() {
        let rgba = argb_to_rgba(0x80FF_0000);
        assert!((rgba[0] - 1.0).abs() < 1e-6);
        assert_eq!(rgba[1], 0.0);
        assert_eq!(rgba[2], 0.0);
        assert!((rgba[3] - 128.0 / 255.0).abs() < 1e-6);

        let premul = argb_to_premultiplied(0x80FF_0000);
        assert!((premul[0] - rgba[3]).abs() < 1e-6);
    }

    #[test]
    fn test_width_is_clamped() {
        let mut style = PaintStyle::default();
        assert_eq!(style.set_width(150), 99);
        assert_eq!(style.set_width(0), 0);
    }

    #[test]
    fn test_eraser_toggle() {
        let mut style = PaintStyle::default();
        assert!(!style.is_eraser());
        style.use_eraser();
        assert_eq!(style.blend_mode, BlendMode::Erase);
        style.use_paint();
        assert_eq!(style.blend_mode, BlendMode::Normal);
    }
}
