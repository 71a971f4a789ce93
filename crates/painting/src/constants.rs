/// Edge length of one background checker tile, in canvas pixels.
pub const BACKGROUND_TILE_SIZE: f32 = 16.0;

/// Light checker tile color (ARGB).
pub const BACKGROUND_LIGHT: u32 = 0xFFE6_E6E6;

/// Dark checker tile color (ARGB).
pub const BACKGROUND_DARK: u32 = 0xFFCC_CCCC;

/// Page fill color (ARGB).
pub const PAGE_COLOR: u32 = 0xFFFF_FFFF;

/// Shadow color around the page (ARGB).
pub const SHADOW_COLOR: u32 = 0xFF66_6666;

/// Shadow blur radius, in canvas pixels.
pub const SHADOW_RADIUS: f32 = 8.0;

/// Peak shadow opacity at the page edge.
pub const SHADOW_OPACITY: f32 = 0.5;

/// Dab spacing as a fraction of the stroke diameter.
pub const DAB_SPACING: f32 = 0.25;

/// Smallest dab spacing in screen pixels.
pub const MIN_DAB_SPACING: f32 = 0.5;

/// Diameter used for zero-width (hairline) strokes, in screen pixels.
pub const HAIRLINE_WIDTH: f32 = 1.0;
