//! Brush engine for dab generation
//!
//! Strokes are rasterized by walking their polyline and stamping round dabs
//! at a fixed spacing. Dabs of one stroke are merged into a coverage mask
//! (max, not sum) so translucent colors do not bead up where dabs overlap,
//! then the mask is applied to the ink layer in one pass.

use glam::Vec2;
use tracing::trace;

use crate::constants::{DAB_SPACING, MIN_DAB_SPACING};
use crate::surface::CpuSurface;
use crate::types::BlendMode;

/// Round brush tip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushTip {
    /// Diameter in pixels
    pub diameter: f32,
    /// Spacing as fraction of diameter (e.g., 0.25 = 25% of diameter)
    pub spacing: f32,
}

impl BrushTip {
    pub fn new(diameter: f32) -> Self {
        Self {
            diameter: diameter.max(0.0),
            spacing: DAB_SPACING,
        }
    }

    /// Distance between dab centers, never below half a pixel
    #[inline]
    pub fn spacing_distance(&self) -> f32 {
        (self.diameter * self.spacing).max(MIN_DAB_SPACING)
    }
}

/// Output from brush engine for a single dab
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DabOutput {
    /// Center in surface coordinates
    pub x: f32,
    pub y: f32,
    /// Diameter in pixels
    pub size: f32,
}

/// Brush engine that generates dabs from input
///
/// The brush engine interpolates between the last position and each new
/// position, placing dabs according to the tip spacing.
pub struct BrushEngine {
    tip: BrushTip,
    /// Last position (None if stroke not started)
    last_pos: Option<Vec2>,
    /// Accumulated distance since last dab
    distance_accumulator: f32,
}

impl BrushEngine {
    pub fn new(tip: BrushTip) -> Self {
        Self {
            tip,
            last_pos: None,
            distance_accumulator: 0.0,
        }
    }

    pub fn tip(&self) -> &BrushTip {
        &self.tip
    }

    /// Start a new stroke
    pub fn begin_stroke(&mut self) {
        self.last_pos = None;
        self.distance_accumulator = 0.0;
    }

    fn dab_at(&self, p: Vec2) -> DabOutput {
        DabOutput {
            x: p.x,
            y: p.y,
            size: self.tip.diameter,
        }
    }

    /// Process input and generate dabs
    pub fn stroke_to(&mut self, point: Vec2) -> Vec<DabOutput> {
        let mut dabs = Vec::new();

        // First point in stroke - generate initial dab
        let Some(last) = self.last_pos else {
            self.last_pos = Some(point);
            self.distance_accumulator = 0.0;
            dabs.push(self.dab_at(point));
            return dabs;
        };

        let delta = point - last;
        let distance = delta.length();
        if distance < 0.001 {
            return dabs;
        }

        let spacing = self.tip.spacing_distance();
        self.distance_accumulator += distance;

        // Distance along this segment where the next dab lands
        let mut dab_start = (spacing - (self.distance_accumulator - distance)).max(0.0);
        let mut current_distance = None;

        while dab_start <= distance {
            dabs.push(self.dab_at(last + delta * (dab_start / distance)));
            current_distance = Some(dab_start);
            dab_start += spacing;
        }

        if let Some(placed) = current_distance {
            self.distance_accumulator = (distance - placed).max(0.0);
        }
        self.last_pos = Some(point);

        dabs
    }

    /// Generate dabs for a whole polyline, capping the far end with a dab
    pub fn dabs_along(&mut self, points: &[Vec2]) -> Vec<DabOutput> {
        self.begin_stroke();
        let mut dabs = Vec::new();
        for &p in points {
            dabs.extend(self.stroke_to(p));
        }
        if let (Some(&end), Some(last)) = (points.last(), dabs.last()) {
            if Vec2::new(last.x, last.y).distance(end) > 0.001 {
                dabs.push(self.dab_at(end));
            }
        }
        self.end_stroke();
        trace!("dabs_along: {} points -> {} dabs", points.len(), dabs.len());
        dabs
    }

    /// End the current stroke
    pub fn end_stroke(&mut self) {
        self.last_pos = None;
        self.distance_accumulator = 0.0;
    }
}

/// Per-stroke coverage buffer. Tracks the dirty rectangle so applying and
/// clearing only touches pixels the stroke reached.
pub struct CoverageMask {
    width: u32,
    height: u32,
    data: Vec<f32>,
    /// (x_min, y_min, x_max, y_max), exclusive max
    dirty: Option<(u32, u32, u32, u32)>,
}

impl CoverageMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width as usize) * (height as usize)],
            dirty: None,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if (self.width, self.height) == (width, height) {
            return;
        }
        *self = Self::new(width, height);
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Stamp an anti-aliased disc
    /// Returns bounding box of affected region (x, y, width, height)
    /// Returns None if the dab is completely outside the mask
    pub fn stamp(&mut self, dab: &DabOutput) -> Option<(u32, u32, u32, u32)> {
        let radius = dab.size * 0.5;
        if radius <= 0.0 {
            return None;
        }

        // Half a pixel of anti-aliasing ramp outside the radius
        let reach = radius + 0.5;
        let x_min = ((dab.x - reach).floor().max(0.0) as u32).min(self.width);
        let y_min = ((dab.y - reach).floor().max(0.0) as u32).min(self.height);
        let x_max = ((dab.x + reach).ceil().max(0.0) as u32).min(self.width);
        let y_max = ((dab.y + reach).ceil().max(0.0) as u32).min(self.height);

        if x_min >= x_max || y_min >= y_max {
            return None;
        }

        for py in y_min..y_max {
            let row = (py as usize) * (self.width as usize);
            for px in x_min..x_max {
                let dx = (px as f32 + 0.5) - dab.x;
                let dy = (py as f32 + 0.5) - dab.y;
                let coverage = (reach - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
                let cell = &mut self.data[row + px as usize];
                if coverage > *cell {
                    *cell = coverage;
                }
            }
        }

        self.dirty = Some(match self.dirty {
            None => (x_min, y_min, x_max, y_max),
            Some((a, b, c, d)) => (a.min(x_min), b.min(y_min), c.max(x_max), d.max(y_max)),
        });

        Some((x_min, y_min, x_max - x_min, y_max - y_min))
    }

    /// Apply the mask to `surface` with the given premultiplied color, then
    /// clear the mask. Sizes must match; extra pixels are ignored.
    pub fn apply_and_clear(&mut self, surface: &mut CpuSurface, color: [f32; 4], mode: BlendMode) {
        let Some((x_min, y_min, x_max, y_max)) = self.dirty.take() else {
            return;
        };
        for py in y_min..y_max {
            let row = (py as usize) * (self.width as usize);
            for px in x_min..x_max {
                let cell = &mut self.data[row + px as usize];
                let coverage = *cell;
                if coverage <= 0.0 {
                    continue;
                }
                *cell = 0.0;
                match mode {
                    BlendMode::Normal => surface.blend_pixel(px, py, color, coverage),
                    BlendMode::Erase => surface.erase_pixel(px, py, coverage),
                }
            }
        }
    }

    pub fn is_clear(&self) -> bool {
        self.dirty.is_none()
    }
}
