//! Frame rasterization: tiled background, page, then the ink layer
//!
//! Strokes are painted into a separate ink layer so the eraser clears ink
//! only and the page shows through, then the layer is composited over the
//! background.

use glam::Vec2;
use tracing::trace;

use crate::brush::{BrushEngine, BrushTip, CoverageMask};
use crate::canvas::FrameSnapshot;
use crate::coords::screen_to_canvas_axis;
use crate::constants::{
    BACKGROUND_DARK, BACKGROUND_LIGHT, BACKGROUND_TILE_SIZE, HAIRLINE_WIDTH, PAGE_COLOR,
    SHADOW_COLOR, SHADOW_OPACITY, SHADOW_RADIUS,
};
use crate::error::RenderError;
use crate::stroke::{Stroke, smooth_corners};
use crate::surface::CpuSurface;
use crate::types::argb_to_premultiplied;
use crate::viewport::ViewportState;

pub struct Renderer {
    corner_radius: f32,
    ink: CpuSurface,
    mask: CoverageMask,
}

impl Renderer {
    pub fn new(corner_radius: f32) -> Self {
        Self {
            corner_radius,
            ink: CpuSurface::new(0, 0),
            mask: CoverageMask::new(0, 0),
        }
    }

    /// Draw one frame into `target` with the snapshot's pan/scale transform
    pub fn render_frame(
        &mut self,
        target: &mut CpuSurface,
        frame: &FrameSnapshot,
    ) -> Result<(), RenderError> {
        check_transform(&frame.viewport)?;
        if target.is_empty() {
            return Err(RenderError::EmptyTarget {
                width: target.width,
                height: target.height,
            });
        }

        paint_background(target, &frame.viewport, frame.page_size());

        if frame.strokes.is_empty() {
            return Ok(());
        }

        let (width, height) = target.size();
        if self.ink.size() != (width, height) {
            self.ink.resize(width, height);
        } else {
            self.ink.clear([0.0; 4]);
        }
        self.mask.resize(width, height);

        for stroke in &frame.strokes {
            self.paint_stroke(stroke, &frame.viewport);
        }
        target.composite_over(&self.ink);
        Ok(())
    }

    /// Render the page at identity transform and page size, for export
    pub fn snapshot(&mut self, frame: &FrameSnapshot) -> Result<CpuSurface, RenderError> {
        let (width, height) = frame.page_size();
        let mut target = CpuSurface::new(width, height);
        let identity = FrameSnapshot {
            viewport: ViewportState::new(frame.viewport.limits()),
            ..frame.clone()
        };
        self.render_frame(&mut target, &identity)?;
        Ok(target)
    }

    fn paint_stroke(&mut self, stroke: &Stroke, viewport: &ViewportState) {
        if !stroke.is_drawable() {
            return;
        }

        let diameter = if stroke.style.width == 0 {
            HAIRLINE_WIDTH
        } else {
            stroke.style.width as f32 * viewport.scale()
        };

        let screen_points: Vec<Vec2> = smooth_corners(stroke.points(), self.corner_radius)
            .into_iter()
            .map(|p| viewport.canvas_to_screen(p))
            .collect();

        let mut brush = BrushEngine::new(BrushTip::new(diameter));
        let dabs = brush.dabs_along(&screen_points);
        for dab in &dabs {
            self.mask.stamp(dab);
        }
        trace!(
            "paint_stroke: {} points, {} dabs, diameter={:.1}, mode={:?}",
            screen_points.len(),
            dabs.len(),
            diameter,
            stroke.style.blend_mode
        );

        self.mask.apply_and_clear(
            &mut self.ink,
            argb_to_premultiplied(stroke.style.color),
            stroke.style.blend_mode,
        );
    }
}

fn check_transform(viewport: &ViewportState) -> Result<(), RenderError> {
    let scale = viewport.scale();
    let offset = viewport.offset();
    if !(scale.is_finite() && scale > 0.0 && offset.is_finite()) {
        return Err(RenderError::InvalidTransform {
            scale,
            offset_x: offset.x,
            offset_y: offset.y,
        });
    }
    Ok(())
}

/// Fill `target` with the checkered backdrop, the page shadow and the white
/// page, all under the viewport transform. The mapping is separable, so
/// pixel centers are mapped once per column and once per row, and the page
/// span of each row is filled in one go.
fn paint_background(target: &mut CpuSurface, viewport: &ViewportState, page: (u32, u32)) {
    let page_w = page.0 as f32;
    let page_h = page.1 as f32;
    let page_color = argb_to_premultiplied(PAGE_COLOR);
    let backdrop = Backdrop {
        page_w,
        page_h,
        light: argb_to_premultiplied(BACKGROUND_LIGHT),
        dark: argb_to_premultiplied(BACKGROUND_DARK),
        shadow: argb_to_premultiplied(SHADOW_COLOR),
    };

    let (width, height) = target.size();
    let offset = viewport.offset();
    let scale = viewport.scale();
    let columns: Vec<f32> = (0..width)
        .map(|sx| screen_to_canvas_axis(sx as f32 + 0.5, offset.x, scale))
        .collect();

    // Scale is positive, so columns increase left to right
    let page_start = columns.partition_point(|&cx| cx < 0.0);
    let page_end = columns.partition_point(|&cx| cx < page_w).max(page_start);

    for sy in 0..height {
        let cy = screen_to_canvas_axis(sy as f32 + 0.5, offset.y, scale);
        let (span_start, span_end) = if cy >= 0.0 && cy < page_h {
            (page_start, page_end)
        } else {
            (0, 0)
        };

        target.fill_span(sy, span_start as u32, span_end as u32, page_color);
        for (sx, &cx) in columns.iter().enumerate() {
            if (span_start..span_end).contains(&sx) {
                continue;
            }
            backdrop.paint(target, sx as u32, sy, Vec2::new(cx, cy));
        }
    }
}

/// Everything outside the page: checker tiles darkened near the page edge
struct Backdrop {
    page_w: f32,
    page_h: f32,
    light: [f32; 4],
    dark: [f32; 4],
    shadow: [f32; 4],
}

impl Backdrop {
    #[inline]
    fn paint(&self, target: &mut CpuSurface, sx: u32, sy: u32, c: Vec2) {
        let tile = (c / BACKGROUND_TILE_SIZE).floor();
        let checker = (tile.x as i64 + tile.y as i64).rem_euclid(2) == 0;
        target.set_pixel(sx, sy, if checker { self.light } else { self.dark });

        let outside = Vec2::new(
            (-c.x).max(c.x - self.page_w).max(0.0),
            (-c.y).max(c.y - self.page_h).max(0.0),
        );
        let d = outside.length();
        if d < SHADOW_RADIUS {
            let falloff = 1.0 - d / SHADOW_RADIUS;
            target.blend_pixel(sx, sy, self.shadow, SHADOW_OPACITY * falloff * falloff);
        }
    }
}
