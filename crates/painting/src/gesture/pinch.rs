//! Two-finger pinch-zoom about a fixed canvas point

use glam::Vec2;

use crate::coords::{distance, midpoint};
use crate::viewport::ViewportState;

/// Thresholds that separate a pinch from an unrelated second touch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchThresholds {
    /// Max first-finger travel in px before the second finger lands
    pub touch_slop: f32,
    /// Max time in ms between first finger down and second finger down
    pub tap_timeout_ms: u64,
}

impl Default for PinchThresholds {
    fn default() -> Self {
        Self {
            touch_slop: jpainter_config::DEFAULT_TOUCH_SLOP_DP,
            tap_timeout_ms: jpainter_config::DEFAULT_TAP_TIMEOUT_MS,
        }
    }
}

impl PinchThresholds {
    /// A second finger starts a pinch when the first finger has held still
    /// for less than the tap timeout, or when the view is already being
    /// panned after an earlier pinch.
    pub fn should_scale(&self, displacement: f32, elapsed_ms: u64, moving: bool) -> bool {
        moving || (displacement < self.touch_slop && elapsed_ms < self.tap_timeout_ms)
    }
}

/// Live pinch gesture, created on entering SCALING
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchSession {
    pub pointer_a: i32,
    pub pointer_b: i32,
    pub start_a: Vec2,
    pub start_b: Vec2,
    /// Canvas point under the starting midpoint; held fixed for the gesture
    pub canvas_pivot: Vec2,
    pub start_scale: f32,
    pub start_distance: f32,
}

impl PinchSession {
    pub fn begin(
        (pointer_a, start_a): (i32, Vec2),
        (pointer_b, start_b): (i32, Vec2),
        viewport: &ViewportState,
    ) -> Self {
        Self {
            pointer_a,
            pointer_b,
            start_a,
            start_b,
            canvas_pivot: viewport.screen_to_canvas(midpoint(start_a, start_b)),
            start_scale: viewport.scale(),
            start_distance: distance(start_a, start_b),
        }
    }

    #[inline]
    pub fn tracks(&self, pointer_id: i32) -> bool {
        pointer_id == self.pointer_a || pointer_id == self.pointer_b
    }

    /// The tracked pointer that is not `pointer_id`
    #[inline]
    pub fn other(&self, pointer_id: i32) -> i32 {
        if pointer_id == self.pointer_a {
            self.pointer_b
        } else {
            self.pointer_a
        }
    }

    /// Rescale so the canvas pivot sits under the current finger midpoint.
    /// Returns the applied scale, or None when the fingers started on top of
    /// each other and no ratio exists.
    pub fn apply(&self, current_a: Vec2, current_b: Vec2, viewport: &mut ViewportState) -> Option<f32> {
        if self.start_distance <= f32::EPSILON {
            return None;
        }
        let ratio = distance(current_a, current_b) / self.start_distance;
        let pivot = midpoint(current_a, current_b);
        Some(viewport.set_scale_about(self.canvas_pivot, pivot, self.start_scale * ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::ViewportLimits;

    #[test]
    fn test_should_scale() {
        let thresholds = PinchThresholds {
            touch_slop: 8.0,
            tap_timeout_ms: 100,
        };
        assert!(thresholds.should_scale(0.0, 20, false));
        assert!(!thresholds.should_scale(8.0, 20, false));
        assert!(!thresholds.should_scale(0.0, 100, false));
        assert!(thresholds.should_scale(500.0, 5000, true));
    }

    #[test]
    fn test_begin_records_pivot() {
        let viewport = ViewportState::default();
        let session = PinchSession::begin(
            (0, Vec2::new(100.0, 100.0)),
            (1, Vec2::new(110.0, 100.0)),
            &viewport,
        );
        assert_eq!(session.canvas_pivot, Vec2::new(105.0, 100.0));
        assert_eq!(session.start_distance, 10.0);
        assert_eq!(session.start_scale, 1.0);
        assert!(session.tracks(1));
        assert_eq!(session.other(0), 1);
        assert_eq!(session.other(1), 0);
    }

    #[test]
    fn test_pivot_is_invariant() {
        let cases = [
            (Vec2::new(100.0, 100.0), Vec2::new(110.0, 100.0), 3.0),
            (Vec2::new(40.0, 300.0), Vec2::new(200.0, 120.0), 0.4),
            (Vec2::new(500.0, 10.0), Vec2::new(510.0, 30.0), 7.5),
        ];
        for (a, b, factor) in cases {
            let mut viewport = ViewportState::new(ViewportLimits {
                min_scale: 0.1,
                max_scale: 10.0,
            });
            viewport.pan_by(Vec2::new(-37.0, 12.5));
            let session = PinchSession::begin((0, a), (1, b), &viewport);
            let pivot_screen = midpoint(a, b);
            assert!(viewport.canvas_to_screen(session.canvas_pivot).distance(pivot_screen) < 1e-3);

            // Spread symmetrically about the same midpoint
            let half = (b - a) * 0.5 * factor;
            let scale = session
                .apply(pivot_screen - half, pivot_screen + half, &mut viewport)
                .unwrap();

            assert!((scale - factor).abs() < 1e-3);
            assert!(viewport.canvas_to_screen(session.canvas_pivot).distance(pivot_screen) < 1e-2);
        }
    }

    #[test]
    fn test_zero_start_distance() {
        let mut viewport = ViewportState::default();
        let p = Vec2::new(10.0, 10.0);
        let session = PinchSession::begin((0, p), (1, p), &viewport);
        assert_eq!(session.apply(p, Vec2::new(20.0, 10.0), &mut viewport), None);
        assert_eq!(viewport.scale(), 1.0);
    }
}
