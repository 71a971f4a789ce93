//! Screen <-> canvas coordinate mapping
//!
//! Screen space is the view's pixel grid. Canvas space is the unscaled
//! drawing page. A screen point `s` shows canvas point `c` when
//! `s = c * scale + offset`.

use glam::Vec2;

/// Map a single screen axis coordinate into canvas space
#[inline]
pub fn screen_to_canvas_axis(coordinate: f32, offset: f32, scale: f32) -> f32 {
    (coordinate - offset) / scale
}

/// Map a single canvas axis coordinate onto the screen
#[inline]
pub fn canvas_to_screen_axis(coordinate: f32, offset: f32, scale: f32) -> f32 {
    coordinate * scale + offset
}

#[inline]
pub fn screen_to_canvas(point: Vec2, offset: Vec2, scale: f32) -> Vec2 {
    (point - offset) / scale
}

#[inline]
pub fn canvas_to_screen(point: Vec2, offset: Vec2, scale: f32) -> Vec2 {
    point * scale + offset
}

#[inline]
pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) * 0.5
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}
