//! Freehand stroke model
//!
//! Strokes are polylines in canvas space. Finished strokes are shared
//! behind `Arc` so the render thread can snapshot the path cheaply.

use std::sync::Arc;

use glam::Vec2;
use tracing::debug;

use crate::types::PaintStyle;

/// Points closer than this are treated as duplicates
const MIN_SEGMENT_LENGTH: f32 = 1e-3;

/// Upper bound on line segments used to flatten one rounded corner
const MAX_CORNER_SEGMENTS: usize = 16;

/// A single freehand stroke
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Paint settings captured when the stroke began
    pub style: PaintStyle,
    points: Vec<Vec2>,
}

impl Stroke {
    pub fn new(start: Vec2, style: PaintStyle) -> Self {
        Self {
            style,
            points: vec![start],
        }
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Append a line segment ending at `point`
    pub fn line_to(&mut self, point: Vec2) {
        if let Some(last) = self.points.last() {
            if last.distance(point) < MIN_SEGMENT_LENGTH {
                return;
            }
        }
        self.points.push(point);
    }

    /// A stroke needs at least one segment to produce ink
    #[inline]
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }
}

/// All strokes of the session plus the one being drawn
#[derive(Debug, Clone, Default)]
pub struct StrokePath {
    finished: Vec<Arc<Stroke>>,
    active: Option<Stroke>,
}

impl StrokePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new stroke at `point`. An unfinished stroke is closed first.
    pub fn begin_stroke(&mut self, point: Vec2, style: PaintStyle) {
        self.end_stroke();
        self.active = Some(Stroke::new(point, style));
    }

    /// Extend the active stroke. Returns false when no stroke is active.
    pub fn extend_stroke(&mut self, point: Vec2) -> bool {
        match self.active.as_mut() {
            Some(stroke) => {
                stroke.line_to(point);
                true
            }
            None => false,
        }
    }

    /// Close the active stroke. Single-point strokes leave no ink and are dropped.
    pub fn end_stroke(&mut self) {
        if let Some(stroke) = self.active.take() {
            if stroke.is_drawable() {
                self.finished.push(Arc::new(stroke));
            } else {
                debug!("Dropping stroke without segments");
            }
        }
    }

    /// Drop the active stroke without keeping it
    pub fn cancel_stroke(&mut self) {
        self.active = None;
    }

    /// Discard all path data
    pub fn reset(&mut self) {
        self.finished.clear();
        self.active = None;
    }

    #[inline]
    pub fn is_stroking(&self) -> bool {
        self.active.is_some()
    }

    #[inline]
    pub fn active(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    #[inline]
    pub fn finished(&self) -> &[Arc<Stroke>] {
        &self.finished
    }

    pub fn stroke_count(&self) -> usize {
        self.finished.len() + usize::from(self.active.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.stroke_count() == 0
    }

    /// Snapshot every stroke in paint order
    pub fn snapshot(&self) -> Vec<Arc<Stroke>> {
        let mut strokes = self.finished.clone();
        if let Some(active) = &self.active {
            strokes.push(Arc::new(active.clone()));
        }
        strokes
    }
}

/// Round off polyline corners the way a corner path effect does.
///
/// Every interior vertex is replaced by a quadratic curve that starts and
/// ends `min(radius, half the adjacent segment)` away from the vertex, with
/// the vertex as control point. The curve is flattened into line segments.
pub fn smooth_corners(points: &[Vec2], radius: f32) -> Vec<Vec2> {
    if points.len() < 3 || radius <= 0.0 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(points.len() * 4);
    out.push(points[0]);

    for window in points.windows(3) {
        let (prev, vertex, next) = (window[0], window[1], window[2]);
        let to_prev = prev - vertex;
        let to_next = next - vertex;
        let len_prev = to_prev.length();
        let len_next = to_next.length();
        if len_prev < MIN_SEGMENT_LENGTH || len_next < MIN_SEGMENT_LENGTH {
            out.push(vertex);
            continue;
        }

        let start = vertex + to_prev * (radius.min(len_prev * 0.5) / len_prev);
        let end = vertex + to_next * (radius.min(len_next * 0.5) / len_next);
        out.push(start);

        let chord = start.distance(vertex) + vertex.distance(end);
        let steps = ((chord / 2.0).ceil() as usize).clamp(2, MAX_CORNER_SEGMENTS);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let u = 1.0 - t;
            out.push(start * (u * u) + vertex * (2.0 * u * t) + end * (t * t));
        }
    }

    if let Some(&last) = points.last() {
        out.push(last);
    }
    out
}
