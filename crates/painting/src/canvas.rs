//! State shared by the input thread and the render loop
//!
//! The viewport, stroke path and paint style sit behind one mutex. Input
//! holds it for a single event's read-modify-write; the render loop holds it
//! only long enough to clone a [`FrameSnapshot`]. The interaction state and
//! redraw flag are atomics so the render loop can poll them without locking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::state::{AtomicInteractionState, InteractionState};
use crate::stroke::{Stroke, StrokePath};
use crate::types::PaintStyle;
use crate::viewport::{ViewportLimits, ViewportState};

/// Mutable drawing state guarded by [`SharedCanvas`]
#[derive(Debug, Clone)]
pub struct Scene {
    pub viewport: ViewportState,
    pub path: StrokePath,
    pub style: PaintStyle,
    pub page_width: u32,
    pub page_height: u32,
}

impl Scene {
    pub fn new(page_width: u32, page_height: u32, limits: ViewportLimits, style: PaintStyle) -> Self {
        Self {
            viewport: ViewportState::new(limits),
            path: StrokePath::new(),
            style,
            page_width,
            page_height,
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            viewport: self.viewport,
            page_width: self.page_width,
            page_height: self.page_height,
            strokes: self.path.snapshot(),
        }
    }
}

/// Everything one frame needs, copied out from under the lock
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub viewport: ViewportState,
    pub page_width: u32,
    pub page_height: u32,
    pub strokes: Vec<Arc<Stroke>>,
}

impl FrameSnapshot {
    #[inline]
    pub fn page_size(&self) -> (u32, u32) {
        (self.page_width, self.page_height)
    }
}

#[derive(Debug)]
pub struct SharedCanvas {
    scene: Mutex<Scene>,
    state: AtomicInteractionState,
    redraw_requested: AtomicBool,
}

impl SharedCanvas {
    pub fn new(scene: Scene) -> Arc<Self> {
        Arc::new(Self {
            scene: Mutex::new(scene),
            state: AtomicInteractionState::new(InteractionState::Idle),
            redraw_requested: AtomicBool::new(false),
        })
    }

    /// Lock the scene, ignoring poisoning. Scene mutations never leave it
    /// half-updated.
    pub fn lock(&self) -> MutexGuard<'_, Scene> {
        self.scene.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        self.lock().snapshot()
    }

    #[inline]
    pub fn state(&self) -> InteractionState {
        self.state.load()
    }

    /// Move to `next` unless already destroyed
    pub fn set_state(&self, next: InteractionState) -> InteractionState {
        let previous = self.state.load();
        let current = self.state.transition(next);
        if previous != current {
            debug!("Interaction state {:?} -> {:?}", previous, current);
        }
        current
    }

    /// Enter the terminal DESTROYED state
    pub fn destroy(&self) -> bool {
        self.state.destroy()
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.state() == InteractionState::Destroyed
    }

    /// Ask the render loop for one frame even while idle
    pub fn request_redraw(&self) {
        self.redraw_requested.store(true, Ordering::Release);
    }

    /// Consume a pending redraw request
    pub fn take_redraw_request(&self) -> bool {
        self.redraw_requested.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn canvas() -> Arc<SharedCanvas> {
        SharedCanvas::new(Scene::new(
            64,
            48,
            ViewportLimits::default(),
            PaintStyle::default(),
        ))
    }

    #[test]
    fn test_snapshot_copies_scene() {
        let canvas = canvas();
        {
            let mut scene = canvas.lock();
            let style = scene.style;
            scene.path.begin_stroke(Vec2::ZERO, style);
            scene.path.extend_stroke(Vec2::new(10.0, 0.0));
            scene.viewport.pan_by(Vec2::new(3.0, 4.0));
        }

        let frame = canvas.snapshot();
        assert_eq!(frame.page_size(), (64, 48));
        assert_eq!(frame.strokes.len(), 1);
        assert_eq!(frame.viewport.offset(), Vec2::new(3.0, 4.0));

        // Later edits do not leak into the snapshot
        canvas.lock().path.reset();
        assert_eq!(frame.strokes.len(), 1);
    }

    #[test]
    fn test_redraw_request_is_consumed() {
        let canvas = canvas();
        assert!(!canvas.take_redraw_request());
        canvas.request_redraw();
        assert!(canvas.take_redraw_request());
        assert!(!canvas.take_redraw_request());
    }

    #[test]
    fn test_state_after_destroy() {
        let canvas = canvas();
        assert_eq!(
            canvas.set_state(InteractionState::Painting),
            InteractionState::Painting
        );
        assert!(canvas.destroy());
        assert_eq!(
            canvas.set_state(InteractionState::Scaling),
            InteractionState::Destroyed
        );
        assert!(canvas.is_destroyed());
    }
}
