//! Render thread
//!
//! Redraws the canvas at a fixed frame budget while the user is interacting.
//! Each frame copies a [`FrameSnapshot`](crate::canvas::FrameSnapshot) under
//! the scene lock, rasterizes it into the locked display buffer and posts it.
//! Per-frame faults, panics included, are logged and counted; the loop only
//! exits once the canvas is destroyed.

mod display;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use jpainter_config::PainterConfig;
use tracing::{debug, error, info, warn};

use crate::canvas::SharedCanvas;
use crate::error::PaintError;
use crate::raster::Renderer;
use crate::state::InteractionState;

pub use display::{DisplaySurface, DoubleBufferedSurface, FrameGuard, PresentedFrames};

const THREAD_NAME: &str = "jpainter-render";

/// What one loop iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Nothing to draw
    Skipped,
    Drawn,
    Failed,
}

/// Frame counters, readable while the loop runs
#[derive(Debug, Default)]
pub struct RenderStats {
    frames_drawn: AtomicU64,
    frames_failed: AtomicU64,
    frames_skipped: AtomicU64,
}

impl RenderStats {
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn.load(Ordering::Relaxed)
    }

    pub fn frames_failed(&self) -> u64 {
        self.frames_failed.load(Ordering::Relaxed)
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped.load(Ordering::Relaxed)
    }

    fn record(&self, outcome: FrameOutcome) {
        let counter = match outcome {
            FrameOutcome::Skipped => &self.frames_skipped,
            FrameOutcome::Drawn => &self.frames_drawn,
            FrameOutcome::Failed => &self.frames_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct RenderLoop {
    canvas: Arc<SharedCanvas>,
    surface: Box<dyn DisplaySurface>,
    renderer: Renderer,
    frame_time: Duration,
    stats: Arc<RenderStats>,
}

impl RenderLoop {
    pub fn new(
        canvas: Arc<SharedCanvas>,
        surface: Box<dyn DisplaySurface>,
        config: &PainterConfig,
    ) -> Self {
        Self {
            canvas,
            surface,
            renderer: Renderer::new(config.paint.corner_radius),
            frame_time: Duration::from_millis(config.render.frame_time_ms),
            stats: Arc::new(RenderStats::default()),
        }
    }

    /// Start the loop on its own thread
    pub fn spawn(
        canvas: Arc<SharedCanvas>,
        surface: Box<dyn DisplaySurface>,
        config: &PainterConfig,
    ) -> Result<RenderHandle, PaintError> {
        if canvas.is_destroyed() {
            return Err(PaintError::Destroyed);
        }
        let render_loop = Self::new(Arc::clone(&canvas), surface, config);
        let stats = Arc::clone(&render_loop.stats);

        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || render_loop.run())
            .map_err(PaintError::Spawn)?;

        Ok(RenderHandle {
            canvas,
            thread: Some(thread),
            stats,
        })
    }

    pub fn stats(&self) -> Arc<RenderStats> {
        Arc::clone(&self.stats)
    }

    /// Run until the canvas is destroyed
    pub fn run(mut self) {
        info!("Render loop started, frame budget {:?}", self.frame_time);
        while !self.canvas.is_destroyed() {
            let start = Instant::now();
            self.tick();

            // Over budget: start the next frame immediately, no catch-up
            if let Some(remaining) = self.frame_time.checked_sub(start.elapsed()) {
                thread::sleep(remaining);
            }
        }
        info!(
            "Render loop stopped: {} drawn, {} failed",
            self.stats.frames_drawn(),
            self.stats.frames_failed()
        );
    }

    /// One iteration: draw a frame if there is anything to show
    pub fn tick(&mut self) -> FrameOutcome {
        let state = self.canvas.state();
        let redraw = self.canvas.take_redraw_request();

        let outcome = match state {
            InteractionState::Destroyed => FrameOutcome::Skipped,
            InteractionState::Idle if !redraw => FrameOutcome::Skipped,
            _ => match panic::catch_unwind(AssertUnwindSafe(|| self.draw_frame())) {
                Ok(Ok(())) => FrameOutcome::Drawn,
                Ok(Err(e)) => {
                    error!("Frame failed: {}", e);
                    FrameOutcome::Failed
                }
                Err(payload) => {
                    error!("Frame panicked: {}", panic_message(&*payload));
                    FrameOutcome::Failed
                }
            },
        };
        if outcome == FrameOutcome::Failed && redraw {
            // Try the requested frame again next time round
            self.canvas.request_redraw();
        }
        self.stats.record(outcome);
        outcome
    }

    fn draw_frame(&mut self) -> Result<(), PaintError> {
        let frame = self.canvas.snapshot();
        debug!(
            "scale = {}, offX = {}, offY = {}",
            frame.viewport.scale(),
            frame.viewport.offset().x,
            frame.viewport.offset().y
        );

        let (width, height) = frame.page_size();
        if self.surface.size() != (width, height) {
            self.surface.resize(width, height)?;
        }

        let mut guard = FrameGuard::lock(self.surface.as_mut())?;
        self.renderer.render_frame(guard.buffer(), &frame)?;
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

/// Owner's handle on a running render thread. Dropping it stops and joins
/// the thread.
pub struct RenderHandle {
    canvas: Arc<SharedCanvas>,
    thread: Option<JoinHandle<()>>,
    stats: Arc<RenderStats>,
}

impl RenderHandle {
    /// Ask the loop to exit by destroying the canvas
    pub fn stop(&self) {
        if self.canvas.destroy() {
            debug!("Render loop stop requested");
        }
    }

    /// Wait for the thread to exit. Blocks until [`stop`](Self::stop) has
    /// been called.
    pub fn join(mut self) -> Result<(), PaintError> {
        self.wait()
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    fn wait(&mut self) -> Result<(), PaintError> {
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| PaintError::RenderThreadPanicked),
            None => Ok(()),
        }
    }
}

impl Drop for RenderHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.stop();
            if let Err(e) = self.wait() {
                warn!("Render thread exited abnormally: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::canvas::Scene;
    use crate::surface::CpuSurface;
    use crate::types::PaintStyle;
    use crate::viewport::ViewportLimits;

    fn setup() -> (Arc<SharedCanvas>, RenderLoop, PresentedFrames) {
        let canvas = SharedCanvas::new(Scene::new(
            16,
            16,
            ViewportLimits::default(),
            PaintStyle::default(),
        ));
        let surface = DoubleBufferedSurface::new(16, 16).unwrap();
        let presented = surface.presented();
        let render_loop = RenderLoop::new(
            Arc::clone(&canvas),
            Box::new(surface),
            &PainterConfig::default(),
        );
        (canvas, render_loop, presented)
    }

    #[test]
    fn test_idle_skips_frames() {
        let (_canvas, mut render_loop, presented) = setup();
        assert_eq!(render_loop.tick(), FrameOutcome::Skipped);
        assert_eq!(presented.frames_posted(), 0);
    }

    #[test]
    fn test_redraw_request_draws_once() {
        let (canvas, mut render_loop, presented) = setup();
        canvas.request_redraw();
        assert_eq!(render_loop.tick(), FrameOutcome::Drawn);
        assert_eq!(render_loop.tick(), FrameOutcome::Skipped);
        assert_eq!(presented.frames_posted(), 1);
        assert_eq!(presented.latest().get_pixel(8, 8), Some([1.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_active_state_draws_every_tick() {
        let (canvas, mut render_loop, presented) = setup();
        canvas.set_state(InteractionState::Painting);
        for _ in 0..3 {
            assert_eq!(render_loop.tick(), FrameOutcome::Drawn);
        }
        assert_eq!(presented.frames_posted(), 3);
        assert_eq!(render_loop.stats().frames_drawn(), 3);
    }

    #[test]
    fn test_surface_follows_page_size() {
        let (canvas, mut render_loop, presented) = setup();
        {
            let mut scene = canvas.lock();
            scene.page_width = 24;
            scene.page_height = 10;
        }
        canvas.request_redraw();
        render_loop.tick();
        assert_eq!(presented.latest().size(), (24, 10));
    }

    #[test]
    fn test_invalid_frame_is_counted() {
        let (canvas, mut render_loop, _presented) = setup();
        canvas.lock().page_width = 0;
        canvas.set_state(InteractionState::Moving);
        assert_eq!(render_loop.tick(), FrameOutcome::Failed);
        assert_eq!(render_loop.stats().frames_failed(), 1);

        // Recovers once the scene is valid again
        canvas.lock().page_width = 16;
        canvas.lock().viewport.pan_by(Vec2::new(2.0, 2.0));
        assert_eq!(render_loop.tick(), FrameOutcome::Drawn);
    }

    struct PanickingSurface {
        inner: DoubleBufferedSurface,
        panics_left: u32,
    }

    impl DisplaySurface for PanickingSurface {
        fn lock_buffer(&mut self) -> Result<&mut CpuSurface, PaintError> {
            if self.panics_left > 0 {
                self.panics_left -= 1;
                panic!("display buffer lost");
            }
            self.inner.lock_buffer()
        }

        fn buffer_mut(&mut self) -> &mut CpuSurface {
            self.inner.buffer_mut()
        }

        fn unlock_and_post(&mut self) {
            self.inner.unlock_and_post();
        }

        fn size(&self) -> (u32, u32) {
            self.inner.size()
        }

        fn resize(&mut self, width: u32, height: u32) -> Result<(), PaintError> {
            self.inner.resize(width, height)
        }
    }

    #[test]
    fn test_panicking_frame_is_retried() {
        let canvas = SharedCanvas::new(Scene::new(
            16,
            16,
            ViewportLimits::default(),
            PaintStyle::default(),
        ));
        let inner = DoubleBufferedSurface::new(16, 16).unwrap();
        let presented = inner.presented();
        let surface = PanickingSurface {
            inner,
            panics_left: 1,
        };
        let mut render_loop =
            RenderLoop::new(Arc::clone(&canvas), Box::new(surface), &PainterConfig::default());

        canvas.request_redraw();
        assert_eq!(render_loop.tick(), FrameOutcome::Failed);
        assert_eq!(render_loop.stats().frames_failed(), 1);
        assert_eq!(presented.frames_posted(), 0);

        // The redraw request survives the panic
        assert_eq!(render_loop.tick(), FrameOutcome::Drawn);
        assert_eq!(presented.frames_posted(), 1);
    }

    #[test]
    fn test_panic_message() {
        let text: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(&*text), "static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*owned), "owned");
        let other: Box<dyn Any + Send> = Box::new(7_u32);
        assert_eq!(panic_message(&*other), "unknown panic");
    }

    #[test]
    fn test_handle_finishes_after_stop() {
        let canvas = SharedCanvas::new(Scene::new(
            16,
            16,
            ViewportLimits::default(),
            PaintStyle::default(),
        ));
        let surface = DoubleBufferedSurface::new(16, 16).unwrap();
        let handle =
            RenderLoop::spawn(Arc::clone(&canvas), Box::new(surface), &PainterConfig::default())
                .unwrap();
        assert!(!handle.is_finished());

        handle.stop();
        let deadline = Instant::now() + Duration::from_secs(2);
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(handle.is_finished());
        assert!(canvas.is_destroyed());
        handle.join().unwrap();
    }

    #[test]
    fn test_destroyed_draws_nothing() {
        let (canvas, mut render_loop, presented) = setup();
        canvas.request_redraw();
        canvas.destroy();
        assert_eq!(render_loop.tick(), FrameOutcome::Skipped);
        assert_eq!(presented.frames_posted(), 0);
    }
}
