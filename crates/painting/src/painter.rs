//! Public canvas facade
//!
//! [`Painter`] is what the host talks to. It is driven from the host's input
//! thread: touch events, surface lifecycle callbacks and the configuration
//! surface (color, width, eraser, reset). Rendering happens on the thread
//! started by [`Painter::surface_created`].

use std::sync::Arc;

use jpainter_config::PainterConfig;
use tracing::{debug, info};

use crate::canvas::{Scene, SharedCanvas};
use crate::error::PaintError;
use crate::gesture::{GestureClassifier, PinchThresholds, ScaleListener, TouchEvent};
use crate::raster::Renderer;
use crate::render_loop::{DisplaySurface, RenderHandle, RenderLoop, RenderStats};
use crate::state::InteractionState;
use crate::surface::CpuSurface;
use crate::types::PaintStyle;
use crate::viewport::{ViewportLimits, ViewportState};

pub struct Painter {
    config: PainterConfig,
    canvas: Arc<SharedCanvas>,
    classifier: GestureClassifier,
    scale_listener: Option<Box<dyn ScaleListener + Send>>,
    render: Option<RenderHandle>,
    snapshot_renderer: Renderer,
}

impl Painter {
    pub fn new(config: PainterConfig) -> Result<Self, PaintError> {
        config.validate()?;

        let mut style = PaintStyle::default();
        style.set_color(config.paint.color);
        style.set_width(config.paint.width);

        let scene = Scene::new(
            config.display.width,
            config.display.height,
            ViewportLimits::from(&config.viewport),
            style,
        );
        let thresholds = PinchThresholds {
            touch_slop: config.touch_slop_px(),
            tap_timeout_ms: config.gesture.tap_timeout_ms,
        };

        Ok(Self {
            canvas: SharedCanvas::new(scene),
            classifier: GestureClassifier::new(thresholds),
            scale_listener: None,
            render: None,
            snapshot_renderer: Renderer::new(config.paint.corner_radius),
            config,
        })
    }

    pub fn config(&self) -> &PainterConfig {
        &self.config
    }

    /// Shared state, for hosts that want to inspect the scene directly
    pub fn canvas(&self) -> &Arc<SharedCanvas> {
        &self.canvas
    }

    // ========================================================================
    // Surface lifecycle
    // ========================================================================

    /// Display surface is ready: start the render thread
    pub fn surface_created(&mut self, surface: Box<dyn DisplaySurface>) -> Result<(), PaintError> {
        if self.canvas.is_destroyed() {
            return Err(PaintError::Destroyed);
        }
        if self.render.is_some() {
            return Err(PaintError::AlreadyRunning);
        }

        let (width, height) = surface.size();
        info!("Surface created: {}x{}", width, height);

        self.canvas.set_state(InteractionState::Idle);
        self.canvas.request_redraw();
        self.render = Some(RenderLoop::spawn(
            Arc::clone(&self.canvas),
            surface,
            &self.config,
        )?);
        Ok(())
    }

    /// Display size changed: the page follows it
    pub fn surface_changed(&mut self, width: u32, height: u32) -> Result<(), PaintError> {
        if width == 0 || height == 0 {
            return Err(PaintError::InvalidSize { width, height });
        }
        {
            let mut scene = self.canvas.lock();
            scene.page_width = width;
            scene.page_height = height;
        }
        self.canvas.request_redraw();
        info!("Surface changed: {}x{}", width, height);
        Ok(())
    }

    /// Display surface is gone: stop rendering and wait for the thread.
    /// The painter accepts no further input afterwards.
    pub fn surface_destroyed(&mut self) -> Result<(), PaintError> {
        self.canvas.destroy();
        let result = match self.render.take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        };
        info!("Surface destroyed");
        result
    }

    pub fn render_stats(&self) -> Option<&RenderStats> {
        self.render.as_ref().map(RenderHandle::stats)
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Feed one touch event. Returns the interaction state afterwards.
    pub fn on_touch_event(&mut self, event: &TouchEvent) -> InteractionState {
        let current = self.canvas.state();
        let outcome = {
            let mut scene = self.canvas.lock();
            self.classifier.handle(current, event, &mut scene)
        };

        let next = self.canvas.set_state(outcome.state);
        if next == InteractionState::Idle && current != InteractionState::Idle {
            // Show the end of the gesture; the loop idles from here on
            self.canvas.request_redraw();
        }

        if let (Some(scale_event), Some(listener)) =
            (outcome.scale_event, self.scale_listener.as_mut())
        {
            scale_event.dispatch(listener.as_mut());
        }
        next
    }

    pub fn set_scale_listener(&mut self, listener: Box<dyn ScaleListener + Send>) {
        self.scale_listener = Some(listener);
    }

    pub fn clear_scale_listener(&mut self) {
        self.scale_listener = None;
    }

    #[inline]
    pub fn state(&self) -> InteractionState {
        self.canvas.state()
    }

    pub fn viewport(&self) -> ViewportState {
        self.canvas.lock().viewport
    }

    pub fn scale(&self) -> f32 {
        self.viewport().scale()
    }

    // ========================================================================
    // Paint configuration
    // ========================================================================

    /// Color for the next stroke, as ARGB
    pub fn set_paint_color(&mut self, argb: u32) {
        self.canvas.lock().style.set_color(argb);
    }

    pub fn paint_color(&self) -> u32 {
        self.canvas.lock().style.color
    }

    /// Width for the next stroke, clamped to 0..=99. Returns the stored width.
    pub fn set_paint_width(&mut self, width: u32) -> u32 {
        self.canvas.lock().style.set_width(width)
    }

    pub fn paint_width(&self) -> u32 {
        self.canvas.lock().style.width
    }

    pub fn use_eraser(&mut self) {
        self.canvas.lock().style.use_eraser();
    }

    pub fn use_paint(&mut self) {
        self.canvas.lock().style.use_paint();
    }

    pub fn is_eraser(&self) -> bool {
        self.canvas.lock().style.is_eraser()
    }

    /// Discard every stroke
    pub fn reset_canvas(&mut self) {
        self.canvas.lock().path.reset();
        self.canvas.request_redraw();
        debug!("Canvas reset");
    }

    pub fn undo(&mut self) {
        debug!("undo: not supported");
    }

    pub fn redo(&mut self) {
        debug!("redo: not supported");
    }

    /// Render the page at page size with no pan or zoom, for export
    pub fn snapshot_bitmap(&mut self) -> Result<CpuSurface, PaintError> {
        let frame = self.canvas.snapshot();
        Ok(self.snapshot_renderer.snapshot(&frame)?)
    }
}
