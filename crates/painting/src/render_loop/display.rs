//! Display buffers the render loop draws into

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::error::PaintError;
use crate::surface::CpuSurface;

/// A lockable pixel buffer that is presented on unlock, like a platform
/// surface holder.
pub trait DisplaySurface: Send {
    /// Acquire the back buffer for drawing
    fn lock_buffer(&mut self) -> Result<&mut CpuSurface, PaintError>;

    /// The locked back buffer. Only meaningful between `lock_buffer` and
    /// `unlock_and_post`.
    fn buffer_mut(&mut self) -> &mut CpuSurface;

    /// Release the back buffer and present it
    fn unlock_and_post(&mut self);

    fn size(&self) -> (u32, u32);

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PaintError>;
}

/// Holds a display buffer locked for one frame and posts it when dropped,
/// whether or not drawing succeeded.
pub struct FrameGuard<'a> {
    surface: &'a mut dyn DisplaySurface,
}

impl<'a> FrameGuard<'a> {
    pub fn lock(surface: &'a mut dyn DisplaySurface) -> Result<Self, PaintError> {
        surface.lock_buffer()?;
        Ok(Self { surface })
    }

    pub fn buffer(&mut self) -> &mut CpuSurface {
        self.surface.buffer_mut()
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.surface.unlock_and_post();
    }
}

/// In-memory surface with a back buffer for drawing and a shared front
/// buffer holding the last posted frame.
pub struct DoubleBufferedSurface {
    back: CpuSurface,
    front: Arc<Mutex<CpuSurface>>,
    frames_posted: Arc<AtomicU64>,
    locked: bool,
}

impl DoubleBufferedSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, PaintError> {
        if width == 0 || height == 0 {
            return Err(PaintError::InvalidSize { width, height });
        }
        Ok(Self {
            back: CpuSurface::new(width, height),
            front: Arc::new(Mutex::new(CpuSurface::new(width, height))),
            frames_posted: Arc::new(AtomicU64::new(0)),
            locked: false,
        })
    }

    /// Read handle on the presented frames, usable from other threads
    pub fn presented(&self) -> PresentedFrames {
        PresentedFrames {
            front: Arc::clone(&self.front),
            frames_posted: Arc::clone(&self.frames_posted),
        }
    }
}

impl DisplaySurface for DoubleBufferedSurface {
    fn lock_buffer(&mut self) -> Result<&mut CpuSurface, PaintError> {
        if self.locked {
            return Err(PaintError::BufferBusy);
        }
        self.locked = true;
        Ok(&mut self.back)
    }

    fn buffer_mut(&mut self) -> &mut CpuSurface {
        &mut self.back
    }

    fn unlock_and_post(&mut self) {
        if !self.locked {
            warn!("unlock_and_post without a locked buffer");
            return;
        }
        self.locked = false;

        let mut front = self.front.lock().unwrap_or_else(|p| p.into_inner());
        std::mem::swap(&mut *front, &mut self.back);
        // Keep the back buffer sized like the frame just posted
        if self.back.size() != front.size() {
            self.back.resize(front.width, front.height);
        }
        self.frames_posted.fetch_add(1, Ordering::Release);
    }

    fn size(&self) -> (u32, u32) {
        self.back.size()
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PaintError> {
        if width == 0 || height == 0 {
            return Err(PaintError::InvalidSize { width, height });
        }
        if self.locked {
            return Err(PaintError::BufferBusy);
        }
        debug!("Display surface resized to {}x{}", width, height);
        self.back.resize(width, height);
        self.front
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .resize(width, height);
        Ok(())
    }
}

/// Shared view of what a [`DoubleBufferedSurface`] last presented
#[derive(Clone)]
pub struct PresentedFrames {
    front: Arc<Mutex<CpuSurface>>,
    frames_posted: Arc<AtomicU64>,
}

impl PresentedFrames {
    /// Copy of the latest posted frame
    pub fn latest(&self) -> CpuSurface {
        self.front.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn frames_posted(&self) -> u64 {
        self.frames_posted.load(Ordering::Acquire)
    }
}
