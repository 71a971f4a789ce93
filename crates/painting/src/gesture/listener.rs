//! Scale change notifications for the host UI

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalePhase {
    Started,
    Changed,
    Ended,
}

/// A scale notification. `scale` is rounded to one decimal for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleEvent {
    pub phase: ScalePhase,
    pub scale: f32,
}

impl ScaleEvent {
    pub fn new(phase: ScalePhase, raw_scale: f32) -> Self {
        Self {
            phase,
            scale: round_scale(raw_scale),
        }
    }

    /// Forward to the matching listener callback
    pub fn dispatch(&self, listener: &mut dyn ScaleListener) {
        match self.phase {
            ScalePhase::Started => listener.on_scale_change_start(self.scale),
            ScalePhase::Changed => listener.on_scale_change(self.scale),
            ScalePhase::Ended => listener.on_scale_change_end(self.scale),
        }
    }
}

/// Receives scale updates at pinch start, on every update, and at pinch end
pub trait ScaleListener {
    fn on_scale_change_start(&mut self, start_scale: f32);
    fn on_scale_change(&mut self, current_scale: f32);
    fn on_scale_change_end(&mut self, end_scale: f32);
}

/// Round to one decimal place
#[inline]
pub fn round_scale(scale: f32) -> f32 {
    (scale * 10.0).round() / 10.0
}
