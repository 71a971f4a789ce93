//! Interaction state shared between the input and render threads

use std::sync::atomic::{AtomicU8, Ordering};

/// What the user is currently doing with the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum InteractionState {
    /// No touch interaction and nothing to redraw
    #[default]
    Idle = 0,
    /// One finger is drawing
    Painting = 1,
    /// Two fingers are pinching
    Scaling = 2,
    /// One finger is panning after a pinch
    Moving = 3,
    /// The surface has been torn down. Terminal.
    Destroyed = 4,
}

impl InteractionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Painting,
            2 => Self::Scaling,
            3 => Self::Moving,
            4 => Self::Destroyed,
            _ => Self::Idle,
        }
    }

    /// Whether the render loop has anything to draw in this state
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Painting | Self::Scaling | Self::Moving)
    }
}

/// Lock-free cell holding the current [`InteractionState`]
#[derive(Debug, Default)]
pub struct AtomicInteractionState(AtomicU8);

impl AtomicInteractionState {
    pub fn new(state: InteractionState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    #[inline]
    pub fn load(&self) -> InteractionState {
        InteractionState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Store a new state unless the cell is already DESTROYED.
    /// Returns the state in effect afterwards.
    pub fn transition(&self, next: InteractionState) -> InteractionState {
        let result = self.0.fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
            (current != InteractionState::Destroyed as u8).then_some(next as u8)
        });
        match result {
            Ok(_) => next,
            Err(_) => InteractionState::Destroyed,
        }
    }

    /// Mark as DESTROYED. Returns false if it already was.
    pub fn destroy(&self) -> bool {
        self.0.swap(InteractionState::Destroyed as u8, Ordering::AcqRel)
            != InteractionState::Destroyed as u8
    }
}
