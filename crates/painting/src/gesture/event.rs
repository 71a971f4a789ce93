//! Touch input as delivered by the host toolkit

use glam::Vec2;

/// One pointer in a touch event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// X coordinate in view space
    pub x: f32,
    /// Y coordinate in view space
    pub y: f32,
    /// Stable id for the lifetime of the touch
    pub pointer_id: i32,
    /// Event time in milliseconds
    pub timestamp: u64,
}

impl TouchPoint {
    pub fn new(pointer_id: i32, x: f32, y: f32, timestamp: u64) -> Self {
        Self {
            x,
            y,
            pointer_id,
            timestamp,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    /// First finger down
    Down,
    /// Another finger down while at least one is already touching
    PointerDown,
    /// One or more pointers moved
    Move,
    /// A finger lifted while others remain
    PointerUp,
    /// Last finger lifted
    Up,
    /// The system took the gesture away
    Cancel,
}

/// A multi-touch event, modelled on the platform motion event.
///
/// `pointers` holds every pointer currently down, including the one that
/// triggered a `PointerUp`/`Up`.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub action: TouchAction,
    /// Index into `pointers` of the pointer that went down or up
    pub action_index: usize,
    pub pointers: Vec<TouchPoint>,
    /// Time the first finger of this gesture went down, in milliseconds
    pub down_time: u64,
    /// Time of this event, in milliseconds
    pub event_time: u64,
}

impl TouchEvent {
    /// Build an event. Each pointer is stamped with `event_time`.
    pub fn new(
        action: TouchAction,
        action_index: usize,
        pointers: &[(i32, f32, f32)],
        down_time: u64,
        event_time: u64,
    ) -> Self {
        Self {
            action,
            action_index,
            pointers: pointers
                .iter()
                .map(|&(id, x, y)| TouchPoint::new(id, x, y, event_time))
                .collect(),
            down_time,
            event_time,
        }
    }

    #[inline]
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// The pointer that went down or up
    #[inline]
    pub fn action_pointer(&self) -> Option<&TouchPoint> {
        self.pointers.get(self.action_index)
    }

    pub fn find(&self, pointer_id: i32) -> Option<&TouchPoint> {
        self.pointers.iter().find(|p| p.pointer_id == pointer_id)
    }

    pub fn position_of(&self, pointer_id: i32) -> Option<Vec2> {
        self.find(pointer_id).map(TouchPoint::position)
    }

    /// Time since the first finger went down
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.event_time.saturating_sub(self.down_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        let event = TouchEvent::new(
            TouchAction::PointerDown,
            1,
            &[(7, 10.0, 20.0), (9, 30.0, 40.0)],
            100,
            150,
        );
        assert_eq!(event.pointer_count(), 2);
        assert_eq!(event.action_pointer().map(|p| p.pointer_id), Some(9));
        assert_eq!(event.position_of(7), Some(Vec2::new(10.0, 20.0)));
        assert_eq!(event.position_of(3), None);
        assert_eq!(event.elapsed_ms(), 50);
        assert_eq!(event.pointers[0].timestamp, 150);
    }

    #[test]
    fn test_elapsed_never_underflows() {
        let event = TouchEvent::new(TouchAction::Move, 0, &[(0, 0.0, 0.0)], 200, 100);
        assert_eq!(event.elapsed_ms(), 0);
    }
}
