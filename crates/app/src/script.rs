//! Built-in touch script replayed by the host
//!
//! Events are spaced one frame apart so the render loop gets to draw
//! between them.

use painting::{TouchAction, TouchEvent};

/// Milliseconds between consecutive events
pub const EVENT_INTERVAL_MS: u64 = 16;
/// Pause between gestures
const GESTURE_GAP_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Touch(TouchEvent),
    UseEraser,
    UsePaint,
}

impl Step {
    /// Script time at which this step runs
    pub fn time(&self) -> Option<u64> {
        match self {
            Step::Touch(event) => Some(event.event_time),
            Step::UseEraser | Step::UsePaint => None,
        }
    }
}

#[derive(Default)]
struct Recorder {
    steps: Vec<Step>,
    clock: u64,
    down_time: u64,
}

impl Recorder {
    fn push(&mut self, action: TouchAction, index: usize, pointers: &[(i32, f32, f32)]) {
        self.steps.push(Step::Touch(TouchEvent::new(
            action,
            index,
            pointers,
            self.down_time,
            self.clock,
        )));
        self.clock += EVENT_INTERVAL_MS;
    }

    fn down(&mut self, x: f32, y: f32) {
        self.clock += GESTURE_GAP_MS;
        self.down_time = self.clock;
        self.push(TouchAction::Down, 0, &[(0, x, y)]);
    }

    fn pointer_down(&mut self, index: usize, pointers: &[(i32, f32, f32)]) {
        self.push(TouchAction::PointerDown, index, pointers);
    }

    fn moves(&mut self, pointers: &[(i32, f32, f32)]) {
        self.push(TouchAction::Move, 0, pointers);
    }

    fn pointer_up(&mut self, index: usize, pointers: &[(i32, f32, f32)]) {
        self.push(TouchAction::PointerUp, index, pointers);
    }

    fn up(&mut self, x: f32, y: f32) {
        self.push(TouchAction::Up, 0, &[(0, x, y)]);
    }

    /// One-finger drag through `points`
    fn stroke(&mut self, points: &[(f32, f32)]) {
        let Some((&(x0, y0), rest)) = points.split_first() else {
            return;
        };
        self.down(x0, y0);
        let mut last = (x0, y0);
        for &(x, y) in rest {
            self.moves(&[(0, x, y)]);
            last = (x, y);
        }
        self.up(last.0, last.1);
    }
}

/// A stroke, a pinch to 2x about the page center, a pan and an eraser
/// stroke across the first one, for a `width` x `height` view.
pub fn demo_script(width: f32, height: f32) -> Vec<Step> {
    let mut rec = Recorder::default();
    let (cx, cy) = (width * 0.5, height * 0.5);

    // Zigzag across the upper half
    let zigzag: Vec<(f32, f32)> = (0..=8)
        .map(|i| {
            let t = i as f32 / 8.0;
            let x = width * (0.15 + 0.7 * t);
            let y = height * if i % 2 == 0 { 0.2 } else { 0.3 };
            (x, y)
        })
        .collect();
    rec.stroke(&zigzag);

    // Pinch: second finger lands right away, then both spread apart
    let half = 10.0;
    rec.down(cx - half, cy);
    rec.pointer_down(1, &[(0, cx - half, cy), (1, cx + half, cy)]);
    for step in 1..=5 {
        let spread = half * (1.0 + step as f32 / 5.0);
        rec.moves(&[(0, cx - spread, cy), (1, cx + spread, cy)]);
    }

    // Lift the first finger and pan with the second
    let spread = half * 2.0;
    rec.pointer_up(0, &[(0, cx - spread, cy), (1, cx + spread, cy)]);
    let mut last = (cx + spread, cy);
    for step in 1..=5 {
        last = (cx + spread - 20.0 * step as f32, cy + 10.0 * step as f32);
        rec.moves(&[(1, last.0, last.1)]);
    }
    rec.push(TouchAction::Up, 0, &[(1, last.0, last.1)]);

    // Erase a vertical band through the zigzag, then go back to paint
    rec.steps.push(Step::UseEraser);
    let band: Vec<(f32, f32)> = (0..=6)
        .map(|i| (cx, height * (0.05 + 0.05 * i as f32)))
        .collect();
    rec.stroke(&band);
    rec.steps.push(Step::UsePaint);

    rec.steps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touches(steps: &[Step]) -> Vec<&TouchEvent> {
        steps
            .iter()
            .filter_map(|s| match s {
                Step::Touch(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_times_are_monotonic() {
        let steps = demo_script(1080.0, 1920.0);
        let times: Vec<u64> = steps.iter().filter_map(Step::time).collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_pinch_starts_within_tap_timeout() {
        let steps = demo_script(1080.0, 1920.0);
        let pointer_down = touches(&steps)
            .into_iter()
            .find(|e| e.action == TouchAction::PointerDown)
            .unwrap();
        assert!(pointer_down.elapsed_ms() < jpainter_config::DEFAULT_TAP_TIMEOUT_MS);
    }

    #[test]
    fn test_every_gesture_ends() {
        let steps = demo_script(400.0, 400.0);
        let events = touches(&steps);
        let downs = events.iter().filter(|e| e.action == TouchAction::Down).count();
        let ups = events.iter().filter(|e| e.action == TouchAction::Up).count();
        assert_eq!(downs, 3);
        assert_eq!(ups, 3);
        assert_eq!(steps.last(), Some(&Step::UsePaint));
    }
}
