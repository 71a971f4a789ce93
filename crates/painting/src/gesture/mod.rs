//! Touch gesture classifier
//!
//! Turns the raw touch stream into one of the interaction states and applies
//! its effect to the scene:
//! - one finger draws
//! - a second finger that lands quickly and while the first holds still
//!   starts a pinch-zoom
//! - lifting one pinch finger pans with the other
//! - lifting the last finger returns to idle
//!
//! Events that make no sense in the current state are logged and dropped;
//! the classifier has no error path.

mod event;
mod listener;
mod pinch;

use glam::Vec2;
use tracing::{debug, warn};

use crate::canvas::Scene;
use crate::state::InteractionState;

pub use event::{TouchAction, TouchEvent, TouchPoint};
pub use listener::{ScaleEvent, ScaleListener, ScalePhase, round_scale};
pub use pinch::{PinchSession, PinchThresholds};

/// The finger that started the gesture
#[derive(Debug, Clone, Copy, PartialEq)]
struct PrimaryPointer {
    id: i32,
    down: Vec2,
}

/// The finger driving a pan, and where it was last seen
#[derive(Debug, Clone, Copy, PartialEq)]
struct PanAnchor {
    id: i32,
    last: Vec2,
}

/// Result of feeding one event to the classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureOutcome {
    pub state: InteractionState,
    pub scale_event: Option<ScaleEvent>,
}

impl GestureOutcome {
    fn stay(state: InteractionState) -> Self {
        Self {
            state,
            scale_event: None,
        }
    }

    fn with_scale(state: InteractionState, phase: ScalePhase, scale: f32) -> Self {
        Self {
            state,
            scale_event: Some(ScaleEvent::new(phase, scale)),
        }
    }
}

/// Pointer tracking owned by the input thread. The interaction state itself
/// lives in the shared canvas and is passed in per event.
#[derive(Debug, Default)]
pub struct GestureClassifier {
    thresholds: PinchThresholds,
    primary: Option<PrimaryPointer>,
    pinch: Option<PinchSession>,
    pan_anchor: Option<PanAnchor>,
}

impl GestureClassifier {
    pub fn new(thresholds: PinchThresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }

    pub fn thresholds(&self) -> &PinchThresholds {
        &self.thresholds
    }

    /// Current pinch, if SCALING
    pub fn pinch(&self) -> Option<&PinchSession> {
        self.pinch.as_ref()
    }

    /// Forget all pointer tracking
    pub fn reset(&mut self) {
        self.primary = None;
        self.pinch = None;
        self.pan_anchor = None;
    }

    /// Feed one touch event. `state` is the current interaction state; the
    /// returned outcome carries the next one.
    pub fn handle(
        &mut self,
        state: InteractionState,
        event: &TouchEvent,
        scene: &mut Scene,
    ) -> GestureOutcome {
        if state == InteractionState::Destroyed {
            debug!("Ignoring {:?}: canvas destroyed", event.action);
            return GestureOutcome::stay(state);
        }

        match event.action {
            TouchAction::Down => self.on_first_down(state, event, scene),
            TouchAction::PointerDown => self.on_pointer_down(state, event, scene),
            TouchAction::Move => self.on_move(state, event, scene),
            TouchAction::PointerUp => self.on_pointer_up(state, event, scene),
            TouchAction::Up => {
                scene.path.end_stroke();
                self.finish(state, scene)
            }
            TouchAction::Cancel => {
                debug!("Touch cancelled in {:?}", state);
                scene.path.cancel_stroke();
                self.finish(state, scene)
            }
        }
    }

    fn on_first_down(
        &mut self,
        state: InteractionState,
        event: &TouchEvent,
        scene: &mut Scene,
    ) -> GestureOutcome {
        let Some(pointer) = event.action_pointer().or(event.pointers.first()) else {
            warn!("Down event without pointers");
            return GestureOutcome::stay(state);
        };
        if state != InteractionState::Idle {
            warn!("Down event in {:?}, restarting gesture", state);
            scene.path.end_stroke();
        }

        self.reset();
        let down = pointer.position();
        self.primary = Some(PrimaryPointer {
            id: pointer.pointer_id,
            down,
        });

        let canvas_point = scene.viewport.screen_to_canvas(down);
        let style = scene.style;
        scene.path.begin_stroke(canvas_point, style);
        GestureOutcome::stay(InteractionState::Painting)
    }

    fn on_pointer_down(
        &mut self,
        state: InteractionState,
        event: &TouchEvent,
        scene: &mut Scene,
    ) -> GestureOutcome {
        if event.pointer_count() != 2 {
            debug!("Ignoring pointer down with {} pointers", event.pointer_count());
            return GestureOutcome::stay(state);
        }
        if !matches!(state, InteractionState::Painting | InteractionState::Moving) {
            debug!("Ignoring pointer down in {:?}", state);
            return GestureOutcome::stay(state);
        }

        // How far the first finger has wandered since it went down
        let displacement = self
            .primary
            .and_then(|primary| {
                event
                    .position_of(primary.id)
                    .map(|current| current.distance(primary.down))
            })
            .unwrap_or(f32::INFINITY);
        let moving = state == InteractionState::Moving;

        if !self
            .thresholds
            .should_scale(displacement, event.elapsed_ms(), moving)
        {
            debug!(
                "Second touch is not a pinch: displacement={:.1}, elapsed={}ms",
                displacement,
                event.elapsed_ms()
            );
            return GestureOutcome::stay(state);
        }

        let a = event.pointers[0];
        let b = event.pointers[1];

        // The first finger barely moved; its stroke is not worth keeping
        scene.path.cancel_stroke();
        self.primary = None;
        self.pan_anchor = None;

        let session = PinchSession::begin(
            (a.pointer_id, a.position()),
            (b.pointer_id, b.position()),
            &scene.viewport,
        );
        debug!(
            "Pinch start: pivot={:?}, distance={:.1}, scale={:.2}",
            session.canvas_pivot, session.start_distance, session.start_scale
        );
        self.pinch = Some(session);

        GestureOutcome::with_scale(
            InteractionState::Scaling,
            ScalePhase::Started,
            scene.viewport.scale(),
        )
    }

    fn on_move(
        &mut self,
        state: InteractionState,
        event: &TouchEvent,
        scene: &mut Scene,
    ) -> GestureOutcome {
        match state {
            InteractionState::Painting => {
                // No primary means the drawing finger already lifted
                let Some(primary) = self.primary else {
                    return GestureOutcome::stay(state);
                };
                let Some(position) = event.position_of(primary.id) else {
                    warn!("Move without drawing pointer {}", primary.id);
                    return GestureOutcome::stay(state);
                };
                let canvas_point = scene.viewport.screen_to_canvas(position);
                if !scene.path.extend_stroke(canvas_point) {
                    debug!("Move while painting but no active stroke");
                }
                GestureOutcome::stay(state)
            }
            InteractionState::Scaling => {
                let Some(session) = self.pinch else {
                    warn!("Scaling without a pinch session");
                    return GestureOutcome::stay(state);
                };
                let (Some(a), Some(b)) = (
                    event.position_of(session.pointer_a),
                    event.position_of(session.pointer_b),
                ) else {
                    warn!(
                        "Move without pinch pointers {} and {}",
                        session.pointer_a, session.pointer_b
                    );
                    return GestureOutcome::stay(state);
                };
                match session.apply(a, b, &mut scene.viewport) {
                    Some(scale) => {
                        GestureOutcome::with_scale(state, ScalePhase::Changed, scale)
                    }
                    None => GestureOutcome::stay(state),
                }
            }
            InteractionState::Moving => {
                let Some(anchor) = self.pan_anchor.as_mut() else {
                    warn!("Moving without a pan anchor");
                    return GestureOutcome::stay(state);
                };
                let Some(position) = event.position_of(anchor.id) else {
                    warn!("Move without pan pointer {}", anchor.id);
                    return GestureOutcome::stay(state);
                };
                scene.viewport.pan_by(position - anchor.last);
                anchor.last = position;
                GestureOutcome::stay(state)
            }
            InteractionState::Idle | InteractionState::Destroyed => {
                warn!("Move event in {:?}", state);
                GestureOutcome::stay(state)
            }
        }
    }

    fn on_pointer_up(
        &mut self,
        state: InteractionState,
        event: &TouchEvent,
        scene: &mut Scene,
    ) -> GestureOutcome {
        let Some(lifted) = event.action_pointer().map(|p| p.pointer_id) else {
            warn!("Pointer up with invalid index {}", event.action_index);
            return GestureOutcome::stay(state);
        };

        if self.primary.is_some_and(|p| p.id == lifted) {
            scene.path.end_stroke();
            self.primary = None;
        }

        match state {
            InteractionState::Scaling if self.pinch.is_some_and(|s| s.tracks(lifted)) => {
                let other = self.pinch.map(|s| s.other(lifted));
                self.pinch = None;
                self.pan_anchor = other
                    .and_then(|id| event.find(id))
                    .or_else(|| remaining_pointer(event, lifted))
                    .map(|p| PanAnchor {
                        id: p.pointer_id,
                        last: p.position(),
                    });
                GestureOutcome::with_scale(
                    InteractionState::Moving,
                    ScalePhase::Ended,
                    scene.viewport.scale(),
                )
            }
            InteractionState::Moving if self.pan_anchor.is_some_and(|a| a.id == lifted) => {
                self.pan_anchor = remaining_pointer(event, lifted).map(|p| PanAnchor {
                    id: p.pointer_id,
                    last: p.position(),
                });
                GestureOutcome::stay(state)
            }
            _ => GestureOutcome::stay(state),
        }
    }

    /// Last finger gone: back to idle
    fn finish(&mut self, state: InteractionState, scene: &Scene) -> GestureOutcome {
        let was_scaling = state == InteractionState::Scaling;
        self.reset();
        if was_scaling {
            GestureOutcome::with_scale(
                InteractionState::Idle,
                ScalePhase::Ended,
                scene.viewport.scale(),
            )
        } else {
            GestureOutcome::stay(InteractionState::Idle)
        }
    }
}

/// First pointer still down after `lifted` goes up
fn remaining_pointer(event: &TouchEvent, lifted: i32) -> Option<&TouchPoint> {
    event.pointers.iter().find(|p| p.pointer_id != lifted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaintStyle;
    use crate::viewport::ViewportLimits;

    struct Harness {
        classifier: GestureClassifier,
        scene: Scene,
        state: InteractionState,
        scale_events: Vec<ScaleEvent>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                classifier: GestureClassifier::new(PinchThresholds {
                    touch_slop: 8.0,
                    tap_timeout_ms: 100,
                }),
                scene: Scene::new(400, 400, ViewportLimits::default(), PaintStyle::default()),
                state: InteractionState::Idle,
                scale_events: Vec::new(),
            }
        }

        fn send(&mut self, action: TouchAction, index: usize, pointers: &[(i32, f32, f32)], t: u64) {
            let event = TouchEvent::new(action, index, pointers, 0, t);
            let outcome = self.classifier.handle(self.state, &event, &mut self.scene);
            self.state = outcome.state;
            self.scale_events.extend(outcome.scale_event);
        }
    }

    #[test]
    fn test_one_finger_paints() {
        let mut h = Harness::new();
        h.send(TouchAction::Down, 0, &[(0, 10.0, 10.0)], 0);
        assert_eq!(h.state, InteractionState::Painting);
        h.send(TouchAction::Move, 0, &[(0, 50.0, 10.0)], 16);
        h.send(TouchAction::Move, 0, &[(0, 50.0, 50.0)], 32);
        h.send(TouchAction::Up, 0, &[(0, 50.0, 50.0)], 48);

        assert_eq!(h.state, InteractionState::Idle);
        let strokes = h.scene.path.finished();
        assert_eq!(strokes.len(), 1);
        assert_eq!(
            strokes[0].points(),
            &[
                Vec2::new(10.0, 10.0),
                Vec2::new(50.0, 10.0),
                Vec2::new(50.0, 50.0)
            ]
        );
        assert!(h.scale_events.is_empty());
    }

    #[test]
    fn test_quick_second_finger_starts_pinch() {
        let mut h = Harness::new();
        h.send(TouchAction::Down, 0, &[(0, 100.0, 100.0)], 0);
        h.send(
            TouchAction::PointerDown,
            1,
            &[(0, 101.0, 100.0), (1, 110.0, 100.0)],
            40,
        );

        assert_eq!(h.state, InteractionState::Scaling);
        assert!(!h.scene.path.is_stroking());
        assert_eq!(
            h.scale_events,
            vec![ScaleEvent::new(ScalePhase::Started, 1.0)]
        );
    }

    #[test]
    fn test_late_second_finger_keeps_painting() {
        let mut h = Harness::new();
        h.send(TouchAction::Down, 0, &[(0, 100.0, 100.0)], 0);
        h.send(
            TouchAction::PointerDown,
            1,
            &[(0, 100.0, 100.0), (1, 200.0, 100.0)],
            250,
        );
        assert_eq!(h.state, InteractionState::Painting);

        // First finger keeps drawing; second finger is ignored
        h.send(
            TouchAction::Move,
            0,
            &[(0, 120.0, 100.0), (1, 300.0, 300.0)],
            266,
        );
        assert_eq!(h.scene.viewport.scale(), 1.0);
        assert_eq!(h.scene.path.active().map(|s| s.points().len()), Some(2));
    }

    #[test]
    fn test_drifting_first_finger_keeps_painting() {
        let mut h = Harness::new();
        h.send(TouchAction::Down, 0, &[(0, 100.0, 100.0)], 0);
        h.send(
            TouchAction::PointerDown,
            1,
            &[(0, 130.0, 100.0), (1, 200.0, 100.0)],
            30,
        );
        assert_eq!(h.state, InteractionState::Painting);
    }

    #[test]
    fn test_pinch_then_pan() {
        let mut h = Harness::new();
        h.send(TouchAction::Down, 0, &[(0, 100.0, 100.0)], 0);
        h.send(
            TouchAction::PointerDown,
            1,
            &[(0, 100.0, 100.0), (1, 110.0, 100.0)],
            20,
        );
        h.send(
            TouchAction::Move,
            0,
            &[(0, 95.0, 100.0), (1, 115.0, 100.0)],
            36,
        );
        assert!((h.scene.viewport.scale() - 2.0).abs() < 1e-5);

        // Lift finger 0: finger 1 becomes the pan anchor
        h.send(
            TouchAction::PointerUp,
            0,
            &[(0, 95.0, 100.0), (1, 115.0, 100.0)],
            52,
        );
        assert_eq!(h.state, InteractionState::Moving);
        let offset = h.scene.viewport.offset();

        h.send(TouchAction::Move, 0, &[(1, 125.0, 90.0)], 68);
        assert_eq!(h.scene.viewport.offset(), offset + Vec2::new(10.0, -10.0));
        assert!((h.scene.viewport.scale() - 2.0).abs() < 1e-5);

        h.send(TouchAction::Up, 0, &[(1, 125.0, 90.0)], 84);
        assert_eq!(h.state, InteractionState::Idle);
        assert!(h.scene.path.is_empty());

        let phases: Vec<_> = h.scale_events.iter().map(|e| e.phase).collect();
        assert_eq!(
            phases,
            vec![ScalePhase::Started, ScalePhase::Changed, ScalePhase::Ended]
        );
        assert_eq!(h.scale_events[2].scale, 2.0);
    }

    #[test]
    fn test_second_pinch_from_moving() {
        let mut h = Harness::new();
        h.send(TouchAction::Down, 0, &[(0, 100.0, 100.0)], 0);
        h.send(
            TouchAction::PointerDown,
            1,
            &[(0, 100.0, 100.0), (1, 120.0, 100.0)],
            10,
        );
        h.send(
            TouchAction::PointerUp,
            1,
            &[(0, 100.0, 100.0), (1, 120.0, 100.0)],
            20,
        );
        assert_eq!(h.state, InteractionState::Moving);

        // Long after the tap timeout, but MOVING always allows a new pinch
        h.send(
            TouchAction::PointerDown,
            1,
            &[(0, 300.0, 300.0), (2, 340.0, 300.0)],
            5000,
        );
        assert_eq!(h.state, InteractionState::Scaling);
        assert!(h.classifier.pinch().is_some_and(|s| s.tracks(2)));
    }

    #[test]
    fn test_lifting_pinch_finger_emits_end() {
        let mut h = Harness::new();
        h.send(TouchAction::Down, 0, &[(0, 100.0, 100.0)], 0);
        h.send(
            TouchAction::PointerDown,
            1,
            &[(0, 100.0, 100.0), (1, 110.0, 100.0)],
            10,
        );
        h.send(TouchAction::Up, 0, &[(0, 100.0, 100.0)], 20);
        assert_eq!(h.state, InteractionState::Idle);
        assert_eq!(
            h.scale_events.last().map(|e| e.phase),
            Some(ScalePhase::Ended)
        );
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut h = Harness::new();
        h.send(TouchAction::Move, 0, &[(0, 10.0, 10.0)], 0);
        assert_eq!(h.state, InteractionState::Idle);
        assert!(h.scene.path.is_empty());
    }

    #[test]
    fn test_cancel_discards_stroke() {
        let mut h = Harness::new();
        h.send(TouchAction::Down, 0, &[(0, 10.0, 10.0)], 0);
        h.send(TouchAction::Move, 0, &[(0, 40.0, 10.0)], 16);
        h.send(TouchAction::Cancel, 0, &[(0, 40.0, 10.0)], 32);
        assert_eq!(h.state, InteractionState::Idle);
        assert!(h.scene.path.is_empty());
    }

    #[test]
    fn test_destroyed_ignores_input() {
        let mut h = Harness::new();
        h.state = InteractionState::Destroyed;
        h.send(TouchAction::Down, 0, &[(0, 10.0, 10.0)], 0);
        assert_eq!(h.state, InteractionState::Destroyed);
        assert!(h.scene.path.is_empty());
    }

    #[test]
    fn test_strokes_map_through_viewport() {
        let mut h = Harness::new();
        h.scene
            .viewport
            .set_scale_about(Vec2::ZERO, Vec2::new(20.0, 40.0), 2.0);
        h.send(TouchAction::Down, 0, &[(0, 120.0, 240.0)], 0);
        h.send(TouchAction::Move, 0, &[(0, 140.0, 240.0)], 16);
        assert_eq!(
            h.scene.path.active().map(|s| s.points().to_vec()),
            Some(vec![Vec2::new(50.0, 100.0), Vec2::new(60.0, 100.0)])
        );
    }

    #[test]
    fn test_finger_count_states() {
        for second_finger_delay in [10, 500] {
            let mut h = Harness::new();
            h.send(TouchAction::Down, 0, &[(0, 50.0, 50.0)], 0);
            assert_eq!(h.state, InteractionState::Painting);
            h.send(
                TouchAction::PointerDown,
                1,
                &[(0, 50.0, 50.0), (1, 80.0, 80.0)],
                second_finger_delay,
            );
            assert!(matches!(
                h.state,
                InteractionState::Painting | InteractionState::Scaling
            ));
            h.send(
                TouchAction::PointerUp,
                1,
                &[(0, 50.0, 50.0), (1, 80.0, 80.0)],
                second_finger_delay + 10,
            );
            h.send(TouchAction::Up, 0, &[(0, 50.0, 50.0)], second_finger_delay + 20);
            assert_eq!(h.state, InteractionState::Idle);
        }
    }
}
