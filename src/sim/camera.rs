//! Camera controller
//!
//! Input pushes [`CameraIntent`]s; once per tick the controller drains them
//! in order, advances any eased transition, then applies behaviour-driven
//! follow. Zoom is clamped to [`MIN_ZOOM`, `MAX_ZOOM`] after every step.

use std::collections::VecDeque;

use glam::Vec2;

use crate::consts::{CAMERA_FOLLOW_RATE, CAMERA_TRANSITION, MAX_ZOOM, MIN_ZOOM, SIDE_SCROLL_LEAD};
use crate::smoothing;

const MAX_TILT: f32 = 1.0;

/// Projection style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    TopDown,
    SideScroll,
}

/// What drives the camera position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraBehavior {
    #[default]
    FollowPlayer,
    /// Parked on a point (pan-to)
    Fixed,
    /// Moved only by pan deltas
    Manual,
    /// Leads the player regardless of mode
    SideScrollLock,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    pub pos: Vec2,
    pub zoom: f32,
    pub rotation: f32,
    pub tilt: f32,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            zoom: 1.0,
            rotation: 0.0,
            tilt: 0.0,
        }
    }
}

/// Camera requests from input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraIntent {
    SetZoom(f32),
    AdjustZoom(f32),
    SetRotation(f32),
    AdjustRotation(f32),
    SetTilt(f32),
    AdjustTilt(f32),
    PanTo(Vec2),
    PanBy(Vec2),
    SetBehavior(CameraBehavior),
    CycleMode,
    SnapToPlayer,
    Reset,
    Lock,
    Unlock,
}

/// An in-flight eased move between two transforms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: CameraTransform,
    pub to: CameraTransform,
    /// Linear progress 0..=1
    pub t: f32,
    pub duration: f32,
}

/// Symmetric ease-in-out (quadratic)
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct CameraController {
    pub mode: CameraMode,
    pub behavior: CameraBehavior,
    pub transform: CameraTransform,
    pub locked: bool,
    pub transition: Option<Transition>,
    /// Follow smoothing rate, `None` snaps
    pub follow_rate: Option<f32>,
    queue: VecDeque<CameraIntent>,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            mode: CameraMode::TopDown,
            behavior: CameraBehavior::FollowPlayer,
            transform: CameraTransform::default(),
            locked: false,
            transition: None,
            follow_rate: Some(CAMERA_FOLLOW_RATE),
            queue: VecDeque::new(),
        }
    }
}

impl CameraController {
    pub fn push(&mut self, intent: CameraIntent) {
        self.queue.push_back(intent);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Jump straight to a position
    pub fn snap_to(&mut self, pos: Vec2) {
        self.transform.pos = pos;
    }

    /// Transition length (reduced motion completes on the next update)
    fn transition_secs(&self) -> f32 {
        if self.follow_rate.is_some() {
            CAMERA_TRANSITION
        } else {
            0.0
        }
    }

    fn start_transition(&mut self, to: CameraTransform) {
        self.transition = Some(Transition {
            from: self.transform,
            to,
            t: 0.0,
            duration: self.transition_secs(),
        });
    }

    /// Target transform once any running transition lands
    fn settled(&self) -> CameraTransform {
        self.transition.map(|tr| tr.to).unwrap_or(self.transform)
    }

    /// Apply a zoom/rotation/tilt change now and to any running transition
    fn set_view(&mut self, zoom: Option<f32>, rotation: Option<f32>, tilt: Option<f32>) {
        let zoom = zoom.map(|z| z.clamp(MIN_ZOOM, MAX_ZOOM));
        let tilt = tilt.map(|t| t.clamp(0.0, MAX_TILT));
        for view in std::iter::once(&mut self.transform)
            .chain(self.transition.as_mut().map(|tr| &mut tr.to))
        {
            if let Some(z) = zoom {
                view.zoom = z;
            }
            if let Some(r) = rotation {
                view.rotation = r;
            }
            if let Some(t) = tilt {
                view.tilt = t;
            }
        }
    }

    fn apply(&mut self, intent: CameraIntent, focus: Vec2) {
        let target = self.settled();
        match intent {
            CameraIntent::SetZoom(z) => self.set_view(Some(z), None, None),
            CameraIntent::AdjustZoom(dz) => self.set_view(Some(target.zoom + dz), None, None),
            CameraIntent::SetRotation(r) => self.set_view(None, Some(r), None),
            CameraIntent::AdjustRotation(dr) => {
                self.set_view(None, Some(crate::normalize_angle(target.rotation + dr)), None)
            }
            CameraIntent::SetTilt(t) => self.set_view(None, None, Some(t)),
            CameraIntent::AdjustTilt(dt) => self.set_view(None, None, Some(target.tilt + dt)),
            CameraIntent::PanTo(pos) => {
                self.behavior = CameraBehavior::Fixed;
                self.start_transition(CameraTransform { pos, ..target });
            }
            CameraIntent::PanBy(delta) => {
                self.behavior = CameraBehavior::Manual;
                self.transform.pos += delta;
                let pos = self.transform.pos;
                if let Some(tr) = self.transition.as_mut() {
                    let toward = tr.to.pos - tr.from.pos;
                    if toward.dot(delta) <= 0.0 {
                        tr.from.pos = pos;
                        tr.to.pos = pos;
                    }
                }
            }
            CameraIntent::SetBehavior(behavior) => self.behavior = behavior,
            CameraIntent::CycleMode => {
                let (mode, behavior) = match self.mode {
                    CameraMode::TopDown => (CameraMode::SideScroll, CameraBehavior::SideScrollLock),
                    CameraMode::SideScroll => (CameraMode::TopDown, CameraBehavior::FollowPlayer),
                };
                self.mode = mode;
                self.behavior = behavior;
                self.set_view(None, Some(0.0), None);
            }
            CameraIntent::SnapToPlayer => {
                self.behavior = CameraBehavior::FollowPlayer;
                self.transform.pos = focus;
                if let Some(tr) = self.transition.as_mut() {
                    tr.from.pos = focus;
                    tr.to.pos = focus;
                }
            }
            CameraIntent::Reset => {
                self.start_transition(CameraTransform {
                    pos: self.transform.pos,
                    zoom: 1.0,
                    rotation: 0.0,
                    tilt: 0.0,
                });
            }
            CameraIntent::Lock => self.locked = true,
            CameraIntent::Unlock => self.locked = false,
        }
    }

    /// Drain intents, advance the transition, then follow
    pub fn update(&mut self, dt: f32, focus: Vec2, heading: Vec2) {
        while let Some(intent) = self.queue.pop_front() {
            if self.locked && intent != CameraIntent::Unlock {
                continue;
            }
            self.apply(intent, focus);
        }

        if let Some(mut tr) = self.transition {
            tr.t = if tr.duration > 0.0 {
                (tr.t + dt / tr.duration).min(1.0)
            } else {
                1.0
            };
            let e = ease_in_out(tr.t);
            self.transform.zoom = tr.from.zoom + (tr.to.zoom - tr.from.zoom) * e;
            self.transform.rotation = tr.from.rotation + (tr.to.rotation - tr.from.rotation) * e;
            self.transform.tilt = tr.from.tilt + (tr.to.tilt - tr.from.tilt) * e;
            if self.behavior == CameraBehavior::Fixed {
                self.transform.pos = tr.from.pos.lerp(tr.to.pos, e);
            }
            self.transition = if tr.t >= 1.0 { None } else { Some(tr) };
        }

        let lead = heading.normalize_or_zero() * SIDE_SCROLL_LEAD;
        let follow = match (self.behavior, self.mode) {
            (CameraBehavior::FollowPlayer, CameraMode::TopDown) => Some(focus),
            (CameraBehavior::FollowPlayer, CameraMode::SideScroll) => Some(focus + lead),
            (CameraBehavior::SideScrollLock, _) => Some(focus + lead),
            _ => None,
        };
        if let Some(target) = follow {
            self.transform.pos = match self.follow_rate {
                Some(rate) => self.transform.pos.lerp(target, smoothing(rate, dt)),
                None => target,
            };
        }

        self.transform.zoom = self.transform.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn run(cam: &mut CameraController, secs: f32) {
        let steps = (secs / DT).ceil() as usize;
        for _ in 0..steps {
            cam.update(DT, Vec2::ZERO, Vec2::X);
        }
    }

    #[test]
    fn test_ease_endpoints_and_symmetry() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!((ease_in_out(0.25) + ease_in_out(0.75) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut cam = CameraController::default();
        cam.push(CameraIntent::SetZoom(10.0));
        cam.update(DT, Vec2::ZERO, Vec2::X);
        assert_eq!(cam.transform.zoom, MAX_ZOOM);
        cam.push(CameraIntent::AdjustZoom(-100.0));
        cam.update(DT, Vec2::ZERO, Vec2::X);
        assert_eq!(cam.transform.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_locked_drops_everything_but_unlock() {
        let mut cam = CameraController::default();
        cam.push(CameraIntent::Lock);
        cam.push(CameraIntent::SetZoom(2.0));
        cam.push(CameraIntent::Unlock);
        cam.push(CameraIntent::SetZoom(3.0));
        cam.update(DT, Vec2::ZERO, Vec2::X);
        assert!(!cam.locked);
        assert_eq!(cam.transform.zoom, 3.0);
        assert_eq!(cam.pending(), 0);
    }

    #[test]
    fn test_pan_to_transitions_and_fixes() {
        let mut cam = CameraController::default();
        cam.push(CameraIntent::PanTo(Vec2::new(10.0, 0.0)));
        cam.update(DT, Vec2::ZERO, Vec2::X);
        assert_eq!(cam.behavior, CameraBehavior::Fixed);
        assert!(cam.transition.is_some());
        let mid = cam.transform.pos.x;
        assert!(mid > 0.0 && mid < 10.0);
        run(&mut cam, CAMERA_TRANSITION + 0.1);
        assert!(cam.transition.is_none());
        assert!((cam.transform.pos.x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_pan_by_against_transition_cancels_position() {
        let mut cam = CameraController::default();
        cam.push(CameraIntent::PanTo(Vec2::new(10.0, 0.0)));
        cam.update(DT, Vec2::ZERO, Vec2::X);
        cam.push(CameraIntent::PanBy(Vec2::new(-2.0, 0.0)));
        cam.update(DT, Vec2::ZERO, Vec2::X);
        assert_eq!(cam.behavior, CameraBehavior::Manual);
        let tr = cam.transition.expect("transition still running for zoom/rotation");
        assert_eq!(tr.from.pos, tr.to.pos);
    }

    #[test]
    fn test_reset_returns_to_neutral() {
        let mut cam = CameraController::default();
        cam.push(CameraIntent::SetZoom(3.0));
        cam.push(CameraIntent::SetRotation(1.0));
        cam.update(DT, Vec2::ZERO, Vec2::X);
        cam.push(CameraIntent::Reset);
        run(&mut cam, CAMERA_TRANSITION + 0.1);
        assert!((cam.transform.zoom - 1.0).abs() < 1e-4);
        assert!(cam.transform.rotation.abs() < 1e-4);
    }

    #[test]
    fn test_cycle_mode_swaps_behavior_and_resets_rotation() {
        let mut cam = CameraController::default();
        cam.push(CameraIntent::SetRotation(0.7));
        cam.push(CameraIntent::CycleMode);
        cam.update(DT, Vec2::ZERO, Vec2::X);
        assert_eq!(cam.mode, CameraMode::SideScroll);
        assert_eq!(cam.behavior, CameraBehavior::SideScrollLock);
        assert_eq!(cam.transform.rotation, 0.0);
        cam.push(CameraIntent::CycleMode);
        cam.update(DT, Vec2::ZERO, Vec2::X);
        assert_eq!(cam.mode, CameraMode::TopDown);
        assert_eq!(cam.behavior, CameraBehavior::FollowPlayer);
    }

    #[test]
    fn test_side_scroll_leads_travel() {
        let mut cam = CameraController {
            follow_rate: None,
            ..Default::default()
        };
        cam.update(DT, Vec2::new(5.0, 5.0), Vec2::X);
        assert_eq!(cam.transform.pos, Vec2::new(5.0, 5.0));
        cam.push(CameraIntent::SetBehavior(CameraBehavior::SideScrollLock));
        cam.update(DT, Vec2::new(5.0, 5.0), Vec2::X);
        assert_eq!(cam.transform.pos, Vec2::new(5.0 + SIDE_SCROLL_LEAD, 5.0));
    }

    #[test]
    fn test_follow_smooths_toward_player() {
        let mut cam = CameraController::default();
        cam.update(DT, Vec2::new(10.0, 0.0), Vec2::X);
        let x = cam.transform.pos.x;
        assert!(x > 0.0 && x < 10.0);
    }

    fn intent_strategy() -> impl Strategy<Value = CameraIntent> {
        prop_oneof![
            (-20.0f32..20.0).prop_map(CameraIntent::SetZoom),
            (-5.0f32..5.0).prop_map(CameraIntent::AdjustZoom),
            Just(CameraIntent::Reset),
            Just(CameraIntent::Lock),
            Just(CameraIntent::Unlock),
            Just(CameraIntent::CycleMode),
            (-10.0f32..10.0).prop_map(|x| CameraIntent::PanTo(Vec2::new(x, 0.0))),
        ]
    }

    proptest! {
        #[test]
        fn prop_zoom_stays_in_range(intents in prop::collection::vec(intent_strategy(), 0..40)) {
            let mut cam = CameraController::default();
            for intent in intents {
                cam.push(intent);
                cam.update(DT, Vec2::ZERO, Vec2::X);
                prop_assert!(cam.transform.zoom >= MIN_ZOOM && cam.transform.zoom <= MAX_ZOOM);
            }
        }
    }
}
