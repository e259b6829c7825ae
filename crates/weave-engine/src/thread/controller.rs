//! Drives a rope's tip toward requested targets at a fixed speed.
//!
//! Motion requests are stored as a [`MoveTask`] and advanced by [`tick`];
//! the host decides when a task is done by watching the returned
//! [`MotionStatus`]. Only one task runs at a time: a new request replaces
//! the current one and the tip heads for the new target from wherever it is.
//!
//! [`tick`]: ThreadMotionController::tick

use glam::Vec3;
use serde::{Deserialize, Serialize};
use super::model::RopeModel;
use crate::api::config::RopeConfig;
use crate::api::types::Rgba;
use crate::core::time::SimClock;
use crate::error::ThreadError;
use crate::extensions::math::{clamp01, move_towards};
use crate::rope::tube::TubeMesh;

/// Squared distance at which the tip counts as arrived.
pub const ARRIVAL_EPSILON_SQ: f32 = 1e-4;

/// Sideways sway applied to the anchor while the rope is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnchorSwing {
    /// Faster and wider the longer the rope.
    #[default]
    Distance,
    /// Fixed rate and amplitude, faded in over the first ten units of length.
    Config(RopeConfig),
    None,
}

impl AnchorSwing {
    /// Offset along the anchor's right axis.
    pub fn offset(&self, distance: f32, time: f32) -> f32 {
        match self {
            AnchorSwing::Distance => {
                (time * (6.0 + distance * 0.5)).sin() * (0.05 + distance * 0.02)
            }
            AnchorSwing::Config(c) => {
                (time * c.swing_speed).sin() * c.swing_amount * clamp01(distance * 0.1)
            }
            AnchorSwing::None => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    /// Hidden and detached. Only `attach` leaves this state.
    Idle,
    /// Attached and at rest.
    Attached,
    /// A move task is in flight.
    Moving,
}

/// A pending tip move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveTask {
    pub target: Vec3,
    /// World units per second.
    pub speed: f32,
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionStatus {
    /// No task running.
    Resting,
    /// Tip advanced but has not arrived.
    Moving,
    /// Tip snapped onto the target this tick; the task is finished.
    Arrived(Vec3),
}

pub struct ThreadMotionController<R: RopeModel> {
    rope: R,
    anchor: Vec3,
    anchor_right: Vec3,
    swing: AnchorSwing,
    tip: Vec3,
    color: Rgba,
    state: ThreadState,
    task: Option<MoveTask>,
    visible: bool,
    clock: SimClock,
}

impl<R: RopeModel> ThreadMotionController<R> {
    pub fn new(rope: R) -> Self {
        Self {
            rope,
            anchor: Vec3::ZERO,
            anchor_right: Vec3::X,
            swing: AnchorSwing::default(),
            tip: Vec3::ZERO,
            color: Rgba::WHITE,
            state: ThreadState::Idle,
            task: None,
            visible: false,
            clock: SimClock::new(),
        }
    }

    pub fn with_swing(mut self, swing: AnchorSwing) -> Self {
        self.swing = swing;
        self
    }

    pub fn with_anchor_right(mut self, right: Vec3) -> Self {
        self.anchor_right = right.normalize_or_zero();
        self
    }

    pub fn set_swing(&mut self, swing: AnchorSwing) {
        self.swing = swing;
    }

    pub fn set_anchor_right(&mut self, right: Vec3) {
        self.anchor_right = right.normalize_or_zero();
    }

    /// Hook the rope to `anchor`: rope collapses there, tip starts there.
    pub fn attach(&mut self, anchor: Vec3, color: Rgba) {
        self.anchor = anchor;
        self.tip = anchor;
        self.color = color;
        self.task = None;
        self.rope.reset(anchor);
        self.visible = true;
        self.state = ThreadState::Attached;
        log::debug!("thread attached at {:?}", anchor);
    }

    /// Start moving the tip toward `target` at `speed` units per second.
    /// Any move in flight is abandoned.
    pub fn move_tip_to(&mut self, target: Vec3, speed: f32) -> Result<(), ThreadError> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ThreadError::InvalidSpeed(speed));
        }
        if !target.is_finite() {
            return Err(ThreadError::InvalidTarget(target));
        }
        if self.state == ThreadState::Idle {
            log::warn!("move_tip_to({:?}) ignored: thread is not attached", target);
            return Ok(());
        }

        if let Some(previous) = self.task.replace(MoveTask { target, speed }) {
            log::debug!("tip move to {:?} replaced by {:?}", previous.target, target);
        }
        self.state = ThreadState::Moving;
        Ok(())
    }

    /// Advance the clock, the tip and the rope by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> MotionStatus {
        self.clock.advance(dt);
        if self.state == ThreadState::Idle {
            return MotionStatus::Resting;
        }

        let Some(task) = self.task else {
            self.rebuild(dt);
            return MotionStatus::Resting;
        };

        if self.tip.distance_squared(task.target) > ARRIVAL_EPSILON_SQ {
            self.tip = move_towards(self.tip, task.target, task.speed * dt.max(0.0));
            self.rebuild(dt);
            MotionStatus::Moving
        } else {
            self.tip = task.target;
            self.rebuild(dt);
            self.task = None;
            self.state = ThreadState::Attached;
            MotionStatus::Arrived(task.target)
        }
    }

    fn rebuild(&mut self, dt: f32) {
        let time = self.clock.elapsed();
        let sway = self.swing.offset(self.anchor.distance(self.tip), time);
        let anchor = self.anchor + self.anchor_right * sway;
        self.rope.rebuild(anchor, self.tip, dt, time);
    }

    /// Stop exposing geometry. The thread stays attached and any move keeps
    /// running, so `show` picks up wherever the tip has got to.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Re-enable output of an attached thread.
    pub fn show(&mut self) {
        if self.state == ThreadState::Idle {
            log::warn!("show() ignored: thread is not attached");
            return;
        }
        self.visible = true;
    }

    /// Cancel any move, drop geometry and go idle until the next `attach`.
    pub fn detach(&mut self) {
        self.task = None;
        self.rope.clear();
        self.visible = false;
        self.state = ThreadState::Idle;
    }

    /// Samples of the visible rope; empty while hidden.
    pub fn centerline(&self) -> &[Vec3] {
        if self.visible {
            self.rope.centerline()
        } else {
            &[]
        }
    }

    /// Tube around the centerline, while visible and if the rope builds one.
    pub fn mesh(&self) -> Option<&TubeMesh> {
        if self.visible {
            self.rope.mesh()
        } else {
            None
        }
    }

    pub fn tip(&self) -> Vec3 {
        self.tip
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn anchor_right(&self) -> Vec3 {
        self.anchor_right
    }

    /// Width for a flat stroke of this thread: the rope's own width if it has
    /// one, then a configured rope profile's, then `fallback`.
    pub fn stroke_width(&self, fallback: f32) -> f32 {
        let profile = match self.swing {
            AnchorSwing::Config(rope) => Some(rope.rope_width),
            _ => None,
        };
        self.rope.width().or(profile).unwrap_or(fallback)
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    pub fn state(&self) -> ThreadState {
        self.state
    }

    pub fn task(&self) -> Option<&MoveTask> {
        self.task.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.state == ThreadState::Idle
    }

    pub fn is_moving(&self) -> bool {
        self.state == ThreadState::Moving
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn rope(&self) -> &R {
        &self.rope
    }

    pub fn rope_mut(&mut self) -> &mut R {
        &mut self.rope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::ThreadConfig;
    use crate::rope::decorative::BezierRope;
    use crate::thread::model::ChainRope;

    const DT: f32 = 1.0 / 60.0;

    fn controller() -> ThreadMotionController<ChainRope> {
        let rope = ChainRope::new(&ThreadConfig::default()).unwrap();
        ThreadMotionController::new(rope)
    }

    fn run_until_arrival<R: RopeModel>(c: &mut ThreadMotionController<R>, max_ticks: usize) -> usize {
        for n in 1..=max_ticks {
            if let MotionStatus::Arrived(_) = c.tick(DT) {
                return n;
            }
        }
        panic!("tip did not arrive within {} ticks", max_ticks);
    }

    #[test]
    fn starts_idle_and_hidden() {
        let mut c = controller();
        assert!(c.is_idle());
        assert!(c.centerline().is_empty());
        assert_eq!(c.tick(DT), MotionStatus::Resting);
    }

    #[test]
    fn attach_places_tip_on_anchor() {
        let mut c = controller();
        let anchor = Vec3::new(0.0, 2.0, -1.0);
        c.attach(anchor, Rgba::rgb(1.0, 0.8, 0.0));
        assert_eq!(c.state(), ThreadState::Attached);
        assert_eq!(c.tip(), anchor);
        assert!(c.is_visible());
        assert_eq!(c.color(), Rgba::rgb(1.0, 0.8, 0.0));
    }

    #[test]
    fn arrival_is_exact() {
        let mut c = controller();
        c.attach(Vec3::ZERO, Rgba::WHITE);
        let target = Vec3::new(1.0, 0.5, 0.02);
        c.move_tip_to(target, 2.0).unwrap();
        assert!(c.is_moving());

        let ticks = run_until_arrival(&mut c, 200);
        // ~1.118 units at 2/60 per tick, plus the arrival tick.
        assert!((34..=36).contains(&ticks), "took {} ticks", ticks);
        assert_eq!(c.tip(), target);
        assert_eq!(c.state(), ThreadState::Attached);
        assert!(c.task().is_none());
    }

    #[test]
    fn tip_advances_at_speed() {
        let mut c = controller();
        c.attach(Vec3::ZERO, Rgba::WHITE);
        c.move_tip_to(Vec3::new(10.0, 0.0, 0.0), 3.0).unwrap();
        for _ in 0..30 {
            assert_eq!(c.tick(DT), MotionStatus::Moving);
        }
        assert!((c.tip().x - 1.5).abs() < 1e-4);
    }

    #[test]
    fn rejects_bad_speed() {
        let mut c = controller();
        c.attach(Vec3::ZERO, Rgba::WHITE);
        for speed in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                c.move_tip_to(Vec3::X, speed),
                Err(ThreadError::InvalidSpeed(_))
            ));
        }
        assert!(matches!(
            c.move_tip_to(Vec3::splat(f32::NAN), 1.0),
            Err(ThreadError::InvalidTarget(_))
        ));
        assert_eq!(c.state(), ThreadState::Attached);
    }

    #[test]
    fn move_while_idle_is_ignored() {
        let mut c = controller();
        c.move_tip_to(Vec3::X, 1.0).unwrap();
        assert!(c.is_idle());
        assert_eq!(c.tick(DT), MotionStatus::Resting);
        assert_eq!(c.tip(), Vec3::ZERO);
    }

    #[test]
    fn new_request_replaces_current_move() {
        let mut c = controller();
        c.attach(Vec3::ZERO, Rgba::WHITE);
        c.move_tip_to(Vec3::new(5.0, 0.0, 0.0), 1.0).unwrap();
        for _ in 0..10 {
            c.tick(DT);
        }
        let second = Vec3::new(0.0, -0.3, 0.0);
        c.move_tip_to(second, 4.0).unwrap();
        run_until_arrival(&mut c, 100);
        assert_eq!(c.tip(), second);
    }

    #[test]
    fn moving_rope_has_geometry() {
        let mut c = controller();
        c.attach(Vec3::ZERO, Rgba::WHITE);
        c.move_tip_to(Vec3::new(0.6, -0.4, 0.0), 1.0).unwrap();
        c.tick(DT);
        assert_eq!(c.centerline().len(), 6 * 13);
        let mesh = c.mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 6 * 13 * 13);
    }

    #[test]
    fn hide_then_show_restores_output() {
        let mut c = controller();
        c.attach(Vec3::ZERO, Rgba::WHITE);
        c.move_tip_to(Vec3::new(0.6, -0.4, 0.0), 1.0).unwrap();
        c.tick(DT);

        c.hide();
        assert!(!c.is_visible());
        assert!(c.centerline().is_empty());
        assert!(c.mesh().is_none());
        assert!(c.is_moving());

        // Motion continues while hidden.
        let before = c.tip();
        c.tick(DT);
        assert!(c.tip().x > before.x);

        c.show();
        assert!(c.is_visible());
        assert_eq!(c.centerline().len(), 6 * 13);
        assert!(c.mesh().is_some());
    }

    #[test]
    fn hidden_thread_stays_hidden_on_new_move() {
        let mut c = controller();
        c.attach(Vec3::ZERO, Rgba::WHITE);
        c.hide();
        c.move_tip_to(Vec3::X, 1.0).unwrap();
        c.tick(DT);
        assert!(!c.is_visible());
        assert!(c.centerline().is_empty());
    }

    #[test]
    fn detach_is_terminal_until_attach() {
        let mut c = controller();
        c.attach(Vec3::ZERO, Rgba::WHITE);
        c.move_tip_to(Vec3::X, 1.0).unwrap();
        c.tick(DT);
        c.detach();

        assert!(c.is_idle());
        assert!(c.centerline().is_empty());
        assert!(c.mesh().is_none());
        assert!(c.task().is_none());

        c.show();
        assert!(!c.is_visible());

        c.attach(Vec3::Y, Rgba::BLACK);
        assert!(c.is_visible());
        assert_eq!(c.state(), ThreadState::Attached);
    }

    #[test]
    fn arrival_is_exact_with_irregular_deltas() {
        let mut c = controller();
        c.attach(Vec3::new(0.0, 1.0, 0.0), Rgba::WHITE);
        let target = Vec3::new(-0.7, -0.3, 0.02);
        c.move_tip_to(target, 1.3).unwrap();

        let deltas = [0.004, 0.033, 0.0, 0.016, 0.051, 0.009, 0.027];
        let mut arrived = None;
        for n in 0..500 {
            if let MotionStatus::Arrived(p) = c.tick(deltas[n % deltas.len()]) {
                arrived = Some(p);
                break;
            }
        }
        assert_eq!(arrived, Some(target));
        assert_eq!(c.tip(), target);
        assert_eq!(c.state(), ThreadState::Attached);
    }

    #[test]
    fn stroke_width_prefers_rope_then_profile() {
        let c = controller();
        assert_eq!(c.stroke_width(0.3), 0.3);

        let profile = RopeConfig {
            rope_width: 0.07,
            ..Default::default()
        };
        let c = controller().with_swing(AnchorSwing::Config(profile));
        assert_eq!(c.stroke_width(0.3), 0.07);

        let c = ThreadMotionController::new(BezierRope::default())
            .with_swing(AnchorSwing::Config(profile));
        assert_eq!(c.stroke_width(0.3), 0.1);
    }

    #[test]
    fn same_deltas_give_same_curve() {
        let mut a = controller();
        let mut b = controller();
        for c in [&mut a, &mut b] {
            c.attach(Vec3::new(0.0, 1.0, 0.0), Rgba::WHITE);
            c.move_tip_to(Vec3::new(0.8, -0.5, 0.02), 1.5).unwrap();
            for i in 0..40 {
                c.tick(DT * (1.0 + (i % 3) as f32 * 0.5));
            }
        }
        assert_eq!(a.centerline(), b.centerline());
    }

    #[test]
    fn drives_bezier_rope() {
        let mut c = ThreadMotionController::new(BezierRope::default()).with_swing(AnchorSwing::None);
        c.attach(Vec3::ZERO, Rgba::WHITE);
        let target = Vec3::new(2.0, -1.0, 0.0);
        c.move_tip_to(target, 10.0).unwrap();
        run_until_arrival(&mut c, 100);
        assert_eq!(c.centerline().len(), 11);
        assert_eq!(*c.centerline().last().unwrap(), target);
        assert!(c.mesh().is_none());
    }

    #[test]
    fn swing_offsets() {
        assert_eq!(AnchorSwing::None.offset(3.0, 1.7), 0.0);
        assert_eq!(AnchorSwing::Distance.offset(2.0, 0.0), 0.0);

        let t = std::f32::consts::FRAC_PI_2 / 6.0;
        let near = AnchorSwing::Config(RopeConfig::default()).offset(5.0, t);
        let far = AnchorSwing::Config(RopeConfig::default()).offset(50.0, t);
        assert!((near - 0.02).abs() < 1e-5);
        assert!((far - 0.04).abs() < 1e-5);
    }

    #[test]
    fn swing_from_json() {
        let swing: AnchorSwing =
            serde_json::from_str(r#"{ "kind": "config", "swing_amount": 0.1 }"#).unwrap();
        match swing {
            AnchorSwing::Config(c) => {
                assert_eq!(c.swing_amount, 0.1);
                assert_eq!(c.swing_speed, 6.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
