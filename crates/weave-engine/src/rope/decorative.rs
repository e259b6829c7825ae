//! Decorative rope: a weighted rational Bezier whose middle control point
//! chases the sag midpoint through a spring.
//!
//! Cheap compared to the Verlet chain (no per-node state), used for the
//! line-rendered rope hanging from the spool. Physics runs on a fixed
//! timestep independent of the frame rate.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use super::bezier::{sag_midpoint, RationalBezier, MAX_MID_WEIGHT, MIN_MID_WEIGHT};
use super::spring::SpringDamperCurve;
use crate::core::queue::EventQueue;
use crate::core::time::FixedTimestep;
use crate::error::{ensure_positive, ensure_range, ConfigError};

/// Fixed physics step (50 Hz).
pub const FIXED_DT: f32 = 1.0 / 50.0;

pub const MIN_LINE_POINTS: usize = 2;
pub const MAX_LINE_POINTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BezierRopeSettings {
    /// Curve segments; the polyline has one more point than this.
    pub line_points: usize,
    pub stiffness: f32,
    pub damping: f32,
    /// Length at which the rope hangs straight.
    pub rope_length: f32,
    pub rope_width: f32,
    /// Weight of the middle control point (1..=15).
    pub mid_weight: f32,
    /// Where along start→end the sag is centered (0.25..=0.75).
    pub mid_position: f32,
}

impl Default for BezierRopeSettings {
    fn default() -> Self {
        Self {
            line_points: 10,
            stiffness: 350.0,
            damping: 15.0,
            rope_length: 15.0,
            rope_width: 0.1,
            mid_weight: 1.0,
            mid_position: 0.5,
        }
    }
}

impl BezierRopeSettings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_range(
            "line_points",
            self.line_points as f32,
            MIN_LINE_POINTS as f32,
            MAX_LINE_POINTS as f32,
        )?;
        ensure_positive("stiffness", self.stiffness)?;
        ensure_range("damping", self.damping, 0.0, f32::MAX)?;
        ensure_positive("rope_length", self.rope_length)?;
        ensure_positive("rope_width", self.rope_width)?;
        ensure_range("mid_weight", self.mid_weight, MIN_MID_WEIGHT, MAX_MID_WEIGHT)?;
        ensure_range("mid_position", self.mid_position, 0.25, 0.75)?;
        Ok(())
    }
}

/// Notifications for whoever mirrors the rope (renderers, attachments).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RopeEvent {
    /// Endpoints were reassigned or settings changed.
    PointsChanged,
}

#[derive(Debug, Clone)]
pub struct BezierRope {
    start: Option<Vec3>,
    end: Option<Vec3>,
    settings: BezierRopeSettings,
    spring: SpringDamperCurve,
    timestep: FixedTimestep,
    skip_next_step: bool,
    points: Vec<Vec3>,
    events: EventQueue<RopeEvent>,
}

impl BezierRope {
    pub fn new(settings: BezierRopeSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self::from_valid(settings))
    }

    fn from_valid(settings: BezierRopeSettings) -> Self {
        Self {
            start: None,
            end: None,
            settings,
            spring: SpringDamperCurve::new(settings.stiffness, settings.damping),
            timestep: FixedTimestep::new(FIXED_DT),
            skip_next_step: true,
            points: Vec::with_capacity(settings.line_points + 1),
            events: EventQueue::new(),
        }
    }

    pub fn settings(&self) -> &BezierRopeSettings {
        &self.settings
    }

    pub fn start(&self) -> Option<Vec3> {
        self.start
    }

    pub fn end(&self) -> Option<Vec3> {
        self.end
    }

    /// Current polyline, `line_points + 1` long; empty while an endpoint is missing.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn is_visible(&self) -> bool {
        !self.points.is_empty()
    }

    /// Current middle control point.
    pub fn control_point(&self) -> Vec3 {
        self.spring.value()
    }

    pub fn set_external_force(&mut self, force: Vec3) {
        self.spring.external_force = force;
    }

    pub fn drain_events(&mut self) -> Vec<RopeEvent> {
        self.events.drain()
    }

    fn endpoints(&self) -> Option<(Vec3, Vec3)> {
        Some((self.start?, self.end?))
    }

    fn curve(&self, start: Vec3, end: Vec3) -> RationalBezier {
        RationalBezier::new(start, self.spring.value(), end, self.settings.mid_weight)
    }

    fn sag_target(&self, start: Vec3, end: Vec3) -> Vec3 {
        let s = &self.settings;
        sag_midpoint(start, end, s.mid_position, s.rope_length, s.mid_weight)
    }

    /// Point on the curve at `t` in [0, 1], or `None` while an endpoint is missing.
    pub fn point_at(&self, t: f32) -> Option<Vec3> {
        let (start, end) = self.endpoints()?;
        Some(self.curve(start, end).evaluate(t))
    }

    /// Point at `mid_position` along the curve, for a midpoint attachment.
    pub fn mid_marker(&self) -> Option<Vec3> {
        self.point_at(self.settings.mid_position)
    }

    /// Advance by one frame. Physics steps are drawn from the fixed timestep;
    /// the first one after a reset is skipped.
    pub fn update(&mut self, frame_dt: f32) {
        let Some((start, end)) = self.endpoints() else {
            self.points.clear();
            return;
        };

        let target = self.sag_target(start, end);
        self.spring.set_target(target);

        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            if self.skip_next_step {
                self.skip_next_step = false;
                continue;
            }
            self.spring.step(self.timestep.dt());
        }

        self.rebuild_points(start, end);
    }

    /// Snap the control point to the sag midpoint at rest and rebuild.
    pub fn recalculate(&mut self) {
        let Some((start, end)) = self.endpoints() else {
            self.points.clear();
            return;
        };

        let rest = self.sag_target(start, end);
        self.spring.reset(rest);
        self.timestep.reset();
        self.skip_next_step = true;
        self.rebuild_points(start, end);
    }

    /// Move the endpoints without notifying (they are being animated).
    pub fn track(&mut self, start: Vec3, end: Vec3) {
        self.start = Some(start);
        self.end = Some(end);
    }

    /// Reassign the start point. `instant` snaps the rope instead of letting
    /// the spring ease toward the new shape; clearing the point always snaps.
    pub fn set_start(&mut self, start: Option<Vec3>, instant: bool) {
        self.start = start;
        if instant || start.is_none() {
            self.recalculate();
        }
        self.events.push(RopeEvent::PointsChanged);
    }

    pub fn set_end(&mut self, end: Option<Vec3>, instant: bool) {
        self.end = end;
        if instant || end.is_none() {
            self.recalculate();
        }
        self.events.push(RopeEvent::PointsChanged);
    }

    /// Replace settings. Invalid settings are rejected and nothing changes.
    pub fn apply_settings(&mut self, settings: BezierRopeSettings) -> Result<(), ConfigError> {
        settings.validate()?;
        self.settings = settings;
        self.spring.stiffness = settings.stiffness;
        self.spring.damping = settings.damping;
        self.recalculate();
        self.events.push(RopeEvent::PointsChanged);
        Ok(())
    }

    /// Forget both endpoints and the polyline.
    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
        self.points.clear();
    }

    fn rebuild_points(&mut self, start: Vec3, end: Vec3) {
        let curve = self.curve(start, end);
        let segments = self.settings.line_points;
        self.points.clear();
        self.points
            .extend((0..segments).map(|i| curve.evaluate(i as f32 / segments as f32)));
        self.points.push(end);
    }
}

impl Default for BezierRope {
    fn default() -> Self {
        Self::from_valid(BezierRopeSettings::default())
    }
}
