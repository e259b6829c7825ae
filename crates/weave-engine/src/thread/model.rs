//! Rope models the motion controller can drive.

use glam::Vec3;
use crate::api::config::ThreadConfig;
use crate::error::ConfigError;
use crate::rope::chain::VerletChain;
use crate::rope::decorative::BezierRope;
use crate::rope::resample::{CurveStrategy, RopeSnapshot};
use crate::rope::tube::{TubeMesh, TubeMeshBuilder};

/// Something that turns an anchor and a tip into a visible centerline.
pub trait RopeModel {
    /// Collapse the rope onto `anchor`, discarding motion and geometry.
    fn reset(&mut self, anchor: Vec3);

    /// Advance one tick with the given endpoints and regenerate geometry.
    fn rebuild(&mut self, anchor: Vec3, tip: Vec3, dt: f32, time: f32);

    fn centerline(&self) -> &[Vec3];

    /// Tube surface, for models that extrude one.
    fn mesh(&self) -> Option<&TubeMesh> {
        None
    }

    /// Drop all geometry.
    fn clear(&mut self);

    /// Drawn width, for models that carry one.
    fn width(&self) -> Option<f32> {
        None
    }
}

/// Verlet chain, resampled and extruded into a tube.
#[derive(Debug, Clone)]
pub struct ChainRope {
    chain: VerletChain,
    node_count: usize,
    curve: CurveStrategy,
    /// Curve waiting for a chain long enough to feed it.
    pending_curve: Option<CurveStrategy>,
    tube: TubeMeshBuilder,
    centerline: Vec<Vec3>,
}

impl ChainRope {
    pub fn new(config: &ThreadConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            chain: VerletChain::new(config.chain_params()),
            node_count: config.node_count,
            curve: config.curve,
            pending_curve: None,
            tube: TubeMeshBuilder::new(config.radius, config.radial_segments)?,
            centerline: Vec::new(),
        })
    }

    /// Swap in new tunables. Solver and meshing settings apply on the next
    /// rebuild; a different node count applies on the next reset. A curve
    /// that needs more nodes than the live chain has also waits for the reset.
    pub fn apply_config(&mut self, config: &ThreadConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.tube = TubeMeshBuilder::new(config.radius, config.radial_segments)?;
        self.chain.set_params(config.chain_params());
        self.node_count = config.node_count;

        if self.chain.is_empty() || self.chain.len() >= config.curve.min_nodes() {
            self.curve = config.curve;
            self.pending_curve = None;
        } else {
            log::debug!(
                "{} curve deferred: live chain has {} nodes, needs {}",
                config.curve.name(),
                self.chain.len(),
                config.curve.min_nodes()
            );
            self.pending_curve = Some(config.curve);
        }
        Ok(())
    }

    pub fn chain(&self) -> &VerletChain {
        &self.chain
    }

    pub fn curve(&self) -> CurveStrategy {
        self.curve
    }
}

impl RopeModel for ChainRope {
    fn reset(&mut self, anchor: Vec3) {
        if let Some(curve) = self.pending_curve.take() {
            self.curve = curve;
        }
        let segment_length = self.chain.params().segment_length;
        self.chain.initialize(anchor, self.node_count, segment_length);
        self.clear();
    }

    fn rebuild(&mut self, anchor: Vec3, tip: Vec3, dt: f32, time: f32) {
        if self.curve.uses_chain() {
            self.chain.simulate(anchor, tip, dt, time);
        }

        let snapshot = RopeSnapshot {
            anchor,
            tip,
            nodes: self.chain.nodes(),
        };
        self.curve.resample(snapshot, &mut self.centerline);
        self.tube.build(&self.centerline);
    }

    fn centerline(&self) -> &[Vec3] {
        &self.centerline
    }

    fn mesh(&self) -> Option<&TubeMesh> {
        Some(self.tube.mesh())
    }

    fn clear(&mut self) {
        self.centerline.clear();
        self.tube.clear();
    }
}

impl RopeModel for BezierRope {
    fn reset(&mut self, anchor: Vec3) {
        self.track(anchor, anchor);
        self.recalculate();
    }

    fn rebuild(&mut self, anchor: Vec3, tip: Vec3, dt: f32, _time: f32) {
        self.track(anchor, tip);
        self.update(dt);
    }

    fn centerline(&self) -> &[Vec3] {
        self.points()
    }

    fn clear(&mut self) {
        BezierRope::clear(self);
    }

    fn width(&self) -> Option<f32> {
        Some(self.settings().rope_width)
    }
}
