//! Verlet point-mass chain with pinned endpoints.
//!
//! The chain is the physical body of the 3D thread: interior nodes carry
//! momentum implicitly through their previous position, and an iterative
//! distance-constraint pass pulls neighbours toward a slightly oscillating
//! rest length so the thread keeps some visible "give".

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Pairs closer than this are left alone by the constraint pass.
pub const MIN_SEGMENT_DISTANCE: f32 = 1e-6;

/// Angular rate of the rest-length oscillation (per second of sim time).
const ELASTIC_RATE: f32 = 8.0;
/// Phase offset between neighbouring segments.
const ELASTIC_PHASE: f32 = 0.4;
/// Scale from `elasticity` to rest-length amplitude.
const ELASTIC_AMPLITUDE: f32 = 0.03;

/// A single point mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainNode {
    pub current: Vec3,
    pub previous: Vec3,
}

impl ChainNode {
    pub fn at(pos: Vec3) -> Self {
        Self {
            current: pos,
            previous: pos,
        }
    }

    /// Implicit per-step velocity.
    pub fn displacement(&self) -> Vec3 {
        self.current - self.previous
    }
}

/// Tunables for the chain solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainParams {
    /// Rest distance between neighbouring nodes.
    pub segment_length: f32,
    /// Constraint relaxation passes per step.
    pub iterations: usize,
    /// Amplitude factor of the rest-length oscillation (0 = fixed length).
    pub elasticity: f32,
    /// Fraction of the length error corrected per pass (1 = full correction).
    pub softness: f32,
    /// Multiplier on carried-over velocity (1 = no damping).
    pub damping: f32,
    /// Constant acceleration applied to interior nodes.
    pub gravity: Vec3,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            segment_length: 0.08,
            iterations: 10,
            elasticity: 0.15,
            softness: 0.75,
            damping: 0.96,
            gravity: Vec3::new(0.0, -0.4, 0.0),
        }
    }
}

/// Ordered chain of nodes; node 0 follows the anchor, the last node the tip.
#[derive(Debug, Clone, Default)]
pub struct VerletChain {
    nodes: Vec<ChainNode>,
    params: ChainParams,
}

impl VerletChain {
    pub fn new(params: ChainParams) -> Self {
        Self {
            nodes: Vec::new(),
            params,
        }
    }

    /// Reset to `count` nodes stacked at `start` with zero extension.
    pub fn initialize(&mut self, start: Vec3, count: usize, segment_length: f32) {
        self.params.segment_length = segment_length;
        self.nodes.clear();
        self.nodes.resize(count, ChainNode::at(start));
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    /// Replace the tunables without touching node state.
    pub fn set_params(&mut self, params: ChainParams) {
        self.params = params;
    }

    pub fn nodes(&self) -> &[ChainNode] {
        &self.nodes
    }

    /// Current node positions, anchor first.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.nodes.iter().map(|n| n.current)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Distances between neighbouring nodes.
    pub fn segment_lengths(&self) -> Vec<f32> {
        self.nodes
            .windows(2)
            .map(|w| w[0].current.distance(w[1].current))
            .collect()
    }

    /// Advance one step. `time` drives the rest-length oscillation and must
    /// come from the caller's clock.
    pub fn simulate(&mut self, anchor: Vec3, tip: Vec3, dt: f32, time: f32) {
        if self.nodes.len() < 2 {
            if let Some(only) = self.nodes.first_mut() {
                *only = ChainNode::at(tip);
            }
            return;
        }

        self.pin(anchor, tip);
        self.integrate(dt);

        for _ in 0..self.params.iterations {
            self.relax(anchor, tip, time);
        }

        // Also covers iterations == 0.
        self.pin(anchor, tip);
    }

    fn pin(&mut self, anchor: Vec3, tip: Vec3) {
        let last = self.nodes.len() - 1;
        self.nodes[0].current = anchor;
        self.nodes[last].current = tip;
    }

    fn integrate(&mut self, dt: f32) {
        let last = self.nodes.len() - 1;
        let damping = self.params.damping;
        let pull = self.params.gravity * dt;

        for node in &mut self.nodes[1..last] {
            let velocity = node.displacement() * damping;
            node.previous = node.current;
            node.current += velocity + pull;
        }
    }

    /// One Gauss-Seidel pass over every segment.
    fn relax(&mut self, anchor: Vec3, tip: Vec3, time: f32) {
        self.pin(anchor, tip);

        let last = self.nodes.len() - 1;
        let ChainParams {
            segment_length,
            elasticity,
            softness,
            ..
        } = self.params;

        for i in 0..last {
            let delta = self.nodes[i + 1].current - self.nodes[i].current;
            let dist = delta.length();
            if dist < MIN_SEGMENT_DISTANCE {
                continue;
            }

            let target = segment_length
                + (time * ELASTIC_RATE + i as f32 * ELASTIC_PHASE).sin()
                    * elasticity
                    * ELASTIC_AMPLITUDE;
            let adjust = (dist - target) / dist * softness;
            let correction = delta * adjust * 0.5;

            if i != 0 {
                self.nodes[i].current += correction;
            }
            if i + 1 != last {
                self.nodes[i + 1].current -= correction;
            }
        }
    }
}
