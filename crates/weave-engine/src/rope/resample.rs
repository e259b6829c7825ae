//! Centerline strategies: turn rope state into a dense polyline.
//!
//! Two independent variants with different cost and look:
//! - `CatmullRom` splines through every window of four chain nodes,
//! - `SagBezier` ignores the chain and hangs a cubic Bezier between
//!   anchor and tip, lowered in proportion to their distance.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use super::bezier::cubic;
use super::chain::ChainNode;
use crate::error::ConfigError;

/// Fraction of the anchor–tip distance used as sag.
const SAG_PER_UNIT: f32 = 0.2;
/// Upper bound on sag, in world units.
const MAX_SAG: f32 = 1.5;

/// Inputs available to a centerline strategy.
#[derive(Debug, Clone, Copy)]
pub struct RopeSnapshot<'a> {
    pub anchor: Vec3,
    pub tip: Vec3,
    pub nodes: &'a [ChainNode],
}

/// How the visible centerline is produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveStrategy {
    /// Catmull-Rom through every four consecutive chain nodes.
    CatmullRom { samples_per_span: usize },
    /// Cubic Bezier from anchor to tip with two sagging control points.
    SagBezier { samples: usize, up: Vec3 },
}

impl Default for CurveStrategy {
    fn default() -> Self {
        CurveStrategy::CatmullRom { samples_per_span: 6 }
    }
}

impl CurveStrategy {
    pub fn sag_bezier() -> Self {
        CurveStrategy::SagBezier {
            samples: 32,
            up: Vec3::Y,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CurveStrategy::CatmullRom { .. } => "catmull-rom",
            CurveStrategy::SagBezier { .. } => "sag-bezier",
        }
    }

    /// Whether this strategy reads chain nodes (and so needs the chain simulated).
    pub fn uses_chain(&self) -> bool {
        matches!(self, CurveStrategy::CatmullRom { .. })
    }

    /// Fewest chain nodes that still yield a curve.
    pub fn min_nodes(&self) -> usize {
        match self {
            CurveStrategy::CatmullRom { .. } => 4,
            CurveStrategy::SagBezier { .. } => 2,
        }
    }

    /// Samples produced for a chain of `node_count` nodes.
    pub fn sample_count(&self, node_count: usize) -> usize {
        match *self {
            CurveStrategy::CatmullRom { samples_per_span } => {
                samples_per_span * node_count.saturating_sub(3)
            }
            CurveStrategy::SagBezier { samples, .. } => samples,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            CurveStrategy::CatmullRom { samples_per_span } if samples_per_span == 0 => {
                Err(ConfigError::TooFewSamples(samples_per_span))
            }
            CurveStrategy::SagBezier { samples, .. } if samples < 2 => {
                Err(ConfigError::TooFewSamples(samples))
            }
            _ => Ok(()),
        }
    }

    /// Write the centerline into `out`, replacing its contents.
    pub fn resample(&self, rope: RopeSnapshot<'_>, out: &mut Vec<Vec3>) {
        out.clear();
        match *self {
            CurveStrategy::CatmullRom { samples_per_span } => {
                catmull_rom_chain(rope.nodes, samples_per_span, out)
            }
            CurveStrategy::SagBezier { samples, up } => {
                sag_bezier(rope.anchor, rope.tip, up, samples, out)
            }
        }
    }
}

/// Catmull-Rom blend of four points; passes through `p1` at t = 0 and `p2` at t = 1.
#[inline]
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// `samples_per_span` points for each window of four nodes, t in [0, 1).
fn catmull_rom_chain(nodes: &[ChainNode], samples_per_span: usize, out: &mut Vec<Vec3>) {
    if nodes.len() < 4 || samples_per_span == 0 {
        return;
    }

    out.reserve(samples_per_span * (nodes.len() - 3));
    let step = 1.0 / samples_per_span as f32;
    for w in nodes.windows(4) {
        let (p0, p1, p2, p3) = (w[0].current, w[1].current, w[2].current, w[3].current);
        for j in 0..samples_per_span {
            out.push(catmull_rom(p0, p1, p2, p3, j as f32 * step));
        }
    }
}

/// Sag for a given anchor–tip distance.
#[inline]
pub fn sag_for_distance(distance: f32) -> f32 {
    (distance * SAG_PER_UNIT).clamp(0.0, MAX_SAG)
}

fn sag_bezier(anchor: Vec3, tip: Vec3, up: Vec3, samples: usize, out: &mut Vec<Vec3>) {
    if samples == 0 {
        return;
    }

    let drop = up.normalize_or_zero() * sag_for_distance(anchor.distance(tip));
    let c1 = anchor.lerp(tip, 1.0 / 3.0) - drop;
    let c2 = anchor.lerp(tip, 2.0 / 3.0) - drop;

    if samples == 1 {
        out.push(anchor);
        return;
    }

    out.reserve(samples);
    let last = samples - 1;
    for i in 0..samples {
        let p = match i {
            0 => anchor,
            i if i == last => tip,
            _ => cubic(anchor, c1, c2, tip, i as f32 / last as f32),
        };
        out.push(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_nodes(n: usize) -> Vec<ChainNode> {
        (0..n)
            .map(|i| ChainNode::at(Vec3::new(i as f32 * 0.1, (i as f32 * 0.7).sin() * 0.05, 0.0)))
            .collect()
    }

    fn snapshot(nodes: &[ChainNode]) -> RopeSnapshot<'_> {
        RopeSnapshot {
            anchor: nodes.first().map(|n| n.current).unwrap_or(Vec3::ZERO),
            tip: nodes.last().map(|n| n.current).unwrap_or(Vec3::ZERO),
            nodes,
        }
    }

    #[test]
    fn catmull_rom_sample_count() {
        let strategy = CurveStrategy::default();
        let mut out = Vec::new();
        for n in [4usize, 5, 16, 20] {
            let nodes = line_nodes(n);
            strategy.resample(snapshot(&nodes), &mut out);
            assert_eq!(out.len(), 6 * (n - 3));
            assert_eq!(strategy.sample_count(n), out.len());
        }
    }

    #[test]
    fn catmull_rom_passes_through_inner_nodes() {
        let nodes = line_nodes(6);
        let mut out = Vec::new();
        CurveStrategy::default().resample(snapshot(&nodes), &mut out);
        // Each span starts at its second node.
        for (span, chunk) in out.chunks(6).enumerate() {
            assert!(chunk[0].distance(nodes[span + 1].current) < 1e-6);
        }
    }

    #[test]
    fn catmull_rom_too_few_nodes_is_empty() {
        let nodes = line_nodes(3);
        let mut out = vec![Vec3::ONE];
        CurveStrategy::default().resample(snapshot(&nodes), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn sag_bezier_fixed_count_and_ends() {
        let anchor = Vec3::new(0.0, 1.0, 0.0);
        let tip = Vec3::new(3.0, 0.0, 0.5);
        let rope = RopeSnapshot { anchor, tip, nodes: &[] };
        let mut out = Vec::new();
        CurveStrategy::sag_bezier().resample(rope, &mut out);
        assert_eq!(out.len(), 32);
        assert_eq!(out[0], anchor);
        assert_eq!(out[31], tip);
    }

    #[test]
    fn sag_bezier_hangs_below_chord() {
        let anchor = Vec3::ZERO;
        let tip = Vec3::new(4.0, 0.0, 0.0);
        let rope = RopeSnapshot { anchor, tip, nodes: &[] };
        let mut out = Vec::new();
        CurveStrategy::sag_bezier().resample(rope, &mut out);
        let lowest = out.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        // Control points drop by 0.8; the curve reaches 3/4 of that.
        assert!((lowest + 0.6).abs() < 0.01, "lowest {}", lowest);
    }

    #[test]
    fn sag_is_clamped() {
        assert_eq!(sag_for_distance(0.0), 0.0);
        assert!((sag_for_distance(2.0) - 0.4).abs() < 1e-6);
        assert_eq!(sag_for_distance(100.0), 1.5);
    }

    #[test]
    fn strategy_from_json() {
        let s: CurveStrategy =
            serde_json::from_str(r#"{ "kind": "sag_bezier", "samples": 12, "up": [0.0, 0.0, 1.0] }"#)
                .unwrap();
        assert_eq!(s, CurveStrategy::SagBezier { samples: 12, up: Vec3::Z });
        assert!(!s.uses_chain());
    }

    #[test]
    fn validate_rejects_empty_sampling() {
        assert!(CurveStrategy::CatmullRom { samples_per_span: 0 }.validate().is_err());
        assert!(CurveStrategy::SagBezier { samples: 1, up: Vec3::Y }.validate().is_err());
        assert!(CurveStrategy::default().validate().is_ok());
    }
}
