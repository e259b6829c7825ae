//! Closed-form curves: weighted rational quadratic and plain cubic Bezier,
//! plus the sag midpoint used by the decorative rope.

use glam::Vec3;
use crate::extensions::math::{inverse_lerp, lerp, lerp_vec3};

/// Lowest midpoint weight the sag correction is tuned for.
pub const MIN_MID_WEIGHT: f32 = 1.0;
/// Highest midpoint weight the sag correction is tuned for.
pub const MAX_MID_WEIGHT: f32 = 15.0;

/// Three weighted control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RationalBezier {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
    pub w0: f32,
    pub w1: f32,
    pub w2: f32,
}

impl RationalBezier {
    /// Curve with unit end weights and a weighted middle control point.
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, mid_weight: f32) -> Self {
        Self {
            p0,
            p1,
            p2,
            w0: 1.0,
            w1: mid_weight,
            w2: 1.0,
        }
    }

    pub fn with_weights(mut self, w0: f32, w1: f32, w2: f32) -> Self {
        self.w0 = w0;
        self.w1 = w1;
        self.w2 = w2;
        self
    }

    #[inline]
    pub fn evaluate(&self, t: f32) -> Vec3 {
        rational_quadratic(self.p0, self.p1, self.p2, t, self.w0, self.w1, self.w2)
    }

    /// `count` evenly spaced samples from t = 0 to t = 1 inclusive.
    pub fn sample_into(&self, count: usize, out: &mut Vec<Vec3>) {
        out.clear();
        match count {
            0 => {}
            1 => out.push(self.p0),
            _ => {
                let step = 1.0 / (count - 1) as f32;
                out.extend((0..count).map(|i| self.evaluate(i as f32 * step)));
            }
        }
    }
}

/// Weighted rational quadratic Bezier.
///
/// Returns `p0` for `t <= 0` and `p2` for `t >= 1` exactly. Weights must be
/// positive; a zero denominator falls back to `p1`.
pub fn rational_quadratic(p0: Vec3, p1: Vec3, p2: Vec3, t: f32, w0: f32, w1: f32, w2: f32) -> Vec3 {
    if t <= 0.0 {
        return p0;
    }
    if t >= 1.0 {
        return p2;
    }

    let u = 1.0 - t;
    let b0 = w0 * u * u;
    let b1 = 2.0 * w1 * u * t;
    let b2 = w2 * t * t;
    let denominator = b0 + b1 + b2;
    if denominator.abs() < f32::EPSILON {
        return p1;
    }

    (p0 * b0 + p1 * b1 + p2 * b2) / denominator
}

/// Standard cubic Bezier.
#[inline]
pub fn cubic(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Divisor applied to the raw sag so heavier midpoints hang differently.
///
/// `1 + k * ln(weight)` with `k` blended from 0.493 (weight 1) to 0.323 (weight 15).
pub fn weight_adjustment(weight: f32) -> f32 {
    let k = lerp(0.493, 0.323, inverse_lerp(MIN_MID_WEIGHT, MAX_MID_WEIGHT, weight));
    1.0 + k * weight.ln()
}

/// Target for the rope's middle control point: a point `mid_position` of the
/// way from `start` to `end`, lowered by whatever length the rope has left over.
pub fn sag_midpoint(
    start: Vec3,
    end: Vec3,
    mid_position: f32,
    rope_length: f32,
    mid_weight: f32,
) -> Vec3 {
    let mut mid = lerp_vec3(start, end, mid_position);
    let span = start.distance(end).min(rope_length);
    mid.y -= (rope_length - span) / weight_adjustment(mid_weight);
    mid
}
