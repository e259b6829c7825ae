// extensions/math.rs
//
// Scalar and vector interpolation helpers shared by the rope models.
// Pure functions, no rope state.

use glam::Vec3;

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse of [`lerp`]: where `value` sits between `a` and `b`, clamped to [0, 1].
/// Returns 0.0 when the range is empty.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        0.0
    } else {
        ((value - a) / (b - a)).clamp(0.0, 1.0)
    }
}

/// Clamp to the unit interval.
#[inline]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Linearly interpolate between two Vec3 values (unclamped).
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Step `current` toward `target` by at most `max_delta`.
///
/// Returns `target` itself (not a recomputed sum) once it is within reach,
/// so repeated calls land on it bit-for-bit.
#[inline]
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_delta || dist == 0.0 {
        return target;
    }
    current + delta / dist * max_delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn inverse_lerp_clamps() {
        assert_eq!(inverse_lerp(1.0, 15.0, 1.0), 0.0);
        assert_eq!(inverse_lerp(1.0, 15.0, 15.0), 1.0);
        assert_eq!(inverse_lerp(1.0, 15.0, 40.0), 1.0);
        assert_eq!(inverse_lerp(1.0, 15.0, -3.0), 0.0);
        assert!((inverse_lerp(1.0, 15.0, 8.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn inverse_lerp_empty_range() {
        assert_eq!(inverse_lerp(3.0, 3.0, 7.0), 0.0);
    }

    #[test]
    fn move_towards_partial_step() {
        let p = move_towards(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 2.5);
        assert!((p.x - 2.5).abs() < 1e-6);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn move_towards_lands_exactly() {
        let target = Vec3::new(0.1, 0.7, -0.3);
        let p = move_towards(Vec3::new(0.1, 0.69, -0.3), target, 1.0);
        assert_eq!(p, target);
    }

    #[test]
    fn move_towards_zero_step_stays() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        let p = move_towards(start, Vec3::ZERO, 0.0);
        assert_eq!(p, start);
    }
}
