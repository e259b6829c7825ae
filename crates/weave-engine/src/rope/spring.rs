//! Damped spring tracking a single 3D target.
//!
//! Explicit Euler: `acceleration = (target - value) * stiffness * dt`,
//! velocity is scaled by `max(0, 1 - damping * dt)` before the acceleration
//! and any external force are added, then `value += velocity * dt`.
//!
//! This is not exact critical damping. With large `dt` or high stiffness the
//! update oscillates or diverges; callers keep `dt` small relative to
//! `1 / stiffness` (the decorative rope runs it on a 1/50 s fixed step).

use glam::Vec3;

/// Position, velocity and goal of the spring.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpringState {
    pub value: Vec3,
    pub velocity: Vec3,
    pub target: Vec3,
}

#[derive(Debug, Clone)]
pub struct SpringDamperCurve {
    state: SpringState,
    /// Pull toward the target.
    pub stiffness: f32,
    /// Velocity decay rate per second.
    pub damping: f32,
    /// Constant extra velocity added every step (wind, drag from a carrier, ...).
    pub external_force: Vec3,
}

impl SpringDamperCurve {
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            state: SpringState::default(),
            stiffness,
            damping,
            external_force: Vec3::ZERO,
        }
    }

    pub fn state(&self) -> &SpringState {
        &self.state
    }

    pub fn value(&self) -> Vec3 {
        self.state.value
    }

    pub fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    /// Snap to `value` at rest, with the target on the same point.
    pub fn reset(&mut self, value: Vec3) {
        self.state = SpringState {
            value,
            velocity: Vec3::ZERO,
            target: value,
        };
    }

    /// Move the goal without stepping.
    pub fn set_target(&mut self, target: Vec3) {
        self.state.target = target;
    }

    /// Step toward `target` by `dt` seconds.
    pub fn integrate(&mut self, target: Vec3, dt: f32) {
        self.state.target = target;
        self.step(dt);
    }

    /// Step toward the current target.
    pub fn step(&mut self, dt: f32) {
        let s = &mut self.state;
        let decay = (1.0 - self.damping * dt).max(0.0);
        let acceleration = (s.target - s.value) * self.stiffness * dt;

        s.velocity = s.velocity * decay + acceleration + self.external_force;
        s.value += s.velocity * dt;
    }

    /// Distance left to the target.
    pub fn error(&self) -> f32 {
        self.state.value.distance(self.state.target)
    }
}

impl Default for SpringDamperCurve {
    fn default() -> Self {
        Self::new(350.0, 15.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_is_at_rest() {
        let mut spring = SpringDamperCurve::default();
        spring.reset(Vec3::new(1.0, 2.0, 3.0));
        spring.step(0.02);
        assert_eq!(spring.value(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(spring.velocity(), Vec3::ZERO);
    }

    #[test]
    fn overdamped_error_decreases_monotonically() {
        let mut spring = SpringDamperCurve::new(100.0, 40.0);
        let target = Vec3::new(1.0, 2.0, 3.0);
        let dt = 0.01;

        for _ in 0..20 {
            spring.integrate(target, dt);
        }

        let mut last = spring.error();
        for step in 0..280 {
            spring.integrate(target, dt);
            let err = spring.error();
            assert!(err < last, "error grew at step {}: {} -> {}", step, last, err);
            last = err;
        }
    }

    #[test]
    fn default_tuning_converges_at_fixed_step() {
        let mut spring = SpringDamperCurve::default();
        let target = Vec3::new(-3.0, 0.5, 7.0);
        for _ in 0..500 {
            spring.integrate(target, 0.02);
        }
        assert!(spring.error() < 1e-3, "error {}", spring.error());
    }

    #[test]
    fn damping_never_reverses_velocity() {
        // damping * dt > 1 clamps the decay factor at zero.
        let mut spring = SpringDamperCurve::new(0.0, 100.0);
        spring.reset(Vec3::ZERO);
        spring.external_force = Vec3::X;
        spring.step(0.05);
        spring.external_force = Vec3::ZERO;
        spring.step(0.05);
        assert_eq!(spring.velocity(), Vec3::ZERO);
    }

    #[test]
    fn external_force_biases_rest_point() {
        let mut spring = SpringDamperCurve::new(100.0, 10.0);
        spring.external_force = Vec3::new(0.0, -0.05, 0.0);
        for _ in 0..2000 {
            spring.integrate(Vec3::ZERO, 0.01);
        }
        assert!(spring.value().y < -1e-3);
    }
}
