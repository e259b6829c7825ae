// extensions/mod.rs
//
// Small math helpers used across the rope models and the motion controller.

pub mod math;

pub use math::{clamp01, inverse_lerp, lerp, lerp_vec3, move_towards};
